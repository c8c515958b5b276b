//! Tests for WMS capabilities parsing and layer property extraction.

use capabilities_parser::{parse_wms, wms_layer_patch, ParseError};
use test_utils::{assert_approx_eq, fixtures, wms_layer};

// ============================================================================
// WMS 1.3.0
// ============================================================================

#[test]
fn test_wms_130_service_level_properties() {
    let caps = parse_wms(fixtures::WMS_130).unwrap();

    assert_eq!(caps.version.as_deref(), Some("1.3.0"));
    assert_eq!(caps.formats, vec!["image/png", "image/jpeg"]);
    assert_eq!(caps.info_formats, vec!["text/html", "application/vnd.ogc.gml"]);
    assert_eq!(caps.layers.len(), 1);
    assert_eq!(caps.all_layers().len(), 5);
}

#[test]
fn test_wms_130_child_adds_crs_and_styles() {
    let caps = parse_wms(fixtures::WMS_130).unwrap();
    let roads = caps.find_layer("roads").unwrap();

    assert_eq!(roads.title.as_deref(), Some("Roads & streets"));
    assert!(roads.queryable);
    let crs: Vec<&str> = roads.crs.iter().map(String::as_str).collect();
    assert_eq!(crs, vec!["EPSG:3067", "EPSG:3857", "EPSG:4326"]);

    let styles: Vec<&str> = roads.styles.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(styles, vec!["default", "thick"]);
    assert_eq!(
        roads.styles[1].legend_url.as_deref(),
        Some("http://maps.example.com/legend/roads.png")
    );

    assert_eq!(roads.min_scale, Some(1000.0));
    assert_eq!(roads.max_scale, Some(500000.0));
}

#[test]
fn test_wms_130_bbox_inherited_or_replaced() {
    let caps = parse_wms(fixtures::WMS_130).unwrap();

    let roads = caps.find_layer("roads").unwrap().bbox.unwrap();
    assert_eq!(roads.min_x, 19.08);
    assert_eq!(roads.max_y, 70.09);

    let lakes = caps.find_layer("lakes").unwrap();
    let bbox = lakes.bbox.unwrap();
    assert_eq!((bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y), (20.0, 60.0, 30.0, 65.0));
    assert!(!lakes.queryable);
    assert!(lakes.min_scale.is_none());
}

#[test]
fn test_wms_130_nested_group_inheritance() {
    let caps = parse_wms(fixtures::WMS_130).unwrap();
    let buildings = caps.find_layer("buildings").unwrap();

    // Queryable and scale come from the unnamed group
    assert!(buildings.queryable);
    assert_eq!(buildings.max_scale, Some(20000.0));
    assert!(buildings.min_scale.is_none());

    let styles: Vec<&str> = buildings.styles.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(styles, vec!["default", "outline"]);
    assert!(buildings.crs.contains("EPSG:3067"));
    assert!(!buildings.crs.contains("EPSG:3857"));
}

#[test]
fn test_wms_130_with_prolog() {
    let xml = fixtures::with_prolog(fixtures::WMS_130, Some("UTF-8"));
    let caps = parse_wms(&xml).unwrap();
    assert!(caps.find_layer("roads").is_some());
}

// ============================================================================
// WMS 1.1.1
// ============================================================================

#[test]
fn test_wms_111_srs_lists_and_latlon_bbox() {
    let caps = parse_wms(fixtures::WMS_111).unwrap();
    assert_eq!(caps.version.as_deref(), Some("1.1.1"));

    let parcels = caps.find_layer("parcels").unwrap();
    assert!(parcels.crs.contains("EPSG:4326"));
    assert!(parcels.crs.contains("EPSG:3067"));
    assert!(parcels.crs.contains("EPSG:3857"));

    let bbox = parcels.bbox.unwrap();
    assert_eq!((bbox.min_x, bbox.min_y), (19.5, 59.7));
}

#[test]
fn test_wms_111_scale_hint_converted() {
    let caps = parse_wms(fixtures::WMS_111).unwrap();
    let parcels = caps.find_layer("parcels").unwrap();

    assert_approx_eq!(parcels.min_scale.unwrap(), 1262.69, 0.01);
    assert_approx_eq!(parcels.max_scale.unwrap(), 35355.34, 0.01);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_service_exception_is_not_wms() {
    let err = parse_wms(fixtures::SERVICE_EXCEPTION).unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedRoot { .. }));
}

#[test]
fn test_truncated_document_fails() {
    let truncated = &fixtures::WMS_130[..fixtures::WMS_130.len() / 2];
    assert!(matches!(parse_wms(truncated), Err(ParseError::Xml(_))));
}

// ============================================================================
// Layer patches
// ============================================================================

#[test]
fn test_wms_layer_patch() {
    let caps = parse_wms(fixtures::WMS_130).unwrap();
    let layer = wms_layer(42, "roads", "http://maps.example.com/wms", Some("1.3.0"));

    let patch = wms_layer_patch(&caps, &layer).unwrap();
    let props = &patch.capabilities;

    assert_eq!(patch.layer_id, layer.id);
    assert!(props.queryable);
    assert_eq!(props.formats, vec!["image/png", "image/jpeg"]);
    assert_eq!(props.info_formats.len(), 2);
    assert!(props.get_style("thick").is_some());
    assert!(props.supports_crs("EPSG:3857"));
    assert_eq!(props.version.as_deref(), Some("1.3.0"));
    assert_eq!(
        props.geometry.as_deref(),
        Some("POLYGON ((19.08 59.45, 31.59 59.45, 31.59 70.09, 19.08 70.09, 19.08 59.45))")
    );
    assert!(props.tile_matrix_sets.is_empty());
}

#[test]
fn test_wms_layer_patch_unknown_layer() {
    let caps = parse_wms(fixtures::WMS_130).unwrap();
    let layer = wms_layer(1, "railways", "http://maps.example.com/wms", None);

    let err = wms_layer_patch(&caps, &layer).unwrap_err();
    assert!(matches!(err, ParseError::LayerNotFound(ref name) if name == "railways"));
}
