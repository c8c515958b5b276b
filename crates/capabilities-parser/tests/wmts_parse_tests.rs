//! Tests for WMTS capabilities parsing and layer property extraction.

use capabilities_parser::{parse_wmts, wmts_layer_patch, ParseError};
use test_utils::{fixtures, wmts_layer};

// ============================================================================
// Document structure
// ============================================================================

#[test]
fn test_wmts_layers_and_sets() {
    let caps = parse_wmts(fixtures::WMTS_100).unwrap();

    assert_eq!(caps.version.as_deref(), Some("1.0.0"));
    let ids: Vec<&str> = caps.layers.iter().map(|l| l.identifier.as_str()).collect();
    assert_eq!(ids, vec!["taustakartta", "ortokuva", "broken"]);
    assert_eq!(caps.tile_matrix_sets.len(), 2);
}

#[test]
fn test_wmts_layer_details() {
    let caps = parse_wmts(fixtures::WMTS_100).unwrap();
    let layer = caps.find_layer("taustakartta").unwrap();

    assert_eq!(layer.title.as_deref(), Some("Background map"));
    assert_eq!(layer.formats, vec!["image/png"]);
    assert_eq!(layer.info_formats, vec!["application/json"]);
    assert_eq!(
        layer.tile_matrix_set_links,
        vec!["ETRS-TM35FIN", "WGS84_Pseudo-Mercator"]
    );
    assert_eq!(layer.styles.len(), 1);
    assert_eq!(layer.styles[0].name, "default");
    assert_eq!(
        layer.styles[0].legend_url.as_deref(),
        Some("http://tiles.example.com/legend/taustakartta.png")
    );

    assert_eq!(layer.resource_urls.len(), 1);
    assert_eq!(layer.resource_urls[0].resource_type, "tile");
    assert!(layer.resource_urls[0].template.contains("{TileMatrix}"));

    let bbox = layer.bbox.unwrap();
    assert_eq!((bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y), (18.5, 59.0, 32.5, 70.5));
}

#[test]
fn test_wmts_tile_matrix_set_details() {
    let caps = parse_wmts(fixtures::WMTS_100).unwrap();
    let set = caps.tile_matrix_set("ETRS-TM35FIN").unwrap();

    assert_eq!(set.supported_crs, "urn:ogc:def:crs:EPSG:6.3:3067");
    assert_eq!(set.matrices.len(), 2);

    let m = &set.matrices[1];
    assert_eq!(m.identifier, "1");
    assert_eq!(m.top_left, (-548576.0, 8388608.0));
    assert_eq!((m.tile_width, m.tile_height), (256, 256));
    assert_eq!((m.matrix_width, m.matrix_height), (2, 2));
}

#[test]
fn test_wms_document_is_rejected() {
    let err = parse_wmts(fixtures::WMS_130).unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedRoot { .. }));
}

#[test]
fn test_bad_tile_size_is_reported() {
    let xml = fixtures::WMTS_100.replacen("<TileWidth>256</TileWidth>", "<TileWidth>wide</TileWidth>", 1);
    let err = parse_wmts(&xml).unwrap_err();
    assert!(matches!(err, ParseError::InvalidNumber { element: "TileWidth", .. }));
}

// ============================================================================
// Layer patches
// ============================================================================

#[test]
fn test_wmts_layer_patch_maps_crs_to_sets() {
    let caps = parse_wmts(fixtures::WMTS_100).unwrap();
    let layer = wmts_layer(5, "taustakartta", "http://tiles.example.com/wmts", Some("1.0.0"));

    let patch = wmts_layer_patch(&caps, &layer).unwrap();
    let props = &patch.capabilities;

    let crs: Vec<&str> = props.crs.iter().map(String::as_str).collect();
    assert_eq!(crs, vec!["EPSG:3067", "EPSG:3857"]);
    assert_eq!(
        props.tile_matrix_sets.get("EPSG:3067").map(String::as_str),
        Some("ETRS-TM35FIN")
    );
    assert_eq!(
        props.tile_matrix_sets.get("EPSG:3857").map(String::as_str),
        Some("WGS84_Pseudo-Mercator")
    );
    assert_eq!(props.min_scale, Some(14628571.42857143));
    assert_eq!(props.max_scale, Some(559082264.0287178));
    assert!(props.queryable);
    assert_eq!(
        props.geometry.as_deref(),
        Some("POLYGON ((18.5 59, 32.5 59, 32.5 70.5, 18.5 70.5, 18.5 59))")
    );
    assert_eq!(props.resource_urls.len(), 1);
}

#[test]
fn test_wmts_layer_patch_single_set() {
    let caps = parse_wmts(fixtures::WMTS_100).unwrap();
    let layer = wmts_layer(6, "ortokuva", "http://tiles.example.com/wmts", None);

    let patch = wmts_layer_patch(&caps, &layer).unwrap();
    let props = &patch.capabilities;

    assert_eq!(props.crs.len(), 1);
    assert_eq!(props.min_scale, Some(14628571.42857143));
    assert_eq!(props.max_scale, Some(29257142.85714286));
    assert!(!props.queryable);
    assert!(props.geometry.is_none());
}

#[test]
fn test_wmts_layer_patch_unknown_set() {
    let caps = parse_wmts(fixtures::WMTS_100).unwrap();
    let layer = wmts_layer(7, "broken", "http://tiles.example.com/wmts", None);

    let err = wmts_layer_patch(&caps, &layer).unwrap_err();
    assert!(matches!(err, ParseError::InvalidDocument(ref msg) if msg.contains("MISSING")));
}

#[test]
fn test_wmts_layer_patch_unknown_layer() {
    let caps = parse_wmts(fixtures::WMTS_100).unwrap();
    let layer = wmts_layer(8, "satellite", "http://tiles.example.com/wmts", None);

    assert!(matches!(
        wmts_layer_patch(&caps, &layer),
        Err(ParseError::LayerNotFound(_))
    ));
}
