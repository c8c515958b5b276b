//! Turn parsed capabilities into per-layer property patches.

use ogc_common::{normalize_crs, LayerCapabilities, LayerPatch, LayerRef};
use tracing::warn;

use crate::error::{ParseError, ParseResult};
use crate::wms::WmsCapabilities;
use crate::wmts::WmtsCapabilities;

/// Properties of `layer` as advertised by a WMS service.
pub fn wms_layer_patch(caps: &WmsCapabilities, layer: &LayerRef) -> ParseResult<LayerPatch> {
    let found = caps
        .find_layer(&layer.name)
        .ok_or_else(|| ParseError::LayerNotFound(layer.name.clone()))?;
    found.check()?;

    let capabilities = LayerCapabilities {
        styles: found.styles.clone(),
        formats: caps.formats.clone(),
        info_formats: caps.info_formats.clone(),
        queryable: found.queryable,
        min_scale: found.min_scale,
        max_scale: found.max_scale,
        crs: found.crs.iter().map(|c| normalize_crs(c)).collect(),
        geometry: found.bbox.filter(|b| b.is_valid()).map(|b| b.to_wkt()),
        tile_matrix_sets: Default::default(),
        resource_urls: Vec::new(),
        version: caps.version.clone(),
    };

    Ok(LayerPatch {
        layer_id: layer.id,
        capabilities,
    })
}

/// Properties of `layer` as advertised by a WMTS service.
///
/// Each linked tile matrix set contributes its CRS and its scale range. A
/// link to a set the document does not define is an error.
pub fn wmts_layer_patch(caps: &WmtsCapabilities, layer: &LayerRef) -> ParseResult<LayerPatch> {
    let found = caps
        .find_layer(&layer.name)
        .ok_or_else(|| ParseError::LayerNotFound(layer.name.clone()))?;

    let mut capabilities = LayerCapabilities {
        styles: found.styles.clone(),
        formats: found.formats.clone(),
        info_formats: found.info_formats.clone(),
        queryable: !found.info_formats.is_empty(),
        geometry: found.bbox.filter(|b| b.is_valid()).map(|b| b.to_wkt()),
        resource_urls: found.resource_urls.clone(),
        version: caps.version.clone(),
        ..Default::default()
    };

    for link in &found.tile_matrix_set_links {
        let set = caps.tile_matrix_set(link).ok_or_else(|| {
            ParseError::InvalidDocument(format!(
                "layer {} links unknown tile matrix set {}",
                found.identifier, link
            ))
        })?;

        let crs = normalize_crs(&set.supported_crs);
        if let Some(existing) = capabilities.tile_matrix_sets.get(&crs) {
            warn!(
                layer = %found.identifier,
                crs = %crs,
                kept = %existing,
                skipped = %set.identifier,
                "Multiple tile matrix sets for one CRS"
            );
        } else {
            capabilities
                .tile_matrix_sets
                .insert(crs.clone(), set.identifier.clone());
        }
        capabilities.crs.insert(crs);

        if let Some((min, max)) = set.scale_range() {
            capabilities.min_scale = Some(capabilities.min_scale.map_or(min, |m| m.min(min)));
            capabilities.max_scale = Some(capabilities.max_scale.map_or(max, |m| m.max(max)));
        }
    }

    Ok(LayerPatch {
        layer_id: layer.id,
        capabilities,
    })
}
