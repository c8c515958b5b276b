//! Refresh of a single layer, as done when a layer is saved.

use chrono::Utc;
use tracing::{info, warn};

use capabilities_parser::{parse_wms, parse_wmts, wms_layer_patch, wmts_layer_patch};
use ogc_common::{LayerRef, ServiceResult, ServiceType};

use crate::cache::CapabilitiesCache;
use crate::fetcher::FetchRequest;

/// Warning attached to a layer whose capabilities could not be read.
pub const METADATA_READ_FAILURE: &str = "metadataReadFailure";

/// Result of [`refresh_layer`].
#[derive(Debug, Clone, PartialEq)]
pub struct LayerRefreshOutcome {
    /// The layer, patched when the refresh succeeded
    pub layer: LayerRef,
    pub capabilities_updated: bool,
    pub warning: Option<&'static str>,
}

/// Fetch fresh capabilities for one layer and apply them.
///
/// Failures never propagate: the layer is returned unchanged with a
/// [`METADATA_READ_FAILURE`] warning so saving the layer can go on. The
/// document is cached only after it has been parsed successfully.
pub async fn refresh_layer(cache: &CapabilitiesCache, layer: &LayerRef) -> LayerRefreshOutcome {
    match try_refresh(cache, layer).await {
        Ok(updated) => {
            info!(layer_id = %layer.id, layer = %layer.name, "Layer capabilities refreshed");
            LayerRefreshOutcome {
                layer: updated,
                capabilities_updated: true,
                warning: None,
            }
        }
        Err(e) => {
            warn!(
                layer_id = %layer.id,
                layer = %layer.name,
                url = %layer.simplified_url(),
                error = %e,
                kind = e.kind(),
                "Failed to read layer capabilities"
            );
            LayerRefreshOutcome {
                layer: layer.clone(),
                capabilities_updated: false,
                warning: Some(METADATA_READ_FAILURE),
            }
        }
    }
}

async fn try_refresh(cache: &CapabilitiesCache, layer: &LayerRef) -> ServiceResult<LayerRef> {
    let fetched = cache.fetcher().fetch(&FetchRequest::for_layer(layer)).await?;

    let patch = match layer.service_type {
        ServiceType::Wms => Some(wms_layer_patch(&parse_wms(&fetched.data)?, layer)?),
        ServiceType::Wmts => Some(wmts_layer_patch(&parse_wmts(&fetched.data)?, layer)?),
        ServiceType::Wfs => None,
    };

    let updated = match &patch {
        Some(patch) => layer.with_patch(patch, Utc::now())?,
        None => layer.clone(),
    };

    if let Err(e) = cache.save_fetched(layer, fetched.data).await {
        warn!(layer_id = %layer.id, error = %e, "Failed to cache layer capabilities");
    }
    Ok(updated)
}
