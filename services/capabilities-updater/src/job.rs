//! Scheduled refresh of capability-derived layer properties.
//!
//! One request per (url, type, version) group. Failures are contained: a
//! failed group never stops the run, and a failed layer never stops its group.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

use capabilities_parser::{
    parse_wms, parse_wmts, wms_layer_patch, wmts_layer_patch, ParseResult,
};
use ogc_common::{CapabilitiesDocument, LayerPatch, LayerRef, ServiceResult, ServiceType};
use storage::{CapabilitiesStore, LayerService};

use crate::fetcher::{CapabilitiesSource, FetchRequest};
use crate::grouper::{group_layers, LayerGroup};

/// Counters of one refresh run. Informational only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub groups: usize,
    /// Groups whose document could not be fetched or parsed
    pub groups_failed: usize,
    pub layers_updated: usize,
    /// Layers in successful groups that could not be patched or saved
    pub layers_failed: usize,
    /// The run did not start because another run was in progress
    pub skipped: bool,
}

#[derive(Debug, Default)]
struct GroupOutcome {
    updated: usize,
    failed: usize,
}

/// Refreshes every WMS and WMTS layer from its service's capabilities.
pub struct RefreshJob {
    layers: Arc<dyn LayerService>,
    fetcher: Arc<dyn CapabilitiesSource>,
    store: Option<Arc<dyn CapabilitiesStore>>,
    running: Mutex<()>,
}

impl RefreshJob {
    pub fn new(layers: Arc<dyn LayerService>, fetcher: Arc<dyn CapabilitiesSource>) -> Self {
        Self {
            layers,
            fetcher,
            store: None,
            running: Mutex::new(()),
        }
    }

    /// Also write every fetched document to the capabilities store.
    pub fn with_store(mut self, store: Arc<dyn CapabilitiesStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Run one refresh over all layers.
    ///
    /// Never fails; problems are logged and counted. A call made while
    /// another run of this job is in progress returns immediately.
    pub async fn run(&self) -> RefreshSummary {
        let Ok(_guard) = self.running.try_lock() else {
            warn!("Capabilities refresh already running, skipping");
            return RefreshSummary {
                skipped: true,
                ..Default::default()
            };
        };

        let started = Instant::now();
        let layers = match self.layers.find_all().await {
            Ok(layers) => layers,
            Err(e) => {
                error!(error = %e, kind = e.kind(), "Failed to load layers");
                return RefreshSummary::default();
            }
        };

        let groups = group_layers(layers);
        info!(groups = groups.len(), "Starting capabilities refresh");

        let mut summary = RefreshSummary {
            groups: groups.len(),
            ..Default::default()
        };

        for group in groups.values() {
            match self.refresh_group(group).await {
                Ok(outcome) => {
                    summary.layers_updated += outcome.updated;
                    summary.layers_failed += outcome.failed;
                }
                Err(e) => {
                    summary.groups_failed += 1;
                    warn!(
                        url = %group.key.url(),
                        service = %group.key.service_type(),
                        version = ?group.key.version(),
                        layers = ?group.layer_ids(),
                        error = %e,
                        kind = e.kind(),
                        "Capabilities refresh failed for group"
                    );
                }
            }
        }

        info!(
            groups = summary.groups,
            groups_failed = summary.groups_failed,
            layers_updated = summary.layers_updated,
            layers_failed = summary.layers_failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Capabilities refresh finished"
        );
        summary
    }

    #[instrument(skip(self, group), fields(key = %group.key))]
    async fn refresh_group(&self, group: &LayerGroup) -> ServiceResult<GroupOutcome> {
        let request = FetchRequest::for_key(&group.key, group.credentials().cloned());
        let fetched = self.fetcher.fetch(&request).await?;

        if let Some(store) = &self.store {
            let doc = CapabilitiesDocument::new(&group.key, fetched.data.as_str());
            if let Err(e) = store.save(&doc).await {
                warn!(error = %e, "Failed to store refreshed capabilities");
            }
        }

        let updated_at = Utc::now();
        let outcome = match group.key.service_type() {
            ServiceType::Wms => {
                let caps = parse_wms(&fetched.data)?;
                self.apply(group, |layer| wms_layer_patch(&caps, layer), updated_at)
                    .await
            }
            ServiceType::Wmts => {
                let caps = parse_wmts(&fetched.data)?;
                self.apply(group, |layer| wmts_layer_patch(&caps, layer), updated_at)
                    .await
            }
            ServiceType::Wfs => GroupOutcome::default(),
        };
        Ok(outcome)
    }

    async fn apply<F>(&self, group: &LayerGroup, patch_for: F, updated_at: DateTime<Utc>) -> GroupOutcome
    where
        F: Fn(&LayerRef) -> ParseResult<LayerPatch>,
    {
        let mut outcome = GroupOutcome::default();
        for layer in &group.layers {
            let result = match patch_for(layer) {
                Ok(patch) => self.save_patched(layer, &patch, updated_at).await,
                Err(e) => Err(e.into()),
            };
            match result {
                Ok(()) => outcome.updated += 1,
                Err(e) => {
                    outcome.failed += 1;
                    warn!(
                        layer_id = %layer.id,
                        layer = %layer.name,
                        error = %e,
                        kind = e.kind(),
                        "Failed to update layer from capabilities"
                    );
                }
            }
        }
        outcome
    }

    async fn save_patched(
        &self,
        layer: &LayerRef,
        patch: &LayerPatch,
        updated_at: DateTime<Utc>,
    ) -> ServiceResult<()> {
        let updated = layer.with_patch(patch, updated_at)?;
        self.layers.update(&updated).await
    }
}
