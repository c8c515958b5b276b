//! Partition layers by the capabilities document they share.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use ogc_common::{Credentials, LayerId, LayerRef, UrlTypeVersionKey};

/// Layers served by one GetCapabilities document.
#[derive(Debug, Clone)]
pub struct LayerGroup {
    pub key: UrlTypeVersionKey,
    /// Members in input order, never empty
    pub layers: Vec<LayerRef>,
}

impl LayerGroup {
    /// Credentials used for the group's request: those of the first member.
    pub fn credentials(&self) -> Option<&Credentials> {
        self.layers.first().and_then(|l| l.credentials.as_ref())
    }

    pub fn layer_ids(&self) -> Vec<LayerId> {
        self.layers.iter().map(|l| l.id).collect()
    }

    fn has_mixed_credentials(&self) -> bool {
        let first = self.credentials();
        self.layers.iter().any(|l| l.credentials.as_ref() != first)
    }
}

/// Group layers of group-refreshable types by (url, type, version).
///
/// Layers of other types are dropped. Ordering by key keeps refresh runs
/// deterministic.
pub fn group_layers(
    layers: impl IntoIterator<Item = LayerRef>,
) -> BTreeMap<UrlTypeVersionKey, LayerGroup> {
    let mut groups: BTreeMap<UrlTypeVersionKey, LayerGroup> = BTreeMap::new();
    let mut skipped = 0usize;

    for layer in layers {
        if !layer.service_type.supports_group_refresh() {
            skipped += 1;
            continue;
        }
        let key = UrlTypeVersionKey::for_layer(&layer);
        groups
            .entry(key.clone())
            .or_insert_with(|| LayerGroup {
                key,
                layers: Vec::new(),
            })
            .layers
            .push(layer);
    }

    for group in groups.values() {
        if group.has_mixed_credentials() {
            warn!(
                key = %group.key,
                layers = ?group.layer_ids(),
                "Layers sharing a service use different credentials, using the first layer's"
            );
        }
    }

    debug!(groups = groups.len(), skipped, "Grouped layers");
    groups
}
