//! Read-through cache of GetCapabilities documents.

use std::sync::Arc;

use tracing::{debug, info};

use ogc_common::{
    CapabilitiesDocument, Credentials, LayerRef, ServiceResult, ServiceType, UrlTypeVersionKey,
};
use storage::CapabilitiesStore;

use crate::fetcher::{CapabilitiesSource, FetchRequest};

/// Returns stored capabilities or fetches and stores them.
///
/// Every successful fetch is persisted before it is returned. A failed fetch
/// leaves the store untouched.
pub struct CapabilitiesCache {
    store: Arc<dyn CapabilitiesStore>,
    fetcher: Arc<dyn CapabilitiesSource>,
}

impl CapabilitiesCache {
    pub fn new(store: Arc<dyn CapabilitiesStore>, fetcher: Arc<dyn CapabilitiesSource>) -> Self {
        Self { store, fetcher }
    }

    pub fn fetcher(&self) -> &Arc<dyn CapabilitiesSource> {
        &self.fetcher
    }

    /// Capabilities for the layer's (url, type, version).
    ///
    /// With `force_refresh` the store is not consulted.
    pub async fn get_capabilities(
        &self,
        layer: &LayerRef,
        force_refresh: bool,
    ) -> ServiceResult<CapabilitiesDocument> {
        let key = UrlTypeVersionKey::for_layer(layer);

        if !force_refresh {
            if let Some(doc) = self.store.find(&key).await? {
                debug!(key = %key, "Capabilities cache hit");
                return Ok(doc);
            }
            debug!(key = %key, "Capabilities cache miss");
        }

        let fetched = self.fetcher.fetch(&FetchRequest::for_layer(layer)).await?;
        let saved = self
            .store
            .save(&CapabilitiesDocument::new(&key, fetched.data))
            .await?;
        info!(
            key = %key,
            id = ?saved.id,
            encoding = %fetched.encoding,
            "Stored fetched capabilities"
        );
        Ok(saved)
    }

    /// Same as [`get_capabilities`](Self::get_capabilities) without a configured layer.
    pub async fn get_capabilities_for(
        &self,
        url: &str,
        service_type: ServiceType,
        version: Option<&str>,
        credentials: Option<Credentials>,
        force_refresh: bool,
    ) -> ServiceResult<CapabilitiesDocument> {
        let mut layer = LayerRef::new(0, "", url, service_type, version);
        layer.credentials = credentials;
        self.get_capabilities(&layer, force_refresh).await
    }

    /// Persist a payload that was fetched and checked elsewhere.
    pub async fn save_fetched(
        &self,
        layer: &LayerRef,
        data: impl Into<String>,
    ) -> ServiceResult<CapabilitiesDocument> {
        let key = UrlTypeVersionKey::for_layer(layer);
        self.store
            .save(&CapabilitiesDocument::new(&key, data))
            .await
    }
}
