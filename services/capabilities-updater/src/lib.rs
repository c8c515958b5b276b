//! OGC capabilities cache and layer refresh.
//!
//! - [`CapabilitiesCache`]: read-through cache of GetCapabilities documents
//! - [`HttpCapabilitiesFetcher`]: requests and validates documents
//! - [`RefreshJob`] / [`Scheduler`]: periodic refresh of layer properties
//! - [`refresh_layer`]: refresh of one layer when it is saved

pub mod cache;
pub mod config;
pub mod fetcher;
pub mod grouper;
pub mod job;
pub mod layer_refresh;
pub mod scheduler;

pub use cache::CapabilitiesCache;
pub use config::FetchConfig;
pub use fetcher::{
    capabilities_url, validate_response, CapabilitiesSource, FetchRequest, FetchedCapabilities,
    HttpCapabilitiesFetcher, ValidatedBody,
};
pub use grouper::{group_layers, LayerGroup};
pub use job::{RefreshJob, RefreshSummary};
pub use layer_refresh::{refresh_layer, LayerRefreshOutcome, METADATA_READ_FAILURE};
pub use scheduler::Scheduler;
