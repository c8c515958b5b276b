//! Storage for the capabilities updater.
//!
//! Provides:
//! - [`CapabilitiesStore`]: cached GetCapabilities documents
//! - [`LayerService`]: configured layers and their capability-derived properties
//!
//! Each has a PostgreSQL implementation and an in-memory one.

pub mod capabilities;
pub mod layers;
mod schema;

pub use capabilities::{CapabilitiesStore, MemoryCapabilitiesStore, PgCapabilitiesStore};
pub use layers::{LayerService, MemoryLayerService, PgLayerService};
pub use schema::{connect, migrate};
