//! OGC WMS and WMTS capabilities parsing.
//!
//! Supports:
//! - WMS 1.1.1 and WMS 1.3.0 capabilities, including property inheritance
//!   through the layer tree
//! - WMTS 1.0.0 capabilities with tile matrix sets
//!
//! Parsed documents are turned into [`LayerPatch`](ogc_common::LayerPatch)
//! values, one per configured layer, by the functions in [`patch`].

pub mod error;
pub mod patch;
pub mod wms;
pub mod wmts;
mod xml;

pub use error::{ParseError, ParseResult};
pub use patch::{wms_layer_patch, wmts_layer_patch};
pub use wms::{parse_wms, WmsCapabilities, WmsLayer};
pub use wmts::{parse_wmts, TileMatrix, TileMatrixSet, WmtsCapabilities, WmtsLayer};
