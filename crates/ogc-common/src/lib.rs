//! Common types shared by the capabilities parser, storage and updater service.

pub mod bbox;
pub mod crs;
pub mod document;
pub mod error;
pub mod key;
pub mod layer;
pub mod service;
pub mod url;

pub use bbox::BoundingBox;
pub use crs::normalize_crs;
pub use document::CapabilitiesDocument;
pub use error::{ServiceError, ServiceResult};
pub use key::UrlTypeVersionKey;
pub use layer::{
    Credentials, LayerCapabilities, LayerId, LayerPatch, LayerRef, ResourceUrl, StyleInfo,
};
pub use service::ServiceType;
pub use self::url::{has_query_param, simplify_url};
