//! Layer references and the capability-derived properties written back to them.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{simplify_url, ServiceError, ServiceResult, ServiceType};

/// Unique identifier for a configured layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(pub i64);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Basic auth credentials for a protected service.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Build from optional columns; a missing or empty username means anonymous.
    pub fn from_parts(username: Option<String>, password: Option<String>) -> Option<Self> {
        match username {
            Some(user) if !user.is_empty() => Some(Self::new(user, password.unwrap_or_default())),
            _ => None,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// A configured service layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerRef {
    pub id: LayerId,

    /// Layer name as published in the service capabilities
    pub name: String,

    /// Service URL as configured, may carry credentials or vendor parameters
    pub url: String,

    pub service_type: ServiceType,

    /// Requested service version, `None` lets the service decide
    pub version: Option<String>,

    #[serde(default)]
    pub credentials: Option<Credentials>,

    /// Properties derived from the service capabilities
    #[serde(default)]
    pub capabilities: LayerCapabilities,

    #[serde(default)]
    pub capabilities_last_updated: Option<DateTime<Utc>>,
}

impl LayerRef {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        url: impl Into<String>,
        service_type: ServiceType,
        version: Option<&str>,
    ) -> Self {
        Self {
            id: LayerId(id),
            name: name.into(),
            url: url.into(),
            service_type,
            version: version.map(str::to_string),
            credentials: None,
            capabilities: LayerCapabilities::default(),
            capabilities_last_updated: None,
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// URL used for identity: credentials, fragments and empty query segments removed.
    pub fn simplified_url(&self) -> String {
        simplify_url(&self.url)
    }

    /// New layer value with the patch applied.
    ///
    /// The receiver is left untouched so a failure later in the same refresh
    /// can never leave a half-updated layer behind.
    pub fn with_patch(&self, patch: &LayerPatch, updated_at: DateTime<Utc>) -> ServiceResult<Self> {
        if patch.layer_id != self.id {
            return Err(ServiceError::Config(format!(
                "Patch for layer {} applied to layer {}",
                patch.layer_id, self.id
            )));
        }
        let mut updated = self.clone();
        updated.capabilities = patch.capabilities.clone();
        updated.capabilities_last_updated = Some(updated_at);
        Ok(updated)
    }
}

/// Style advertised for a layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleInfo {
    pub name: String,
    pub title: Option<String>,
    pub legend_url: Option<String>,
}

/// WMTS RESTful resource template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceUrl {
    pub format: String,
    pub resource_type: String,
    pub template: String,
}

/// Layer properties read from service capabilities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerCapabilities {
    #[serde(default)]
    pub styles: Vec<StyleInfo>,

    /// Image or tile formats
    #[serde(default)]
    pub formats: Vec<String>,

    /// GetFeatureInfo formats
    #[serde(default)]
    pub info_formats: Vec<String>,

    #[serde(default)]
    pub queryable: bool,

    /// Smallest scale denominator the layer is visible at
    #[serde(default)]
    pub min_scale: Option<f64>,

    /// Largest scale denominator the layer is visible at
    #[serde(default)]
    pub max_scale: Option<f64>,

    /// Supported coordinate reference systems
    #[serde(default)]
    pub crs: BTreeSet<String>,

    /// Coverage as WKT in EPSG:4326
    #[serde(default)]
    pub geometry: Option<String>,

    /// WMTS: CRS to tile matrix set identifier
    #[serde(default)]
    pub tile_matrix_sets: BTreeMap<String, String>,

    #[serde(default)]
    pub resource_urls: Vec<ResourceUrl>,

    /// Service version the properties were read from
    #[serde(default)]
    pub version: Option<String>,
}

impl LayerCapabilities {
    pub fn supports_crs(&self, crs: &str) -> bool {
        self.crs.iter().any(|c| c.eq_ignore_ascii_case(crs))
    }

    pub fn get_style(&self, name: &str) -> Option<&StyleInfo> {
        self.styles.iter().find(|s| s.name == name)
    }
}

/// Capability-derived properties for one layer, produced by parsing and
/// consumed by whoever persists the layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerPatch {
    pub layer_id: LayerId,
    pub capabilities: LayerCapabilities,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_patch_returns_new_value() {
        let layer = LayerRef::new(7, "roads", "http://x/wms", ServiceType::Wms, Some("1.3.0"));
        let mut caps = LayerCapabilities::default();
        caps.queryable = true;
        caps.crs.insert("EPSG:3067".to_string());
        let patch = LayerPatch {
            layer_id: LayerId(7),
            capabilities: caps,
        };

        let updated = layer.with_patch(&patch, Utc::now()).unwrap();
        assert!(updated.capabilities.queryable);
        assert!(updated.capabilities.supports_crs("epsg:3067"));
        assert!(updated.capabilities_last_updated.is_some());
        assert!(!layer.capabilities.queryable);
        assert!(layer.capabilities_last_updated.is_none());
    }

    #[test]
    fn test_with_patch_rejects_other_layer() {
        let layer = LayerRef::new(7, "roads", "http://x/wms", ServiceType::Wms, None);
        let patch = LayerPatch {
            layer_id: LayerId(8),
            capabilities: LayerCapabilities::default(),
        };
        assert!(layer.with_patch(&patch, Utc::now()).is_err());
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::new("admin", "hunter2");
        let printed = format!("{:?}", creds);
        assert!(printed.contains("admin"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn test_credentials_from_parts() {
        assert!(Credentials::from_parts(None, Some("x".into())).is_none());
        assert!(Credentials::from_parts(Some(String::new()), None).is_none());
        let creds = Credentials::from_parts(Some("u".into()), None).unwrap();
        assert_eq!(creds.password, "");
    }

    #[test]
    fn test_capabilities_json_defaults() {
        let caps: LayerCapabilities = serde_json::from_str("{}").unwrap();
        assert_eq!(caps, LayerCapabilities::default());
    }
}
