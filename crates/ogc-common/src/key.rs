//! Identity of a capabilities document and of a refresh group.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::layer::LayerRef;
use crate::{simplify_url, ServiceType};

/// (url, type, version) tuple.
///
/// The url is always stored simplified, so equal endpoints compare equal no
/// matter how the layer configuration spelled them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UrlTypeVersionKey {
    url: String,
    service_type: ServiceType,
    version: Option<String>,
}

impl UrlTypeVersionKey {
    pub fn new(url: &str, service_type: ServiceType, version: Option<&str>) -> Self {
        Self {
            url: simplify_url(url),
            service_type,
            version: normalize_version(version),
        }
    }

    pub fn for_layer(layer: &LayerRef) -> Self {
        Self::new(&layer.url, layer.service_type, layer.version.as_deref())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn service_type(&self) -> ServiceType {
        self.service_type
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

impl fmt::Display for UrlTypeVersionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.service_type,
            self.version.as_deref().unwrap_or("*"),
            self.url
        )
    }
}

/// Blank versions mean "negotiate", same as no version at all.
pub fn normalize_version(version: Option<&str>) -> Option<String> {
    version
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equal_endpoints_share_key() {
        let a = UrlTypeVersionKey::new("https://u:p@Maps.Example.com/wms?", ServiceType::Wms, Some("1.3.0"));
        let b = UrlTypeVersionKey::new("https://maps.example.com/wms", ServiceType::Wms, Some("1.3.0"));
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_blank_version_is_none() {
        let key = UrlTypeVersionKey::new("http://x/wms", ServiceType::Wms, Some("  "));
        assert_eq!(key.version(), None);
    }

    #[test]
    fn test_any_field_difference_breaks_equality() {
        let base = UrlTypeVersionKey::new("http://x/wms", ServiceType::Wms, Some("1.3.0"));
        assert_ne!(base, UrlTypeVersionKey::new("http://y/wms", ServiceType::Wms, Some("1.3.0")));
        assert_ne!(base, UrlTypeVersionKey::new("http://x/wms", ServiceType::Wmts, Some("1.3.0")));
        assert_ne!(base, UrlTypeVersionKey::new("http://x/wms", ServiceType::Wms, Some("1.1.1")));
        assert_ne!(base, UrlTypeVersionKey::new("http://x/wms", ServiceType::Wms, None));
    }
}
