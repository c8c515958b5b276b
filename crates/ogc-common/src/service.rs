//! OGC service types handled by the capabilities cache.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ServiceError;

/// OGC web service type of a configured layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Wms,
    Wfs,
    Wmts,
}

impl ServiceType {
    /// Value of the `service=` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Wms => "WMS",
            ServiceType::Wfs => "WFS",
            ServiceType::Wmts => "WMTS",
        }
    }

    /// Layer type name as stored with the layer configuration.
    pub fn layer_type(&self) -> &'static str {
        match self {
            ServiceType::Wms => "wmslayer",
            ServiceType::Wfs => "wfslayer",
            ServiceType::Wmts => "wmtslayer",
        }
    }

    /// Query parameter used to ask for a specific version.
    ///
    /// WMS uses `version`, OWS-common based services negotiate with `acceptVersions`.
    pub fn version_negotiation_key(&self) -> &'static str {
        match self {
            ServiceType::Wms => "version",
            ServiceType::Wfs | ServiceType::Wmts => "acceptVersions",
        }
    }

    /// Whether layers of this type are refreshed by the grouped refresh job.
    ///
    /// WFS capabilities are refreshed per layer.
    pub fn supports_group_refresh(&self) -> bool {
        matches!(self, ServiceType::Wms | ServiceType::Wmts)
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wms" | "wmslayer" => Ok(ServiceType::Wms),
            "wfs" | "wfslayer" => Ok(ServiceType::Wfs),
            "wmts" | "wmtslayer" => Ok(ServiceType::Wmts),
            other => Err(ServiceError::Config(format!("Unknown service type: {}", other))),
        }
    }
}
