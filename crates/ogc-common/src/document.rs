//! Cached GetCapabilities document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::key::normalize_version;
use crate::{ServiceType, UrlTypeVersionKey};

/// A validated GetCapabilities response, unique by (url, type, version).
///
/// `data` holds the decoded XML with its prolog removed. Documents are values:
/// a refresh supersedes the stored row, it never edits a loaded document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilitiesDocument {
    /// Row id, `None` until the document has been saved
    pub id: Option<i64>,
    pub url: String,
    pub service_type: ServiceType,
    pub version: Option<String>,
    pub data: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CapabilitiesDocument {
    /// Unsaved draft for the given key.
    pub fn new(key: &UrlTypeVersionKey, data: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            url: key.url().to_string(),
            service_type: key.service_type(),
            version: normalize_version(key.version()),
            data: data.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn key(&self) -> UrlTypeVersionKey {
        UrlTypeVersionKey::new(&self.url, self.service_type, self.version.as_deref())
    }

    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }
}
