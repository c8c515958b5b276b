//! Error types for capabilities fetching, caching and refresh.

use thiserror::Error;

/// Result type alias using ServiceError.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Primary error type for capabilities operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    // === Fetch Errors ===
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Unexpected status code: {0}")]
    UnexpectedStatus(u16),

    #[error("Unexpected Content-Type: {0}")]
    UnexpectedContentType(String),

    // === Validation Errors ===
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Expected {what} '{expected}', got '{actual}'")]
    Mismatch {
        what: &'static str,
        expected: String,
        actual: String,
    },

    // === Parse Errors ===
    #[error("Failed to parse capabilities: {0}")]
    Parse(String),

    #[error("Layer not found in capabilities: {0}")]
    LayerNotFound(String),

    // === Storage Errors ===
    #[error("Database error: {0}")]
    DatabaseError(String),

    // === Infrastructure Errors ===
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ServiceError {
    /// Stable label for log fields and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::NetworkError(_) => "network",
            ServiceError::UnexpectedStatus(_) => "unexpected_status",
            ServiceError::UnexpectedContentType(_) => "unexpected_content_type",
            ServiceError::Validation(_) | ServiceError::Mismatch { .. } => "validation",
            ServiceError::Parse(_) | ServiceError::LayerNotFound(_) => "parse",
            ServiceError::DatabaseError(_) => "database",
            ServiceError::Config(_) => "config",
        }
    }

    /// Whether the error came out of response validation (encoding, root element).
    pub fn is_validation(&self) -> bool {
        self.kind() == "validation"
    }

    pub fn mismatch(
        what: &'static str,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        ServiceError::Mismatch {
            what,
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::DatabaseError(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_message_names_both_values() {
        let err = ServiceError::mismatch("root element", "WMS_Capabilities", "WMT_MS_Capabilities");
        assert_eq!(
            err.to_string(),
            "Expected root element 'WMS_Capabilities', got 'WMT_MS_Capabilities'"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn test_kinds() {
        assert_eq!(ServiceError::NetworkError("x".into()).kind(), "network");
        assert_eq!(ServiceError::UnexpectedStatus(404).kind(), "unexpected_status");
        assert_eq!(ServiceError::LayerNotFound("a".into()).kind(), "parse");
        assert!(!ServiceError::Parse("bad".into()).is_validation());
    }
}
