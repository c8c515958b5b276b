//! Error types for the capabilities parser.

use ogc_common::ServiceError;
use thiserror::Error;

/// Errors that can occur while parsing capabilities.
#[derive(Error, Debug, Clone)]
pub enum ParseError {
    #[error("Malformed XML: {0}")]
    Xml(String),

    #[error("Unexpected root element: expected {expected}, got {actual}")]
    UnexpectedRoot { expected: &'static str, actual: String },

    #[error("Missing required element: {0}")]
    MissingElement(&'static str),

    #[error("Invalid number in {element}: {value}")]
    InvalidNumber { element: &'static str, value: String },

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Layer not found: {0}")]
    LayerNotFound(String),
}

/// Result type for parser operations.
pub type ParseResult<T> = std::result::Result<T, ParseError>;

impl From<quick_xml::Error> for ParseError {
    fn from(err: quick_xml::Error) -> Self {
        ParseError::Xml(err.to_string())
    }
}

impl From<ParseError> for ServiceError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::LayerNotFound(name) => ServiceError::LayerNotFound(name),
            other => ServiceError::Parse(other.to_string()),
        }
    }
}
