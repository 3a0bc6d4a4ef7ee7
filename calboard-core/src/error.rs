//! Error types for calboard.

use thiserror::Error;

use crate::entry::SourceType;
use crate::mutation::MutationKind;

/// Errors that can occur in calboard operations.
#[derive(Error, Debug)]
pub enum CalboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load {source_type}s: {message}")]
    SourceFetch {
        source_type: SourceType,
        message: String,
    },

    #[error("Failed to {kind} event: {message}")]
    Mutation { kind: MutationKind, message: String },

    #[error("{0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Service error: {0}")]
    Service(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CalboardError {
    fn from(e: serde_json::Error) -> Self {
        CalboardError::Serialization(e.to_string())
    }
}

/// Result type alias for calboard operations.
pub type CalboardResult<T> = Result<T, CalboardError>;
