//! Error types for page extraction and batch workflows.
//!
//! Malformed-but-parseable HTML never produces an error: missing rows, cells
//! and images degrade to default field values. Errors are reserved for input
//! that cannot be treated as a page at all, and for the I/O around batches.

use thiserror::Error;

/// Errors that can occur during extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The document has no usable content.
    #[error("malformed document '{subject}': {reason}")]
    MalformedDocument { subject: String, reason: String },

    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Worker pool could not be created.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Bundle or record validation failure.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Invalid or missing input (e.g. non-existent path, wrong extension).
    #[error("{0}")]
    InvalidInput(String),
}

impl ExtractError {
    pub(crate) fn malformed(subject: &str, reason: &str) -> Self {
        Self::MalformedDocument {
            subject: subject.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<dex_builds_core::ValidationError> for ExtractError {
    fn from(err: dex_builds_core::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Convenience alias for results with [`ExtractError`].
pub type Result<T> = std::result::Result<T, ExtractError>;
