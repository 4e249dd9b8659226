//! Error types for the visura-core library.

use thiserror::Error;

/// Main error type for the visura library.
#[derive(Error, Debug)]
pub enum VisuraError {
    /// Field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to registry field extraction.
///
/// Only [`ExtractionError::InputUnavailable`] ever reaches a caller of the
/// parser. Missing and rejected fields are absorbed as absent values and show
/// up in diagnostics only.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// No rule in the field's cascade produced a match.
    #[error("missing field: {0}")]
    MissingField(String),

    /// A rule matched but the captured value failed validation.
    #[error("validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// A pattern in a custom rule set could not be compiled.
    #[error("invalid pattern for {field}: {source}")]
    Pattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    /// The document text could not be obtained at all.
    #[error("document text unavailable: {0}")]
    InputUnavailable(String),
}

impl ExtractionError {
    /// Whether this error is absorbed per field rather than surfaced.
    pub fn is_field_level(&self) -> bool {
        matches!(self, Self::MissingField(_) | Self::Validation { .. })
    }
}

/// Result type for the visura library.
pub type Result<T> = std::result::Result<T, VisuraError>;
