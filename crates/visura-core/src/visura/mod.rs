//! Registry extract field extraction module.

pub mod confidence;
mod parser;
pub mod rules;

pub use parser::{ExtractionOutcome, VisuraParser};

use std::time::Instant;

use crate::error::ExtractionError;
use crate::models::visura::VisuraRecord;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for registry extract parsers.
pub trait RegistryExtractor {
    /// Parse a record from document text.
    ///
    /// Fails only when there is no text to work on.
    fn parse(&self, text: &str) -> Result<VisuraRecord>;

    /// Parse and wrap the result in an outcome envelope. Never fails.
    fn extract(&self, text: &str) -> ExtractionOutcome {
        let start = Instant::now();
        let result = self.parse(text);
        ExtractionOutcome::from_result(result, start.elapsed().as_millis() as u64)
    }
}
