//! Core library for Italian company-registry extract processing.
//!
//! This crate provides:
//! - Ordered pattern cascades for every registry field
//! - Validators that reject look-alike values (year fragments read as ATECO
//!   codes, truncated purpose text, wrong-length tax identifiers)
//! - Composite extraction of activity codes, officers, address and capital
//! - Confidence scoring under a full or an essential profile
//!
//! Document-to-text conversion is left to the caller.

pub mod error;
pub mod models;
pub mod visura;

pub use error::{ExtractionError, Result, VisuraError};
pub use models::config::{ExtractionConfig, ExtractionProfile, OutputConfig, VisuraConfig};
pub use models::visura::{
    ActivityCode, Address, BusinessType, ConfidenceAssessment, ConfidenceScore, FieldStatus,
    Officer, OfficerRole, ShareCapital, VisuraRecord,
};
pub use visura::rules::{FieldExtractor, PatternLibrary};
pub use visura::{ExtractionOutcome, RegistryExtractor, VisuraParser};
