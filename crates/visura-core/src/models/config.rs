//! Configuration structures for the extraction engine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VisuraError};

/// Main configuration for visura.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisuraConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Which fields are extracted and how confidence is scored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionProfile {
    /// Every field, 7-factor ratio confidence capped at 0.95.
    #[default]
    Full,
    /// Partita IVA, activity code and purpose only, 3-factor 0-100 confidence.
    /// Purpose text must also contain a business keyword.
    Essential,
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Extraction profile.
    pub profile: ExtractionProfile,

    /// Minimum normalized length for an accepted purpose text.
    pub purpose_min_length: usize,

    /// Minimum length for a purpose text taken from the fallback rule.
    pub purpose_fallback_min_length: usize,

    /// Hard cap on purpose text length, in characters.
    pub purpose_max_length: usize,

    /// Activity descriptions shorter than this are replaced.
    pub description_min_length: usize,

    /// Placeholder written by registry tools for missing values.
    pub placeholder: String,

    /// Country of the registered office when not stated.
    pub default_country: String,

    /// Currency of the share capital when not stated.
    pub default_currency: String,

    /// Activity status when no status marker is found.
    pub default_status: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            profile: ExtractionProfile::Full,
            purpose_min_length: 30,
            purpose_fallback_min_length: 20,
            purpose_max_length: 500,
            description_min_length: 5,
            placeholder: "N/D".to_string(),
            default_country: "ITALIA".to_string(),
            default_currency: "EUR".to_string(),
            default_status: "ATTIVA".to_string(),
        }
    }
}

/// Output configuration for callers that serialize results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl VisuraConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| VisuraError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| VisuraError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
