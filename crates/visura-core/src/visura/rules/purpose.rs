//! Registered purpose text (oggetto sociale).
//!
//! Strict rules capture whole labelled blocks and reject anything short or
//! cut mid-sentence. Only when no strict candidate survives is the single-line
//! fallback tried, and its result is flagged as partial.

use crate::models::config::{ExtractionConfig, ExtractionProfile};

use super::{CascadeExtractor, FieldExtractor, FieldRules, PatternLibrary};

/// Marker appended to text recovered by the fallback rule.
pub const PARTIAL_MARKER: &str = "...";

/// Function words that cannot end a complete Italian sentence.
const DANGLING_WORDS: [&str; 34] = [
    "E", "O", "MA", "CHE", "DI", "DEL", "DELLA", "DEI", "DEGLI", "DELLE", "A", "AL", "ALLA", "AI",
    "DA", "IN", "NEL", "NELLA", "CON", "PER", "SU", "SUL", "SULLA", "TRA", "FRA", "UN", "UNA",
    "UNO", "IL", "LA", "LO", "I", "GLI", "LE",
];

/// Vocabulary required by the essential profile.
const BUSINESS_KEYWORDS: [&str; 14] = [
    "produzione",
    "commercio",
    "servizi",
    "consulenza",
    "vendita",
    "attività",
    "attivita",
    "gestione",
    "intermediazione",
    "commercializzazione",
    "fornitura",
    "prestazione",
    "realizzazione",
    "sviluppo",
];

/// Accepted purpose text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurposeText {
    pub text: String,
    /// Recovered by the fallback rule.
    pub partial: bool,
}

/// Whether the text was cut mid-sentence.
///
/// True for a trailing comma or colon, a trailing dangling function word, or
/// a trailing single letter.
pub fn is_text_truncated(text: &str) -> bool {
    let trimmed = text.trim_end();
    if trimmed.is_empty() || trimmed.ends_with([',', ':']) {
        return true;
    }

    let last = trimmed
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or_default()
        .to_uppercase();

    let mut chars = last.chars();
    let single_letter = matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic());

    single_letter || DANGLING_WORDS.contains(&last.as_str())
}

/// Whether the text mentions a business activity keyword.
pub fn has_business_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    BUSINESS_KEYWORDS.iter().any(|k| lower.contains(k))
}

pub struct PurposeExtractor<'a> {
    strict: &'a FieldRules,
    fallback: &'a FieldRules,
    config: &'a ExtractionConfig,
}

impl<'a> PurposeExtractor<'a> {
    pub fn new(library: &'a PatternLibrary, config: &'a ExtractionConfig) -> Self {
        Self {
            strict: &library.purpose_strict,
            fallback: &library.purpose_fallback,
            config,
        }
    }

    fn keyword_ok(&self, value: &str) -> bool {
        self.config.profile != ExtractionProfile::Essential || has_business_keyword(value)
    }

    fn accept_strict(&self, value: &str) -> bool {
        value.chars().count() >= self.config.purpose_min_length
            && !is_text_truncated(value)
            && self.keyword_ok(value)
    }

    fn accept_fallback(&self, value: &str) -> bool {
        value.chars().count() >= self.config.purpose_fallback_min_length && self.keyword_ok(value)
    }

    fn cap(&self, value: &str) -> String {
        value
            .chars()
            .take(self.config.purpose_max_length)
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    fn extractor(&self, rules: &'a FieldRules) -> CascadeExtractor<'a> {
        let config: &'a ExtractionConfig = self.config;
        CascadeExtractor::new(rules).with_placeholder(&config.placeholder)
    }
}

impl FieldExtractor for PurposeExtractor<'_> {
    type Output = PurposeText;

    fn extract(&self, text: &str) -> Option<PurposeText> {
        if let Some(found) = self
            .extractor(self.strict)
            .extract_where(text, |v| self.accept_strict(v))
        {
            return Some(PurposeText {
                text: self.cap(&found.value),
                partial: false,
            });
        }

        self.extractor(self.fallback)
            .extract_where(text, |v| self.accept_fallback(v))
            .map(|found| PurposeText {
                text: format!("{}{PARTIAL_MARKER}", self.cap(&found.value)),
                partial: true,
            })
    }

    /// Every strict candidate that would be accepted, in cascade order.
    fn extract_all(&self, text: &str) -> Vec<PurposeText> {
        self.extractor(self.strict)
            .extract_all(text)
            .into_iter()
            .filter(|m| self.accept_strict(&m.value))
            .map(|m| PurposeText {
                text: self.cap(&m.value),
                partial: false,
            })
            .collect()
    }
}

pub fn extract_purpose(
    text: &str,
    library: &PatternLibrary,
    config: &ExtractionConfig,
) -> Option<PurposeText> {
    PurposeExtractor::new(library, config).extract(text)
}
