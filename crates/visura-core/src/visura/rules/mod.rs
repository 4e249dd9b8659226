//! Rule-based field extractors for registry extracts.
//!
//! Every field is described by a [`FieldRules`] cascade: an ordered list of
//! [`PatternRule`]s tried in declaration order. The first rule that yields a
//! match accepted by its validator wins, regardless of what later rules
//! would have found.

pub mod address;
pub mod ateco;
pub mod capital;
pub mod contacts;
pub mod dates;
pub mod officers;
pub mod patterns;
pub mod purpose;
pub mod registry;
pub mod tax_id;

pub use address::extract_address;
pub use ateco::{extract_activity_codes, validate_activity_code, ActivityCodeExtractor};
pub use capital::{extract_share_capital, parse_italian_amount};
pub use contacts::{validate_email, validate_phone, validate_website};
pub use dates::validate_registry_date;
pub use officers::{extract_officers, OfficerExtractor};
pub use patterns::{PatternLibrary, DEFAULT_LIBRARY};
pub use purpose::{extract_purpose, is_text_truncated, PurposeExtractor, PurposeText};
pub use registry::{classify_business, validate_rea_number};
pub use tax_id::{extract_partita_iva, validate_codice_fiscale, validate_partita_iva};

use regex::{Captures, Regex, RegexBuilder};
use tracing::{debug, trace};

use crate::error::ExtractionError;
use crate::models::visura::OfficerRole;

/// Acceptance predicate applied to a normalized capture.
pub type Validator = fn(&str) -> bool;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// An accepted value together with where it came from.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0) of the rule that produced it.
    pub confidence: f32,
    /// Position of the whole match in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
    /// Index of the winning rule within its cascade.
    pub rule: usize,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
            rule: 0,
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }

    pub fn with_rule(mut self, rule: usize) -> Self {
        self.rule = rule;
        self
    }
}

/// One regular expression in a field cascade.
#[derive(Debug, Clone)]
pub struct PatternRule {
    regex: Regex,
    group: usize,
    confidence: f32,
    validator: Option<Validator>,
    role: Option<OfficerRole>,
}

impl PatternRule {
    /// Compile a case-insensitive, multi-line rule capturing `group`.
    pub fn new(field: &str, pattern: &str, group: usize) -> Result<Self, ExtractionError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .multi_line(true)
            .build()
            .map_err(|source| ExtractionError::Pattern {
                field: field.to_string(),
                source,
            })?;

        Ok(Self {
            regex,
            group,
            confidence: 0.9,
            validator: None,
            role: None,
        })
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_role(mut self, role: OfficerRole) -> Self {
        self.role = Some(role);
        self
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn group(&self) -> usize {
        self.group
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn role(&self) -> Option<OfficerRole> {
        self.role
    }

    /// Whether a normalized value passes this rule's validator.
    pub fn accepts(&self, value: &str) -> bool {
        self.validator.is_none_or(|validate| validate(value))
    }

    /// Iterate matches in document order.
    pub fn matches<'r, 't>(&'r self, text: &'t str) -> impl Iterator<Item = RuleMatch<'t>> + 'r
    where
        't: 'r,
    {
        self.regex.captures_iter(text).map(move |caps| RuleMatch {
            caps,
            group: self.group,
        })
    }
}

/// A single regex match, exposing groups by index whatever the pattern shape.
#[derive(Debug)]
pub struct RuleMatch<'t> {
    caps: Captures<'t>,
    group: usize,
}

impl<'t> RuleMatch<'t> {
    /// The rule's designated capture group.
    pub fn value(&self) -> Option<&'t str> {
        self.get(self.group)
    }

    /// Any capture group; `None` when it did not participate.
    pub fn get(&self, index: usize) -> Option<&'t str> {
        self.caps.get(index).map(|m| m.as_str())
    }

    /// Byte offset where the given group starts.
    pub fn start_of(&self, index: usize) -> Option<usize> {
        self.caps.get(index).map(|m| m.start())
    }

    /// Span of the whole match.
    pub fn span(&self) -> (usize, usize) {
        self.caps
            .get(0)
            .map(|m| (m.start(), m.end()))
            .unwrap_or_default()
    }

    /// Text of the whole match.
    pub fn as_str(&self) -> &'t str {
        self.caps.get(0).map(|m| m.as_str()).unwrap_or_default()
    }
}

/// Ordered rule cascade for one field.
#[derive(Debug, Clone)]
pub struct FieldRules {
    name: String,
    rules: Vec<PatternRule>,
}

impl FieldRules {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    /// Compile patterns capturing group 1, ranked by declaration order.
    pub fn compile(name: &str, patterns: &[&str]) -> Result<Self, ExtractionError> {
        let mut rules = Self::new(name);
        for (rank, pattern) in patterns.iter().enumerate() {
            let rule = PatternRule::new(name, pattern, 1)?.with_confidence(rank_confidence(rank));
            rules.rules.push(rule);
        }
        Ok(rules)
    }

    pub fn with_rule(mut self, rule: PatternRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Attach a validator to every rule that has none yet.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        for rule in &mut self.rules {
            if rule.validator.is_none() {
                rule.validator = Some(validator);
            }
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Confidence of a rule by its position in the cascade.
fn rank_confidence(rank: usize) -> f32 {
    (0.95 - 0.1 * rank as f32).max(0.5)
}

/// Applies a [`FieldRules`] cascade to text.
pub struct CascadeExtractor<'a> {
    rules: &'a FieldRules,
    placeholder: &'a str,
}

impl<'a> CascadeExtractor<'a> {
    pub fn new(rules: &'a FieldRules) -> Self {
        Self {
            rules,
            placeholder: "N/D",
        }
    }

    /// Set the sentinel that registry tools write for missing values.
    pub fn with_placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// First accepted value that also satisfies `accept`.
    pub fn extract_where<F>(&self, text: &str, accept: F) -> Option<ExtractionMatch<String>>
    where
        F: Fn(&str) -> bool,
    {
        self.candidates(text, &accept, true).into_iter().next()
    }

    fn candidates<F>(&self, text: &str, accept: &F, first_only: bool) -> Vec<ExtractionMatch<String>>
    where
        F: Fn(&str) -> bool,
    {
        let mut results = Vec::new();

        for (index, rule) in self.rules.rules().iter().enumerate() {
            for m in rule.matches(text) {
                let Some(raw) = m.value() else {
                    continue;
                };

                let value = normalize_whitespace(raw);
                if value.is_empty() || value.eq_ignore_ascii_case(self.placeholder) {
                    continue;
                }

                if !rule.accepts(&value) || !accept(&value) {
                    trace!(field = self.rules.name(), rule = index, %value, "candidate rejected");
                    continue;
                }

                let (start, end) = m.span();
                debug!(field = self.rules.name(), rule = index, "field matched");
                results.push(
                    ExtractionMatch::new(value, rule.confidence(), m.as_str())
                        .with_position(start, end)
                        .with_rule(index),
                );

                if first_only {
                    return results;
                }
            }
        }

        if results.is_empty() {
            trace!(field = self.rules.name(), "no rule matched");
        }

        results
    }
}

impl FieldExtractor for CascadeExtractor<'_> {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_where(text, |_| true)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.candidates(text, &|_: &str| true, false)
    }
}

/// Collapse whitespace runs to one space and trim both ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
