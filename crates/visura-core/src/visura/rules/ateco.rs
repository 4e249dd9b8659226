//! ATECO activity codes.
//!
//! Activity codes collide lexically with year fragments (`20.21`) and decimal
//! amounts, so candidates only come from labelled contexts or from
//! line-leading `code - description` listings, and every candidate goes
//! through [`validate_activity_code`].

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use tracing::{debug, trace};

use crate::error::ExtractionError;
use crate::models::visura::ActivityCode;

use super::{normalize_whitespace, FieldExtractor, FieldRules, PatternLibrary};

/// Description used when neither the text nor the table has one.
pub const GENERIC_DESCRIPTION: &str = "Attività economica";

lazy_static! {
    static ref DESCRIPTIONS: HashMap<&'static str, &'static str> = HashMap::from([
        ("62.01", "Produzione di software non connesso all'edizione"),
        ("62.02", "Consulenza nel settore delle tecnologie dell'informatica"),
        ("62.03", "Gestione di strutture e apparecchiature informatiche"),
        ("62.09", "Altre attività dei servizi connessi alle tecnologie dell'informatica"),
        ("63.11", "Elaborazione dei dati, hosting e attività connesse"),
        ("63.12", "Portali web"),
        ("47.91", "Commercio al dettaglio per corrispondenza o attraverso internet"),
        ("70.22", "Consulenza imprenditoriale e altra consulenza amministrativo-gestionale"),
    ]);
    static ref DATE_TAIL: Regex = Regex::new(r"\d{1,2}/\d{1,2}/\d{4}.*$").unwrap();
    static ref HEADCOUNT_TAIL: Regex = Regex::new(r"(?i)\baddetti\b.*$").unwrap();
    static ref DECREE_REFERENCE: Regex = Regex::new(r"(?i)^[a-z\s\-]+\bdel\s+decreto\b").unwrap();
    static ref ONLY_DIGITS: Regex = Regex::new(r"^\s*\d+\s*$").unwrap();
    static ref DATE_LABEL: Regex = Regex::new(r"(?i)\b(?:data|inizio)\b").unwrap();
}

/// Accept `DD.DD` / `DD.DD.DD` codes that cannot be read as a year fragment.
///
/// Rejected: a leading group of 00 or above 99, and a leading group of 19, 20
/// or 21 followed by any two-digit group.
pub fn validate_activity_code(code: &str) -> bool {
    let groups: Vec<&str> = code.split('.').collect();
    if !(2..=3).contains(&groups.len())
        || !groups
            .iter()
            .all(|g| g.len() == 2 && g.bytes().all(|b| b.is_ascii_digit()))
    {
        return false;
    }

    let (Ok(division), Ok(group)) = (groups[0].parse::<u8>(), groups[1].parse::<u8>()) else {
        return false;
    };

    if division == 0 || division > 99 {
        return false;
    }
    !(matches!(division, 19..=21) && group <= 99)
}

/// Static description for a code, looked up by its `DD.DD` prefix.
pub fn lookup_description(code: &str) -> Option<&'static str> {
    code.get(..5).and_then(|key| DESCRIPTIONS.get(key).copied())
}

/// Cut a trailing date or headcount note.
///
/// A description that is only digits, or that opens with a decree reference,
/// is dropped entirely. Text is only ever cut, so the result stays a
/// substring of the input.
pub fn clean_description(raw: &str) -> String {
    if ONLY_DIGITS.is_match(raw) || DECREE_REFERENCE.is_match(raw) {
        return String::new();
    }

    let text = DATE_TAIL.replace(raw, "");
    let text = HEADCOUNT_TAIL.replace(&text, "");

    let text = normalize_whitespace(&text);
    text.trim_start_matches(['-', '–', ':', ' '])
        .trim_end_matches(['*', '-', '–', '•', ' ', ',', ';'])
        .to_string()
}

/// `01.02.2010` or `12.50/2020`: the code is a fragment of a longer number.
fn continues_as_number(rest: &str) -> bool {
    let mut chars = rest.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some('.' | '/' | ','), Some(c)) if c.is_ascii_digit()
    )
}

/// `Data inizio attività: 01.03.19`: the line labels a date, not a code.
fn follows_date_label(text: &str, position: usize) -> bool {
    let line_start = text[..position].rfind('\n').map_or(0, |i| i + 1);
    DATE_LABEL.is_match(&text[line_start..position])
}

/// A code found in the text, before deduplication.
struct Candidate<'t> {
    position: usize,
    code: &'t str,
    description: Option<&'t str>,
}

/// Composite extractor for the activity code list.
pub struct ActivityCodeExtractor<'a> {
    labelled: &'a FieldRules,
    listing: &'a FieldRules,
    min_description: usize,
}

impl<'a> ActivityCodeExtractor<'a> {
    pub fn new(library: &'a PatternLibrary) -> Self {
        Self {
            labelled: &library.activity_labelled,
            listing: &library.activity_listing,
            min_description: 5,
        }
    }

    pub fn with_min_description(mut self, min_description: usize) -> Self {
        self.min_description = min_description;
        self
    }

    fn candidates<'t>(&self, text: &'t str, rules: &FieldRules) -> Vec<Candidate<'t>> {
        let mut found = Vec::new();

        for (index, rule) in rules.rules().iter().enumerate() {
            for m in rule.matches(text) {
                let Some(code) = m.value() else {
                    continue;
                };

                let position = m.start_of(rule.group()).unwrap_or_default();
                let rest = text.get(position + code.len()..).unwrap_or_default();
                if !validate_activity_code(code)
                    || continues_as_number(rest)
                    || follows_date_label(text, position)
                {
                    let error = ExtractionError::Validation {
                        field: rules.name().to_string(),
                        reason: format!("{code} is not a valid activity code"),
                    };
                    trace!(rule = index, %error, "candidate rejected");
                    continue;
                }

                found.push(Candidate {
                    position,
                    code,
                    description: m.get(2),
                });
            }
        }

        found
    }

    fn describe(&self, text: &str, code: &str, raw: Option<&str>) -> String {
        let cleaned = raw.map(clean_description).unwrap_or_default();
        if cleaned.chars().count() >= self.min_description {
            return cleaned;
        }

        if let Some(found) = self.describe_from_text(text, code) {
            return found;
        }

        lookup_description(code)
            .unwrap_or(GENERIC_DESCRIPTION)
            .to_string()
    }

    /// Description written next to another occurrence of the same code.
    fn describe_from_text(&self, text: &str, code: &str) -> Option<String> {
        let pattern = format!(r"{}\b\s*[-–:]\s*([^\n]{{5,100}})", regex::escape(code));
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .ok()?;

        regex
            .captures_iter(text)
            .filter_map(|caps| caps.get(1).map(|m| clean_description(m.as_str())))
            .find(|description| description.chars().count() >= self.min_description)
    }
}

impl FieldExtractor for ActivityCodeExtractor<'_> {
    type Output = ActivityCode;

    /// The primary activity code.
    fn extract(&self, text: &str) -> Option<ActivityCode> {
        self.extract_all(text).into_iter().next()
    }

    /// All codes in document order, deduplicated, first one primary.
    fn extract_all(&self, text: &str) -> Vec<ActivityCode> {
        let mut found = self.candidates(text, self.labelled);
        if found.is_empty() {
            found = self.candidates(text, self.listing);
        }
        found.sort_by_key(|c| c.position);

        let mut seen = HashSet::new();
        let mut codes = Vec::new();
        for candidate in found {
            if !seen.insert(candidate.code) {
                continue;
            }

            codes.push(ActivityCode {
                code: candidate.code.to_string(),
                description: self.describe(text, candidate.code, candidate.description),
                primary: codes.is_empty(),
            });
        }

        debug!(count = codes.len(), "activity codes extracted");
        codes
    }
}

/// Extract the activity code list with the given description threshold.
pub fn extract_activity_codes(
    text: &str,
    library: &PatternLibrary,
    min_description: usize,
) -> Vec<ActivityCode> {
    ActivityCodeExtractor::new(library)
        .with_min_description(min_description)
        .extract_all(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visura::rules::DEFAULT_LIBRARY;
    use pretty_assertions::assert_eq;

    fn codes(text: &str) -> Vec<ActivityCode> {
        extract_activity_codes(text, &DEFAULT_LIBRARY, 5)
    }

    #[test]
    fn test_validate_activity_code() {
        assert!(validate_activity_code("62.01"));
        assert!(validate_activity_code("62.01.00"));
        assert!(validate_activity_code("01.11"));
        assert!(validate_activity_code("18.12"));
        assert!(validate_activity_code("22.29.09"));
        assert!(!validate_activity_code("20.21"));
        assert!(!validate_activity_code("19.99"));
        assert!(!validate_activity_code("21.00"));
        assert!(!validate_activity_code("00.50"));
        assert!(!validate_activity_code("6.01"));
        assert!(!validate_activity_code("62.011"));
        assert!(!validate_activity_code("62-01"));
        assert!(!validate_activity_code("62.01.00.00"));
    }

    #[test]
    fn test_year_prefixes_exhaustively_rejected() {
        for division in [19, 20, 21] {
            for group in 0..=99 {
                let code = format!("{division:02}.{group:02}");
                assert!(!validate_activity_code(&code), "{code} accepted");
            }
        }
    }

    #[test]
    fn test_dotted_date_is_not_an_activity() {
        assert!(codes("Data inizio attività: 01.02.2010").is_empty());
        assert!(codes("Codice ATECO: 12.50,00").is_empty());
    }

    #[test]
    fn test_labelled_code_with_description() {
        assert_eq!(
            codes("Codice ATECO: 62.01 - Produzione di software"),
            vec![ActivityCode {
                code: "62.01".to_string(),
                description: "Produzione di software".to_string(),
                primary: true,
            }]
        );
    }

    #[test]
    fn test_year_like_token_is_not_an_activity() {
        assert!(codes("Bilancio 20.22 depositato il 30/04/2023").is_empty());
        assert!(codes("Codice ATECO: 20.22 del 01/01/2022").is_empty());
    }

    #[test]
    fn test_document_order_dedup_and_single_primary() {
        let text = "Attività prevalente: 62.01 - Sviluppo software\n\
                    Codice ATECO: 63.11 - Hosting\n\
                    Codice ATECO: 62.01 - Sviluppo software";
        let found = codes(text);

        let list: Vec<_> = found.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(list, vec!["62.01", "63.11"]);
        assert_eq!(found.iter().filter(|c| c.primary).count(), 1);
        assert!(found[0].primary);
    }

    #[test]
    fn test_short_description_uses_table_then_generic() {
        let found = codes("Codice ATECO: 62.02\nCodice ATECO: 85.59");
        assert_eq!(
            found[0].description,
            "Consulenza nel settore delle tecnologie dell'informatica"
        );
        assert_eq!(found[1].description, GENERIC_DESCRIPTION);
    }

    #[test]
    fn test_description_found_elsewhere_in_text() {
        let text = "Codice ATECO: 85.59\n...\n85.59 - Formazione professionale";
        assert_eq!(codes(text)[0].description, "Formazione professionale");
    }

    #[test]
    fn test_listing_used_only_without_labels() {
        let listing = "Elenco attività\n62.01 - Produzione di software\n63.11 - IT";
        let found = codes(listing);
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].description, "Elaborazione dei dati, hosting e attività connesse");

        let labelled = format!("{listing}\nCodice ATECO: 70.22");
        let found = codes(&labelled);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code, "70.22");
    }

    #[test]
    fn test_clean_description() {
        assert_eq!(
            clean_description("Produzione di software 01/01/2010 Addetti 5"),
            "Produzione di software"
        );
        assert_eq!(clean_description("Commercio all'ingrosso Addetti: 3"), "Commercio all'ingrosso");
        assert_eq!(clean_description("1234"), "");
        assert_eq!(clean_description("BIS DEL DECRETO LEGGE 24"), "");
    }

    #[test]
    fn test_date_with_short_year_is_not_a_code() {
        assert!(codes("Data inizio attività: 01.03.19").is_empty());

        let found = codes("Data inizio attività: 01.03.19\nCodice ATECO: 62.01 - Produzione di software");
        let list: Vec<_> = found.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(list, vec!["62.01"]);
        assert!(found[0].primary);
    }

    #[test]
    fn test_clean_description_keeps_inner_numbers() {
        assert_eq!(
            clean_description("Trasporto di merci su strada 24 ore su 24"),
            "Trasporto di merci su strada 24 ore su 24"
        );
        assert_eq!(
            clean_description("Servizi ai sensi del D.Lgs. 81/2008 *"),
            "Servizi ai sensi del D.Lgs. 81/2008"
        );
    }
}
