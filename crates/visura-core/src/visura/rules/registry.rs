//! Registry facts: name, REA number, chamber, status and business type.

use crate::models::visura::BusinessType;

use super::{CascadeExtractor, FieldRules};

const CONSUMER_KEYWORDS: [&str; 4] = ["consumatori", "retail", "b2c", "privati"];
const GOVERNMENT_KEYWORDS: [&str; 3] = ["pubblica amministrazione", "enti pubblici", "b2g"];

/// Two upper-case province letters, an optional separator and 5 to 7 digits.
pub fn validate_rea_number(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() < 7 || !bytes[..2].iter().all(u8::is_ascii_uppercase) {
        return false;
    }

    let digits = match bytes[2] {
        b' ' | b'-' => &bytes[3..],
        _ => &bytes[2..],
    };
    (5..=7).contains(&digits.len()) && digits.iter().all(u8::is_ascii_digit)
}

/// Plausible company name: some letters, not a bare label remnant.
pub fn validate_company_name(value: &str) -> bool {
    let letters = value.chars().filter(|c| c.is_alphabetic()).count();
    letters >= 2 && value.chars().count() <= 200 && !value.starts_with(':')
}

/// Municipality or chamber name: letters, spaces, apostrophes.
pub fn validate_place_name(value: &str) -> bool {
    value.chars().count() >= 2
        && value
            .chars()
            .all(|c| c.is_alphabetic() || matches!(c, ' ' | '\'' | '-' | '.'))
}

/// Upper-cased activity status, or `default` when no marker is present.
pub fn extract_activity_status(
    text: &str,
    rules: &FieldRules,
    placeholder: &str,
    default: &str,
) -> String {
    CascadeExtractor::new(rules)
        .with_placeholder(placeholder)
        .extract_where(text, |_| true)
        .map(|m| m.value.to_uppercase())
        .unwrap_or_else(|| default.to_string())
}

/// Infer the customer segment from keywords anywhere in the text.
pub fn classify_business(text: &str) -> BusinessType {
    let lower = text.to_lowercase();

    if CONSUMER_KEYWORDS.iter().any(|k| lower.contains(k)) {
        BusinessType::B2C
    } else if GOVERNMENT_KEYWORDS.iter().any(|k| lower.contains(k)) {
        BusinessType::B2G
    } else {
        BusinessType::B2B
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visura::rules::{FieldExtractor, DEFAULT_LIBRARY};

    fn field(rules: &FieldRules, text: &str) -> Option<String> {
        CascadeExtractor::new(rules).extract(text).map(|m| m.value)
    }

    #[test]
    fn test_validate_rea_number() {
        assert!(validate_rea_number("RM-1234567"));
        assert!(validate_rea_number("MI 123456"));
        assert!(validate_rea_number("TO12345"));
        assert!(!validate_rea_number("rm-1234567"));
        assert!(!validate_rea_number("RM-1234"));
        assert!(!validate_rea_number("RM-12345678"));
        assert!(!validate_rea_number("R1-123456"));
    }

    #[test]
    fn test_rea_cascade() {
        let rules = &DEFAULT_LIBRARY.rea_number;
        assert_eq!(
            field(rules, "Numero REA: RM-1234567"),
            Some("RM-1234567".to_string())
        );
        assert_eq!(
            field(rules, "CCIAA di Milano MI 654321"),
            Some("MI 654321".to_string())
        );
        assert_eq!(field(rules, "REA: N/D"), None);
    }

    #[test]
    fn test_company_name_cascade() {
        let rules = &DEFAULT_LIBRARY.company_name;
        assert_eq!(
            field(rules, "Denominazione: ACME SOLUZIONI S.R.L."),
            Some("ACME SOLUZIONI S.R.L.".to_string())
        );
        assert_eq!(
            field(rules, "VISURA ORDINARIA\nBETA SERVIZI SRL\nsede"),
            Some("BETA SERVIZI SRL".to_string())
        );
        assert_eq!(field(rules, "nessun nome qui"), None);
    }

    #[test]
    fn test_chamber_of_commerce() {
        let rules = &DEFAULT_LIBRARY.chamber_of_commerce;
        assert_eq!(
            field(rules, "CCIAA di Roma - REA RM-1234567"),
            Some("Roma".to_string())
        );
        assert_eq!(
            field(rules, "Registro Imprese di Milano Monza Brianza Lodi"),
            Some("Milano Monza Brianza Lodi".to_string())
        );
    }

    #[test]
    fn test_activity_status_default_and_uppercase() {
        let rules = &DEFAULT_LIBRARY.activity_status;
        assert_eq!(
            extract_activity_status("Stato attività: in liquidazione", rules, "N/D", "ATTIVA"),
            "IN LIQUIDAZIONE"
        );
        assert_eq!(
            extract_activity_status("nessun marcatore", rules, "N/D", "ATTIVA"),
            "ATTIVA"
        );
    }

    #[test]
    fn test_classify_business() {
        assert_eq!(classify_business("vendita ai consumatori finali"), BusinessType::B2C);
        assert_eq!(
            classify_business("forniture alla Pubblica Amministrazione"),
            BusinessType::B2G
        );
        assert_eq!(classify_business("consulenza alle imprese"), BusinessType::B2B);
    }
}
