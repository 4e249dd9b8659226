//! Partita IVA and codice fiscale.

use super::{CascadeExtractor, ExtractionMatch, FieldRules};

/// Exactly 11 ASCII digits.
pub fn validate_partita_iva(value: &str) -> bool {
    value.len() == 11 && value.bytes().all(|b| b.is_ascii_digit())
}

/// 11 to 16 ASCII alphanumerics with at least one digit.
///
/// The digit requirement keeps long capitalised words (`INFORMATICA`) from
/// passing as a personal fiscal code.
pub fn validate_codice_fiscale(value: &str) -> bool {
    (11..=16).contains(&value.len())
        && value.bytes().all(|b| b.is_ascii_alphanumeric())
        && value.bytes().any(|b| b.is_ascii_digit())
}

/// Partita IVA through its cascade; the raw 11-digit rule runs last.
pub fn extract_partita_iva(
    text: &str,
    rules: &FieldRules,
    placeholder: &str,
) -> Option<ExtractionMatch<String>> {
    CascadeExtractor::new(rules)
        .with_placeholder(placeholder)
        .extract_where(text, |_| true)
}

/// Codice fiscale, falling back to the partita IVA when none is stated.
pub fn extract_codice_fiscale(
    text: &str,
    rules: &FieldRules,
    placeholder: &str,
    partita_iva: Option<&str>,
) -> Option<String> {
    CascadeExtractor::new(rules)
        .with_placeholder(placeholder)
        .extract_where(text, |_| true)
        .map(|m| m.value)
        .or_else(|| partita_iva.map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visura::rules::DEFAULT_LIBRARY;

    fn partita_iva(text: &str) -> Option<String> {
        extract_partita_iva(text, &DEFAULT_LIBRARY.vat_number, "N/D").map(|m| m.value)
    }

    #[test]
    fn test_validate_partita_iva() {
        assert!(validate_partita_iva("01234567890"));
        assert!(!validate_partita_iva("0123456789"));
        assert!(!validate_partita_iva("012345678901"));
        assert!(!validate_partita_iva("0123456789A"));
    }

    #[test]
    fn test_validate_codice_fiscale() {
        assert!(validate_codice_fiscale("01234567890"));
        assert!(validate_codice_fiscale("RSSMRA80A01H501U"));
        assert!(!validate_codice_fiscale("INFORMATICA"));
        assert!(!validate_codice_fiscale("RSSMRA80A01H501UX"));
        assert!(!validate_codice_fiscale("RSS-MRA80A01"));
    }

    #[test]
    fn test_labelled_partita_iva() {
        assert_eq!(
            partita_iva("Partita IVA: 01234567890"),
            Some("01234567890".to_string())
        );
        assert_eq!(
            partita_iva("P.IVA IT09876543210"),
            Some("09876543210".to_string())
        );
    }

    #[test]
    fn test_labelled_beats_raw_digits() {
        let text = "Telefono 06123456789\nPartita IVA: 01234567890";
        assert_eq!(partita_iva(text), Some("01234567890".to_string()));
    }

    #[test]
    fn test_wrong_length_is_rejected_not_trimmed() {
        assert_eq!(partita_iva("Partita IVA: 012345678901"), None);
        assert_eq!(partita_iva("Partita IVA: 0123456789"), None);
    }

    #[test]
    fn test_raw_fallback() {
        assert_eq!(
            partita_iva("identificativo 01234567890 registrato"),
            Some("01234567890".to_string())
        );
    }

    #[test]
    fn test_codice_fiscale_falls_back_to_partita_iva() {
        let rules = &DEFAULT_LIBRARY.fiscal_code;
        assert_eq!(
            extract_codice_fiscale("Codice fiscale: RSSMRA80A01H501U", rules, "N/D", None),
            Some("RSSMRA80A01H501U".to_string())
        );
        assert_eq!(
            extract_codice_fiscale("nessun codice", rules, "N/D", Some("01234567890")),
            Some("01234567890".to_string())
        );
        assert_eq!(extract_codice_fiscale("Codice fiscale: N/D", rules, "N/D", None), None);
    }
}
