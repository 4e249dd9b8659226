//! Registry dates.

use chrono::NaiveDate;

const DATE_FORMATS: [&str; 2] = ["%d/%m/%Y", "%d-%m-%Y"];

/// A real calendar date written `DD/MM/YYYY` or `DD-MM-YYYY`.
pub fn validate_registry_date(value: &str) -> bool {
    parse_registry_date(value).is_some()
}

/// Parse a registry date in either accepted format.
pub fn parse_registry_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visura::rules::{CascadeExtractor, FieldExtractor, DEFAULT_LIBRARY};

    #[test]
    fn test_validate_registry_date() {
        assert!(validate_registry_date("15/03/2010"));
        assert!(validate_registry_date("01-12-1999"));
        assert!(!validate_registry_date("31/02/2010"));
        assert!(!validate_registry_date("2010/03/15"));
    }

    #[test]
    fn test_parse_registry_date() {
        assert_eq!(
            parse_registry_date("15/03/2010"),
            NaiveDate::from_ymd_opt(2010, 3, 15)
        );
    }

    #[test]
    fn test_date_cascades() {
        let text = "Data costituzione: 31/02/2010\nCostituita il 15/03/2010\nData iscrizione: 20/03/2010";

        let incorporation = CascadeExtractor::new(&DEFAULT_LIBRARY.incorporation_date)
            .extract(text)
            .map(|m| m.value);
        assert_eq!(incorporation, Some("15/03/2010".to_string()));

        let registration = CascadeExtractor::new(&DEFAULT_LIBRARY.registration_date)
            .extract(text)
            .map(|m| m.value);
        assert_eq!(registration, Some("20/03/2010".to_string()));
    }
}
