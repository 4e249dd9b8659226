//! Registered office address.

use crate::models::visura::Address;

use super::{CascadeExtractor, FieldRules, PatternLibrary};

/// Italian province codes, including Sud Sardegna.
const PROVINCES: [&str; 107] = [
    "AG", "AL", "AN", "AO", "AP", "AQ", "AR", "AT", "AV", "BA", "BG", "BI", "BL", "BN", "BO",
    "BR", "BS", "BT", "BZ", "CA", "CB", "CE", "CH", "CL", "CN", "CO", "CR", "CS", "CT", "CZ",
    "EN", "FC", "FE", "FG", "FI", "FM", "FR", "GE", "GO", "GR", "IM", "IS", "KR", "LC", "LE",
    "LI", "LO", "LT", "LU", "MB", "MC", "ME", "MI", "MN", "MO", "MS", "MT", "NA", "NO", "NU",
    "OR", "PA", "PC", "PD", "PE", "PG", "PI", "PN", "PO", "PR", "PT", "PU", "PV", "PZ", "RA",
    "RC", "RE", "RG", "RI", "RM", "RN", "RO", "SA", "SI", "SO", "SP", "SR", "SS", "SU", "SV",
    "TA", "TE", "TN", "TO", "TP", "TR", "TS", "TV", "UD", "VA", "VB", "VC", "VE", "VI", "VR",
    "VT", "VV",
];

pub fn validate_street(value: &str) -> bool {
    let length = value.chars().count();
    (3..=120).contains(&length) && value.chars().any(char::is_alphabetic)
}

pub fn validate_postal_code(value: &str) -> bool {
    value.len() == 5 && value.bytes().all(|b| b.is_ascii_digit())
}

/// Upper-case two-letter code of an existing province.
pub fn validate_province(value: &str) -> bool {
    PROVINCES.contains(&value)
}

/// Assemble the registered office from its independent sub-field cascades.
///
/// `country` is always set: registry extracts are issued for Italian seats.
pub fn extract_address(
    text: &str,
    library: &PatternLibrary,
    placeholder: &str,
    country: &str,
) -> Address {
    let field = |rules: &FieldRules| {
        CascadeExtractor::new(rules)
            .with_placeholder(placeholder)
            .extract_where(text, |_| true)
            .map(|m| m.value)
    };

    Address {
        street: field(&library.street),
        postal_code: field(&library.postal_code),
        municipality: field(&library.municipality),
        province: field(&library.province),
        country: Some(country.to_string()),
    }
}
