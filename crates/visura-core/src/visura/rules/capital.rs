//! Share capital amounts.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::models::visura::ShareCapital;

use super::{CascadeExtractor, FieldRules};

/// Parse an amount in Italian notation (`10.000,00`, `10.000`, `2500,5`).
///
/// A comma is always the decimal separator. Without one, dots are thousands
/// separators when there are several or when exactly three digits follow the
/// only dot.
pub fn parse_italian_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim().trim_end_matches(['.', ',']);
    if !trimmed.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    let normalized = if trimmed.contains(',') {
        trimmed.replace('.', "").replacen(',', ".", 1)
    } else {
        match trimmed.matches('.').count() {
            0 => trimmed.to_string(),
            1 if trimmed.rsplit('.').next().is_some_and(|tail| tail.len() == 3) => {
                trimmed.replace('.', "")
            }
            1 => trimmed.to_string(),
            _ => trimmed.replace('.', ""),
        }
    };

    Decimal::from_str(&normalized).ok()
}

pub fn validate_amount(value: &str) -> bool {
    parse_italian_amount(value).is_some()
}

/// Declared and paid-in capital; currency is set when an amount was found.
pub fn extract_share_capital(
    text: &str,
    declared: &FieldRules,
    paid: &FieldRules,
    placeholder: &str,
    currency: &str,
) -> ShareCapital {
    let amount = |rules: &FieldRules| {
        CascadeExtractor::new(rules)
            .with_placeholder(placeholder)
            .extract_where(text, |_| true)
            .and_then(|m| parse_italian_amount(&m.value))
    };

    let declared = amount(declared);
    let paid = amount(paid);
    let currency = (declared.is_some() || paid.is_some()).then(|| currency.to_string());

    ShareCapital {
        declared,
        paid,
        currency,
    }
}
