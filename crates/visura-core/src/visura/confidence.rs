//! Confidence scoring from recovered fields.
//!
//! The scorer never looks at the text, only at what the extractors produced.
//! Every factor is a presence test, so recovering one more field can only
//! raise the score.

use std::collections::BTreeMap;

use crate::models::config::ExtractionProfile;
use crate::models::visura::{ConfidenceAssessment, ConfidenceScore, FieldStatus, VisuraRecord};

/// Upper bound of the full-profile ratio.
pub const FULL_SCORE_CAP: f32 = 0.95;

/// Score a record under the given profile.
pub fn assess(profile: ExtractionProfile, record: &VisuraRecord) -> ConfidenceAssessment {
    match profile {
        ExtractionProfile::Full => assess_full(record),
        ExtractionProfile::Essential => assess_essential(record),
    }
}

/// Seven key fields, one point each, as a ratio capped at [`FULL_SCORE_CAP`].
pub fn assess_full(record: &VisuraRecord) -> ConfidenceAssessment {
    let factors = [
        ("denominazione", record.company_name.is_some()),
        ("partita_iva", record.vat_number.is_some()),
        ("pec", record.certified_email.is_some()),
        ("numero_rea", record.rea_number.is_some()),
        ("codici_ateco", !record.activity_codes.is_empty()),
        ("capitale_sociale", record.has_paid_capital()),
        ("comune", record.registered_office.municipality.is_some()),
    ];

    let found = factors.iter().filter(|(_, present)| *present).count();
    let ratio = (found as f32 / factors.len() as f32).min(FULL_SCORE_CAP);

    ConfidenceAssessment {
        score: ConfidenceScore::Ratio(ratio),
        details: details(&factors),
        assessment: format!("{found} of {} key fields found", factors.len()),
    }
}

/// Partita IVA 33, activity code 33, purpose 34, out of 100.
pub fn assess_essential(record: &VisuraRecord) -> ConfidenceAssessment {
    let factors = [
        ("partita_iva", record.vat_number.is_some(), 33u8),
        ("codici_ateco", !record.activity_codes.is_empty(), 33),
        ("oggetto_sociale", record.purpose.is_some(), 34),
    ];

    let score: u8 = factors
        .iter()
        .filter(|(_, present, _)| *present)
        .map(|(_, _, weight)| weight)
        .sum();

    let presence: Vec<_> = factors.iter().map(|(name, present, _)| (*name, *present)).collect();

    ConfidenceAssessment {
        score: ConfidenceScore::Percent(score),
        details: details(&presence),
        assessment: essential_label(score).to_string(),
    }
}

/// Qualitative label for an essential-profile score.
pub fn essential_label(score: u8) -> &'static str {
    match score {
        100.. => "all three fields found and valid",
        66..=99 => "two of three found",
        33..=65 => "only one found",
        _ => "no valid field found",
    }
}

fn details(factors: &[(&str, bool)]) -> BTreeMap<String, FieldStatus> {
    factors
        .iter()
        .map(|(name, present)| (name.to_string(), FieldStatus::of(*present)))
        .collect()
}
