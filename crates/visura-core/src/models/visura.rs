//! Registry extract data models.
//!
//! Field names are English on the Rust side and serialize to the Italian keys
//! used by downstream consumers of the extraction output.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Structured facts extracted from one registry extract.
///
/// Every field is independent; a missing value is `None` (or an empty list)
/// and is serialized as an explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisuraRecord {
    /// Registered company name.
    #[serde(rename = "denominazione")]
    pub company_name: Option<String>,

    /// Legal form (SRL, SPA, ...).
    #[serde(rename = "forma_giuridica")]
    pub legal_form: Option<String>,

    /// VAT number (partita IVA), exactly 11 digits.
    #[serde(rename = "partita_iva")]
    pub vat_number: Option<String>,

    /// Fiscal code, 11 to 16 alphanumerics.
    #[serde(rename = "codice_fiscale")]
    pub fiscal_code: Option<String>,

    /// Certified e-mail address (PEC).
    #[serde(rename = "pec")]
    pub certified_email: Option<String>,

    /// REA registry number, e.g. `RM-1234567`.
    #[serde(rename = "numero_rea")]
    pub rea_number: Option<String>,

    /// Chamber of commerce holding the registration.
    #[serde(rename = "camera_commercio")]
    pub chamber_of_commerce: Option<String>,

    /// Registered share capital.
    #[serde(rename = "capitale_sociale")]
    pub share_capital: ShareCapital,

    /// Activity codes in document order, primary first.
    #[serde(rename = "codici_ateco")]
    pub activity_codes: Vec<ActivityCode>,

    /// Registered purpose text.
    #[serde(rename = "oggetto_sociale")]
    pub purpose: Option<String>,

    /// Set when the purpose text came from the permissive fallback rule.
    #[serde(rename = "oggetto_sociale_parziale")]
    pub purpose_partial: bool,

    /// Registered office.
    #[serde(rename = "sede_legale")]
    pub registered_office: Address,

    /// Officers in the order their rules matched.
    #[serde(rename = "amministratori")]
    pub officers: Vec<Officer>,

    /// Ordinary e-mail address.
    pub email: Option<String>,

    /// Phone number.
    #[serde(rename = "telefono")]
    pub phone: Option<String>,

    /// Website.
    #[serde(rename = "sito_web")]
    pub website: Option<String>,

    /// Incorporation date as written (DD/MM/YYYY).
    #[serde(rename = "data_costituzione")]
    pub incorporation_date: Option<String>,

    /// Registry enrolment date as written (DD/MM/YYYY).
    #[serde(rename = "data_iscrizione")]
    pub registration_date: Option<String>,

    /// Activity status, upper-cased (`ATTIVA` when no cessation marker is found).
    #[serde(rename = "stato_attivita")]
    pub activity_status: Option<String>,

    /// Inferred customer segment.
    #[serde(rename = "tipo_business")]
    pub business_type: Option<BusinessType>,

    /// Confidence derived from the recovered fields.
    pub confidence: ConfidenceAssessment,
}

impl VisuraRecord {
    /// The primary activity code, if any.
    pub fn primary_activity(&self) -> Option<&ActivityCode> {
        self.activity_codes.iter().find(|a| a.primary)
    }

    /// Positive paid-in capital, used by the full confidence profile.
    pub fn has_paid_capital(&self) -> bool {
        self.share_capital
            .paid
            .is_some_and(|amount| amount > Decimal::ZERO)
    }
}

/// A classification code for a registered business activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityCode {
    /// Code shaped `DD.DD` or `DD.DD.DD`.
    #[serde(rename = "codice")]
    pub code: String,

    /// Human-readable description.
    #[serde(rename = "descrizione")]
    pub description: String,

    /// True for exactly one entry: the first discovered code.
    #[serde(rename = "principale")]
    pub primary: bool,
}

/// A company officer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Officer {
    /// Full name as written in the extract.
    #[serde(rename = "nome_completo")]
    pub full_name: String,

    /// Role attached to the rule that matched.
    #[serde(rename = "carica")]
    pub role: OfficerRole,
}

/// Officer roles recognised by the officer rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OfficerRole {
    #[serde(rename = "Amministratore Unico")]
    SoleDirector,
    #[serde(rename = "Presidente CdA")]
    BoardChair,
    #[serde(rename = "Amministratore Delegato")]
    ManagingDirector,
    #[serde(rename = "Consigliere")]
    BoardMember,
    #[serde(rename = "Socio Amministratore")]
    PartnerDirector,
}

impl OfficerRole {
    /// Label used in registry extracts.
    pub fn label(&self) -> &'static str {
        match self {
            OfficerRole::SoleDirector => "Amministratore Unico",
            OfficerRole::BoardChair => "Presidente CdA",
            OfficerRole::ManagingDirector => "Amministratore Delegato",
            OfficerRole::BoardMember => "Consigliere",
            OfficerRole::PartnerDirector => "Socio Amministratore",
        }
    }
}

impl fmt::Display for OfficerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Registered office address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street and number.
    #[serde(rename = "indirizzo")]
    pub street: Option<String>,

    /// Five-digit postal code (CAP).
    #[serde(rename = "cap")]
    pub postal_code: Option<String>,

    /// Municipality.
    #[serde(rename = "comune")]
    pub municipality: Option<String>,

    /// Two-letter province code.
    #[serde(rename = "provincia")]
    pub province: Option<String>,

    /// Country, defaulted for Italian registry extracts.
    #[serde(rename = "nazione")]
    pub country: Option<String>,
}

impl Address {
    /// Check if the address has any extracted data.
    pub fn is_empty(&self) -> bool {
        self.street.is_none()
            && self.postal_code.is_none()
            && self.municipality.is_none()
            && self.province.is_none()
    }

    /// Format address as a single line.
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if let Some(street) = &self.street {
            parts.push(street.clone());
        }

        let mut locality = Vec::new();
        if let Some(postal) = &self.postal_code {
            locality.push(postal.clone());
        }
        if let Some(municipality) = &self.municipality {
            locality.push(municipality.clone());
        }
        if let Some(province) = &self.province {
            locality.push(format!("({})", province));
        }
        if !locality.is_empty() {
            parts.push(locality.join(" "));
        }

        if let Some(country) = &self.country {
            if !country.eq_ignore_ascii_case("ITALIA") && !country.eq_ignore_ascii_case("IT") {
                parts.push(country.clone());
            }
        }
        parts.join(", ")
    }
}

/// Registered share capital.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareCapital {
    /// Declared (resolved) capital.
    #[serde(rename = "deliberato")]
    pub declared: Option<Decimal>,

    /// Paid-in capital.
    #[serde(rename = "versato")]
    pub paid: Option<Decimal>,

    /// Currency code, set when an amount was found.
    #[serde(rename = "valuta")]
    pub currency: Option<String>,
}

/// Customer segment inferred from keywords across the whole text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusinessType {
    /// Business-facing (default).
    #[default]
    B2B,
    /// Consumer-facing.
    B2C,
    /// Government-facing.
    B2G,
}

/// Per-field outcome used in confidence details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldStatus {
    Valid,
    NotFound,
}

impl FieldStatus {
    pub fn of(found: bool) -> Self {
        if found {
            FieldStatus::Valid
        } else {
            FieldStatus::NotFound
        }
    }
}

/// Confidence score in one of the two profile scales.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfidenceScore {
    /// 0-100 fixed-weight score (essential profile).
    Percent(u8),
    /// 0.0-0.95 ratio (full profile).
    Ratio(f32),
}

impl ConfidenceScore {
    /// Score normalised to 0.0 - 1.0.
    pub fn as_fraction(&self) -> f32 {
        match self {
            ConfidenceScore::Percent(p) => f32::from(*p) / 100.0,
            ConfidenceScore::Ratio(r) => *r,
        }
    }
}

impl Default for ConfidenceScore {
    fn default() -> Self {
        ConfidenceScore::Ratio(0.0)
    }
}

/// Confidence derived from which fields were recovered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceAssessment {
    /// Score in the active profile's scale.
    pub score: ConfidenceScore,

    /// Status of every scored field.
    pub details: BTreeMap<String, FieldStatus>,

    /// Qualitative label derived from the score.
    pub assessment: String,
}
