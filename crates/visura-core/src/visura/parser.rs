//! Registry extract parser sequencing the per-field cascades.

use std::sync::Arc;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::error::ExtractionError;
use crate::models::config::{ExtractionConfig, ExtractionProfile};
use crate::models::visura::{FieldStatus, VisuraRecord};

use super::confidence;
use super::rules::{
    address::extract_address,
    ateco::extract_activity_codes,
    capital::extract_share_capital,
    officers::extract_officers,
    purpose::extract_purpose,
    registry::{classify_business, extract_activity_status},
    tax_id::{extract_codice_fiscale, extract_partita_iva},
    CascadeExtractor, FieldRules, PatternLibrary, DEFAULT_LIBRARY,
};
use super::{RegistryExtractor, Result};

/// Name of the only extraction method this engine implements.
pub const EXTRACTION_METHOD: &str = "regex";

/// Envelope returned to callers that must never see an error.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionOutcome {
    pub success: bool,
    /// Extracted record; serialized as `{}` on failure.
    #[serde(serialize_with = "serialize_data")]
    pub data: Option<VisuraRecord>,
    pub error: Option<String>,
    pub extraction_method: String,
    pub processing_time_ms: u64,
    /// One entry per scored field that was not found.
    pub warnings: Vec<String>,
}

impl ExtractionOutcome {
    pub fn from_result(result: Result<VisuraRecord>, processing_time_ms: u64) -> Self {
        match result {
            Ok(record) => {
                let warnings = record
                    .confidence
                    .details
                    .iter()
                    .filter(|(_, status)| **status == FieldStatus::NotFound)
                    .map(|(field, _)| ExtractionError::MissingField(field.clone()).to_string())
                    .collect();

                Self {
                    success: true,
                    data: Some(record),
                    error: None,
                    extraction_method: EXTRACTION_METHOD.to_string(),
                    processing_time_ms,
                    warnings,
                }
            }
            Err(e) => Self {
                success: false,
                data: None,
                error: Some(e.to_string()),
                extraction_method: EXTRACTION_METHOD.to_string(),
                processing_time_ms,
                warnings: Vec::new(),
            },
        }
    }
}

fn serialize_data<S>(data: &Option<VisuraRecord>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match data {
        Some(record) => record.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

/// Rule-based registry extract parser.
///
/// Holds no per-call state; one instance can serve any number of threads.
#[derive(Debug, Clone)]
pub struct VisuraParser {
    library: Arc<PatternLibrary>,
    config: ExtractionConfig,
}

impl VisuraParser {
    /// Create a parser with the built-in library and default settings.
    pub fn new() -> Self {
        Self::from_config(ExtractionConfig::default())
    }

    pub fn from_config(config: ExtractionConfig) -> Self {
        Self {
            library: Arc::clone(&DEFAULT_LIBRARY),
            config,
        }
    }

    /// Use a custom pattern library.
    pub fn with_library(mut self, library: Arc<PatternLibrary>) -> Self {
        self.library = library;
        self
    }

    /// Set the extraction profile.
    pub fn with_profile(mut self, profile: ExtractionProfile) -> Self {
        self.config.profile = profile;
        self
    }

    pub fn profile(&self) -> ExtractionProfile {
        self.config.profile
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    fn field(&self, rules: &FieldRules, text: &str) -> Option<String> {
        let found = CascadeExtractor::new(rules)
            .with_placeholder(&self.config.placeholder)
            .extract_where(text, |_| true)
            .map(|m| m.value);

        if found.is_none() {
            debug!(error = %ExtractionError::MissingField(rules.name().to_string()), "field absent");
        }
        found
    }

    /// Partita IVA, activity codes and purpose text; shared by both profiles.
    fn parse_essential(&self, text: &str, record: &mut VisuraRecord) {
        let config = &self.config;
        let library = &*self.library;

        record.vat_number =
            extract_partita_iva(text, &library.vat_number, &config.placeholder).map(|m| m.value);
        record.activity_codes =
            extract_activity_codes(text, library, config.description_min_length);

        if let Some(purpose) = extract_purpose(text, library, config) {
            record.purpose = Some(purpose.text);
            record.purpose_partial = purpose.partial;
        }
    }

    fn parse_full(&self, text: &str, record: &mut VisuraRecord) {
        let config = &self.config;
        let library = &*self.library;

        record.company_name = self.field(&library.company_name, text);
        record.legal_form = self.field(&library.legal_form, text);
        record.fiscal_code = extract_codice_fiscale(
            text,
            &library.fiscal_code,
            &config.placeholder,
            record.vat_number.as_deref(),
        );
        record.certified_email = self.field(&library.certified_email, text);
        record.rea_number = self.field(&library.rea_number, text);
        record.chamber_of_commerce = self.field(&library.chamber_of_commerce, text);

        record.share_capital = extract_share_capital(
            text,
            &library.capital_declared,
            &library.capital_paid,
            &config.placeholder,
            &config.default_currency,
        );
        record.registered_office =
            extract_address(text, library, &config.placeholder, &config.default_country);
        record.officers = extract_officers(text, &library.officers);

        record.email = self.field(&library.email, text);
        record.phone = self.field(&library.phone, text);
        record.website = self.field(&library.website, text);
        record.incorporation_date = self.field(&library.incorporation_date, text);
        record.registration_date = self.field(&library.registration_date, text);
        record.activity_status = Some(extract_activity_status(
            text,
            &library.activity_status,
            &config.placeholder,
            &config.default_status,
        ));
        record.business_type = Some(classify_business(text));
    }
}

impl Default for VisuraParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryExtractor for VisuraParser {
    fn parse(&self, text: &str) -> Result<VisuraRecord> {
        if text.trim().is_empty() {
            warn!("Empty document text, nothing to extract");
            return Err(ExtractionError::InputUnavailable(
                "no text could be extracted from the document".to_string(),
            ));
        }

        info!(
            "Parsing registry extract from {} characters ({:?} profile)",
            text.len(),
            self.config.profile
        );

        let mut record = VisuraRecord::default();
        self.parse_essential(text, &mut record);
        if self.config.profile == ExtractionProfile::Full {
            self.parse_full(text, &mut record);
        }

        record.confidence = confidence::assess(self.config.profile, &record);

        debug!(
            "Extracted {} activity codes, {} officers, confidence {:.2}",
            record.activity_codes.len(),
            record.officers.len(),
            record.confidence.score.as_fraction()
        );

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::visura::{ConfidenceScore, OfficerRole};

    const SAMPLE: &str = r#"
VISURA ORDINARIA SOCIETA' DI CAPITALE
Denominazione: ALFA DIGITALE S.R.L.
Forma giuridica: societa' a responsabilita' limitata
Codice fiscale e numero iscrizione: 01234567890
Partita IVA: 01234567890
Numero REA: RM-1234567
CCIAA di Roma
Indirizzo PEC: alfadigitale@pec.it
Indirizzo: Via Appia Nuova 123
CAP: 00183
Comune: Roma
Provincia: RM
Data costituzione: 15/03/2010
Data iscrizione: 20/03/2010
Capitale sociale: Euro 10.000,00 i.v.
Codice ATECO: 62.01 - Produzione di software
Oggetto sociale: La societa' ha per oggetto lo sviluppo di software e la prestazione di servizi informatici alle imprese.
Amministratore Unico: BIANCHI LUCA nato a ROMA il 01/01/1975
"#;

    #[test]
    fn test_parse_full_profile() {
        let record = VisuraParser::new().parse(SAMPLE).unwrap();

        assert_eq!(record.company_name.as_deref(), Some("ALFA DIGITALE S.R.L."));
        assert_eq!(record.vat_number.as_deref(), Some("01234567890"));
        assert_eq!(record.fiscal_code.as_deref(), Some("01234567890"));
        assert_eq!(record.rea_number.as_deref(), Some("RM-1234567"));
        assert_eq!(record.chamber_of_commerce.as_deref(), Some("Roma"));
        assert_eq!(record.certified_email.as_deref(), Some("alfadigitale@pec.it"));
        assert_eq!(record.registered_office.street.as_deref(), Some("Via Appia Nuova 123"));
        assert_eq!(record.registered_office.postal_code.as_deref(), Some("00183"));
        assert_eq!(record.registered_office.municipality.as_deref(), Some("Roma"));
        assert_eq!(record.registered_office.province.as_deref(), Some("RM"));
        assert_eq!(record.registered_office.country.as_deref(), Some("ITALIA"));
        assert_eq!(record.incorporation_date.as_deref(), Some("15/03/2010"));
        assert_eq!(record.registration_date.as_deref(), Some("20/03/2010"));
        assert_eq!(record.share_capital.currency.as_deref(), Some("EUR"));
        assert!(record.has_paid_capital());
        assert_eq!(record.activity_codes.len(), 1);
        assert!(record.purpose.is_some());
        assert!(!record.purpose_partial);
        assert_eq!(record.officers.len(), 1);
        assert_eq!(record.officers[0].full_name, "BIANCHI LUCA");
        assert_eq!(record.officers[0].role, OfficerRole::SoleDirector);
        assert_eq!(record.activity_status.as_deref(), Some("ATTIVA"));
        assert_eq!(record.confidence.score, ConfidenceScore::Ratio(0.95));
        assert_eq!(record.confidence.assessment, "7 of 7 key fields found");
    }

    #[test]
    fn test_essential_profile_skips_other_fields() {
        let parser = VisuraParser::new().with_profile(ExtractionProfile::Essential);
        let record = parser.parse(SAMPLE).unwrap();

        assert_eq!(record.vat_number.as_deref(), Some("01234567890"));
        assert!(record.company_name.is_none());
        assert!(record.registered_office.country.is_none());
        assert!(record.activity_status.is_none());
        assert_eq!(record.confidence.score, ConfidenceScore::Percent(100));
    }

    #[test]
    fn test_empty_text_is_the_only_failure() {
        let parser = VisuraParser::new();
        assert!(matches!(
            parser.parse("  \n\t "),
            Err(ExtractionError::InputUnavailable(_))
        ));
        assert!(parser.parse("testo senza alcun dato utile").is_ok());
    }

    #[test]
    fn test_outcome_envelope() {
        let parser = VisuraParser::new().with_profile(ExtractionProfile::Essential);

        let failed = parser.extract("");
        assert!(!failed.success);
        assert!(failed.data.is_none());
        assert_eq!(failed.extraction_method, "regex");
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["data"], serde_json::json!({}));
        assert!(json["error"].as_str().unwrap().contains("no text could be extracted"));

        let ok = parser.extract("Partita IVA: 01234567890");
        assert!(ok.success);
        assert!(ok.error.is_none());
        assert_eq!(
            ok.warnings,
            vec![
                "missing field: codici_ateco".to_string(),
                "missing field: oggetto_sociale".to_string(),
            ]
        );
    }

    #[test]
    fn test_parser_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<VisuraParser>();
    }
}
