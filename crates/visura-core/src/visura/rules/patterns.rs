//! Built-in pattern library for Italian registry extracts.

use std::sync::Arc;

use lazy_static::lazy_static;

use crate::error::ExtractionError;
use crate::models::visura::OfficerRole;

use super::{address, capital, contacts, dates, registry, tax_id};
use super::{FieldRules, PatternRule};

/// Activity code followed by a word boundary, e.g. `62.01` or `62.01.00`.
const ATECO_CODE: &str = r"(\d{2}\.\d{2}(?:\.\d{2})?)\b";

/// Optional ` - description` tail after an activity code.
const ATECO_DESCRIPTION: &str = r"(?:[ \t]*[-–:][ \t]*([^\n]+))?";

/// Amount after an optional currency marker.
const AMOUNT: &str = r"[:\s]*(?:euro|eur|€)?\s*([\d.,]+)";

/// Date as written in registry extracts.
const DATE: &str = r"[:\s]*(\d{2}[/\-]\d{2}[/\-]\d{4})";

/// Continuation lines of a labelled block stop at the next `Label:` line
/// and at upper-case headings (lines with no lower-case letter).
const BLOCK: &str = r"([^\n]+(?:\n[^\n:]*(?-i:\p{Ll})[^\n:]*$)*)";

/// Officer name on the same line as (or the line after) the role label.
const OFFICER_NAME: &str = r"[:\s]*(\p{L}[\p{L}'. ]+)";

lazy_static! {
    /// Shared default library, compiled on first use.
    pub static ref DEFAULT_LIBRARY: Arc<PatternLibrary> =
        Arc::new(PatternLibrary::builtin().unwrap());
}

/// Immutable set of per-field rule cascades.
///
/// Callers may build their own library and hand it to the parser; nothing in
/// the engine reads patterns from anywhere else.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    pub company_name: FieldRules,
    pub legal_form: FieldRules,
    pub vat_number: FieldRules,
    pub fiscal_code: FieldRules,
    pub certified_email: FieldRules,
    pub rea_number: FieldRules,
    pub chamber_of_commerce: FieldRules,
    pub capital_declared: FieldRules,
    pub capital_paid: FieldRules,
    /// Labelled activity codes; group 1 is the code, group 2 the description.
    pub activity_labelled: FieldRules,
    /// Line-leading `code - description` listings, consulted only when no
    /// labelled code is found.
    pub activity_listing: FieldRules,
    pub purpose_strict: FieldRules,
    pub purpose_fallback: FieldRules,
    pub street: FieldRules,
    pub postal_code: FieldRules,
    pub municipality: FieldRules,
    pub province: FieldRules,
    pub email: FieldRules,
    pub phone: FieldRules,
    pub website: FieldRules,
    pub incorporation_date: FieldRules,
    pub registration_date: FieldRules,
    pub activity_status: FieldRules,
    /// Officer rules, each tagged with the role it recognises.
    pub officers: FieldRules,
}

impl PatternLibrary {
    /// Compile the built-in library.
    pub fn builtin() -> Result<Self, ExtractionError> {
        Ok(Self {
            company_name: FieldRules::compile(
                "denominazione",
                &[
                    r"(?:denominazione|ragione\s+sociale)[:\s]*([^\n]+)",
                    r"^[ \t]*impresa[ \t]*:[ \t]*([^\n]+)",
                    r"^[ \t]*societ(?:à|a')[ \t]*:[ \t]*([^\n]+)",
                    r"^[ \t]*([A-Z0-9][A-Z0-9 &.\-']*?\b(?:S\.?R\.?L\.?S?|S\.?P\.?A\.?|S\.?N\.?C\.?|S\.?A\.?S\.?))[ \t]*$",
                ],
            )?
            .with_validator(registry::validate_company_name),

            legal_form: FieldRules::compile(
                "forma_giuridica",
                &[
                    r"forma\s+giuridica[:\s]*([^\n]+)",
                    r"(?:tipo\s+societ(?:à|a'?)|natura\s+giuridica)[:\s]*([^\n]+)",
                    r"\b(societ(?:à|a')\s+a\s+responsabilit(?:à|a')\s+limitata(?:\s+semplificata)?|societ(?:à|a')\s+per\s+azioni|S\.?R\.?L\.?(?:\s+unipersonale)?|S\.?P\.?A|S\.?N\.?C|S\.?A\.?S)\b",
                ],
            )?,

            vat_number: FieldRules::compile(
                "partita_iva",
                &[
                    r"(?:partita\s+iva|\bp\.?\s?iva)[:\s]*(?:IT)?(\d+)",
                    r"(?:codice\s+fiscale\s+e\s+numero\s+(?:di\s+)?iscrizione|\bc\.f\.)[:\s]*(\d+)",
                    r"\bvat(?:\s+number)?\b[:\s]*(?:IT)?(\d+)",
                ],
            )?
            .with_rule(PatternRule::new("partita_iva", r"\b(\d{11})\b", 1)?.with_confidence(0.6))
            .with_validator(tax_id::validate_partita_iva),

            fiscal_code: FieldRules::compile(
                "codice_fiscale",
                &[
                    r"codice\s+fiscale(?:\s+e\s+numero\s+(?:di\s+)?iscrizione)?[:\s]*([A-Z0-9]+)",
                    r"\bc\.\s?f\.?[:\s]*([A-Z0-9]+)",
                    r"\bcod\.\s?fisc\.?[:\s]*([A-Z0-9]+)",
                ],
            )?
            .with_validator(tax_id::validate_codice_fiscale),

            certified_email: FieldRules::compile(
                "pec",
                &[
                    r"(?:indirizzo\s+pec|\bpec\b|posta\s+elettronica\s+certificata|e-?mail\s+certificata)[:\s]*([a-z0-9][a-z0-9._\-]*@[a-z0-9][a-z0-9.\-]*\.[a-z]{2,})",
                    r"\b([a-z0-9._\-]+@(?:[a-z0-9\-]+\.)*(?:pec|legalmail)(?:\.[a-z0-9\-]+)+)",
                ],
            )?
            .with_validator(contacts::validate_email),

            rea_number: FieldRules::compile(
                "numero_rea",
                &[
                    r"(?:numero\s+rea|\brea\b|\br\.e\.a\.)[:\s]*(?:n\.?\s*)?([A-Z]{2}[ \-]?\d{5,7})\b",
                    r"numero\s+(?:di\s+)?iscrizione\s+al\s+registro\s+(?:delle\s+)?imprese[:\s]*([A-Z]{2}[ \-]?\d{5,7})\b",
                    r"\bcciaa\b[^\n]*?\b([A-Z]{2}[ \-]?\d{5,7})\b",
                    r"(?:\bn\.|\bnumero|\bnr\.?)\s*([A-Z]{2}[ \-]?\d{5,7})\b",
                ],
            )?
            .with_validator(registry::validate_rea_number),

            chamber_of_commerce: FieldRules::compile(
                "camera_commercio",
                &[
                    r"(?:\bcciaa\s+di|camera\s+di\s+commercio(?:\s+di)?|\bc\.c\.i\.a\.a\.\s+di)[:\s]*(\p{L}[\p{L}' ]*?)[ \t]*(?:$|[,;(\-]|\brea\b)",
                    r"registro\s+(?:delle\s+)?imprese\s+di[:\s]*(\p{L}[\p{L}' ]*?)[ \t]*(?:$|[,;(\-])",
                    r"\bufficio\s+di[:\s]*(\p{L}[\p{L}' ]*?)[ \t]*(?:$|[,;(\-])",
                ],
            )?
            .with_validator(registry::validate_place_name),

            capital_declared: FieldRules::compile(
                "capitale_deliberato",
                &[
                    &format!(r"capitale\s+(?:sociale\s+)?deliberato{AMOUNT}"),
                    &format!(r"\bdeliberato{AMOUNT}"),
                    &format!(r"capitale\s+sociale(?:\s+in\s+euro)?{AMOUNT}"),
                ],
            )?
            .with_validator(capital::validate_amount),

            capital_paid: FieldRules::compile(
                "capitale_versato",
                &[
                    &format!(r"capitale\s+(?:sociale\s+)?versato{AMOUNT}"),
                    &format!(r"\bversato{AMOUNT}"),
                    r"capitale\s+sociale[^\n\d]*([\d.,]+)[^\n\d]*?(?:\bi\.\s?v\.|interamente\s+versato)",
                    &format!(r"capitale\s+sociale(?:\s+in\s+euro)?{AMOUNT}"),
                ],
            )?
            .with_validator(capital::validate_amount),

            activity_labelled: FieldRules::compile(
                "codici_ateco",
                &[
                    &format!(r"(?:codice\s+)?\bateco(?:\s+\d{{4}})?[\s:]+{ATECO_CODE}{ATECO_DESCRIPTION}"),
                    &format!(r"\battivit(?:à|a'?)\s+(?:prevalente|principale)[\s:]+{ATECO_CODE}{ATECO_DESCRIPTION}"),
                    &format!(r"\bimportanza[:\s]+[PI]\s*-[^\d]{{0,120}}{ATECO_CODE}{ATECO_DESCRIPTION}"),
                    &format!(r"(?:\bimport\.|\bexport\b|\bcodice\s+attivit(?:à|a'?)|\battivit(?:à|a'?)|^[ \t]*codice)[ \t.:]+{ATECO_CODE}{ATECO_DESCRIPTION}"),
                ],
            )?,

            activity_listing: FieldRules::compile(
                "codici_ateco",
                &[&format!(r"^[ \t]*{ATECO_CODE}[ \t]*[-–][ \t]*([^\n]+)")],
            )?,

            purpose_strict: FieldRules::compile(
                "oggetto_sociale",
                &[
                    &format!(r"\boggetto\s+sociale[:\s]*{BLOCK}"),
                    r"\bla\s+societ(?:à|a'|a’|a)\s+ha\s+per\s+oggetto[:\s]*([^.]+\.)",
                    &format!(r"\bdescrizione\s+(?:dell'\s*)?attivit(?:à|a'?)[:\s]*{BLOCK}"),
                    &format!(r"^[ \t]*oggetto[ \t]*:[:\s]*{BLOCK}"),
                ],
            )?,

            purpose_fallback: FieldRules::compile(
                "oggetto_sociale",
                &[r"\boggetto(?:\s+sociale)?[:\s]*([^\n]+)"],
            )?,

            street: FieldRules::compile(
                "indirizzo",
                &[
                    r"\b((?:via|viale|piazza|piazzale|corso|largo|vicolo|strada|contrada|localit[àa])\s+[\p{L}'. ]+?,?[ ]?\d+[A-Z]?(?:/[A-Z0-9]+)?)\b",
                    r"(?:sede\s+legale|indirizzo\s+sede)[:\s]*([^\n,]+?)[ \t]*(?:,|\bcap\b|\b\d{5}\b|$)",
                    r"^[ \t]*indirizzo[:\s]*([^\n,]+?)[ \t]*(?:,|\bcap\b|\b\d{5}\b|$)",
                ],
            )?
            .with_validator(address::validate_street),

            postal_code: FieldRules::compile(
                "cap",
                &[
                    r"\bc\.?a\.?p\.?[:\s]*(\d{5})\b",
                    r"\bsede\b[^\n]*?\b(\d{5})\b",
                    r"\b(\d{5})[ \t]+\p{L}[\p{L}' ]*\([A-Z]{2}\)",
                ],
            )?
            .with_validator(address::validate_postal_code),

            municipality: FieldRules::compile(
                "comune",
                &[
                    r"\bcomune[ \t]*:[ \t]*(\p{L}[\p{L}' ]*?)[ \t]*(?:\([A-Z]{2}\)|$)",
                    r"sede\s+legale[ \t]+(\p{L}[\p{L}' ]*?)[ \t]*\([A-Z]{2}\)",
                    r"\b\d{5}[ \t]+(\p{L}[\p{L}' ]*?)[ \t]*(?:\([A-Z]{2}\)|$)",
                    r"\b(?:localit[àa]|citt[àa])[ \t]*:[ \t]*(\p{L}[\p{L}' ]*)",
                ],
            )?
            .with_validator(registry::validate_place_name),

            province: FieldRules::compile(
                "provincia",
                &[
                    r"(?:\bprovincia|\bprov\.)[:\s]*\(?([A-Z]{2})\)?\b",
                    r"\p{L}+[ \t]+\(([A-Z]{2})\)",
                    r"\(([A-Z]{2})\)",
                ],
            )?
            .with_validator(address::validate_province),

            email: FieldRules::compile(
                "email",
                &[
                    r"(?:\be-?mail|\bmail|posta\s+elettronica)[:\s]*([a-z0-9._\-]+@[a-z0-9.\-]+\.[a-z]{2,})",
                    r"\b([a-z0-9._\-]+@[a-z0-9.\-]+\.[a-z]{2,})\b",
                ],
            )?
            .with_validator(contacts::validate_ordinary_email),

            phone: FieldRules::compile(
                "telefono",
                &[
                    r"\b(?:tel(?:efono)?\.?|phone)[:\s]*(\+?\d[\d /()\-]{4,}\d)",
                    r"numero\s+di\s+telefono[:\s]*(\+?\d[\d /()\-]{4,}\d)",
                    r"recapito\s+telefonico[:\s]*(\+?\d[\d /()\-]{4,}\d)",
                ],
            )?
            .with_validator(contacts::validate_phone),

            website: FieldRules::compile(
                "sito_web",
                &[
                    r"(?:sito\s+web|sito\s+internet|\bwebsite|\bweb|\burl)[:\s]*((?:www\.|https?://)[^\s,;]*[^\s,;.])",
                    r"\b(www\.[a-z0-9\-]+(?:\.[a-z0-9\-]+)*\.[a-z]{2,})\b",
                ],
            )?
            .with_validator(contacts::validate_website),

            incorporation_date: FieldRules::compile(
                "data_costituzione",
                &[
                    &format!(r"data\s+(?:di\s+)?costituzione{DATE}"),
                    &format!(r"(?:costituita\s+il|data\s+atto\s+di\s+costituzione){DATE}"),
                ],
            )?
            .with_validator(dates::validate_registry_date),

            registration_date: FieldRules::compile(
                "data_iscrizione",
                &[
                    &format!(r"data\s+(?:di\s+)?iscrizione(?:\s+al\s+r\.\s?i\.|\s+rea)?{DATE}"),
                    &format!(r"iscritta\s+dal{DATE}"),
                ],
            )?
            .with_validator(dates::validate_registry_date),

            activity_status: FieldRules::compile(
                "stato_attivita",
                &[
                    r"(?:stato\s+attivit(?:à|a'?)|\bstatus)[:\s]*(attiva|inattiva|cessata|in\s+liquidazione|sospesa)\b",
                    r"situazione\s+impresa[:\s]*(attiva|inattiva|cessata|in\s+liquidazione)\b",
                    r"\bimpresa\s+(attiva|inattiva|cessata)\b",
                ],
            )?,

            officers: officer_rules()?,
        })
    }
}

fn officer_rules() -> Result<FieldRules, ExtractionError> {
    const ROLES: [(&str, OfficerRole); 5] = [
        (r"\bamministratore\s+unico", OfficerRole::SoleDirector),
        (
            r"\bpresidente\s+(?:del\s+)?(?:cda|c\.d\.a\.|consiglio(?:\s+di\s+amministrazione)?)",
            OfficerRole::BoardChair,
        ),
        (r"\bamministratore\s+delegato", OfficerRole::ManagingDirector),
        (r"\bconsigliere\b", OfficerRole::BoardMember),
        (r"\bsocio\s+amministratore", OfficerRole::PartnerDirector),
    ];

    let mut rules = FieldRules::new("amministratori");
    for (label, role) in ROLES {
        let pattern = format!("{label}{OFFICER_NAME}");
        rules = rules.with_rule(PatternRule::new("amministratori", &pattern, 1)?.with_role(role));
    }
    Ok(rules)
}
