//! Extract command - pull registry fields from a single text file.

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use visura_core::{ExtractionOutcome, ExtractionProfile, RegistryExtractor, VisuraParser, VisuraRecord};

use super::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input text file, or "-" for stdin
    #[arg(required = true)]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Extraction profile (overrides the config file)
    #[arg(short, long, value_enum)]
    profile: Option<ProfileArg>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Show extraction confidence after the output
    #[arg(long)]
    show_confidence: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON outcome envelope
    Json,
    /// CSV row of key fields
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ProfileArg {
    /// Every field, ratio confidence
    Full,
    /// Partita IVA, activity code and purpose, 0-100 confidence
    Essential,
}

impl From<ProfileArg> for ExtractionProfile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Full => ExtractionProfile::Full,
            ProfileArg::Essential => ExtractionProfile::Essential,
        }
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let text = read_input(&args.input)?;
    info!("Extracting from {} ({} bytes)", args.input, text.len());

    let mut parser = VisuraParser::from_config(config.extraction);
    if let Some(profile) = args.profile {
        parser = parser.with_profile(profile.into());
    }

    let outcome = parser.extract(&text);
    let output = format_outcome(&outcome, args.format, args.pretty || config.output.pretty)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_confidence {
        if let Some(record) = &outcome.data {
            println!();
            println!(
                "{} Extraction confidence: {:.1}% ({})",
                style("ℹ").blue(),
                record.confidence.score.as_fraction() * 100.0,
                record.confidence.assessment
            );
        }
        println!(
            "{} Processing time: {}ms",
            style("ℹ").blue(),
            outcome.processing_time_ms
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    match outcome.error {
        Some(error) => anyhow::bail!("Extraction failed: {}", error),
        None => Ok(()),
    }
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    let path = PathBuf::from(input);
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }
    Ok(fs::read_to_string(&path)?)
}

pub fn format_outcome(
    outcome: &ExtractionOutcome,
    format: OutputFormat,
    pretty: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(outcome)?),
        OutputFormat::Json => Ok(serde_json::to_string(outcome)?),
        OutputFormat::Csv => format_csv(outcome.data.as_ref()),
        OutputFormat::Text => Ok(match &outcome.data {
            Some(record) => format_text(record),
            None => format!(
                "Extraction failed: {}\n",
                outcome.error.as_deref().unwrap_or("unknown error")
            ),
        }),
    }
}

fn format_csv(record: Option<&VisuraRecord>) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "denominazione",
        "partita_iva",
        "codice_fiscale",
        "pec",
        "numero_rea",
        "comune",
        "provincia",
        "codice_ateco",
        "capitale_versato",
        "confidence",
    ])?;

    if let Some(record) = record {
        let office = &record.registered_office;
        let paid = record.share_capital.paid.map(|p| p.to_string()).unwrap_or_default();
        let confidence = format!("{:.2}", record.confidence.score.as_fraction());
        wtr.write_record([
            record.company_name.as_deref().unwrap_or_default(),
            record.vat_number.as_deref().unwrap_or_default(),
            record.fiscal_code.as_deref().unwrap_or_default(),
            record.certified_email.as_deref().unwrap_or_default(),
            record.rea_number.as_deref().unwrap_or_default(),
            office.municipality.as_deref().unwrap_or_default(),
            office.province.as_deref().unwrap_or_default(),
            record.primary_activity().map(|a| a.code.as_str()).unwrap_or_default(),
            paid.as_str(),
            confidence.as_str(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &VisuraRecord) -> String {
    let mut output = String::new();
    let missing = "-";

    output.push_str(&format!(
        "Company: {}\n",
        record.company_name.as_deref().unwrap_or(missing)
    ));
    if let Some(form) = &record.legal_form {
        output.push_str(&format!("Legal form: {}\n", form));
    }
    output.push_str(&format!(
        "Partita IVA: {}\n",
        record.vat_number.as_deref().unwrap_or(missing)
    ));
    if let Some(cf) = &record.fiscal_code {
        output.push_str(&format!("Codice fiscale: {}\n", cf));
    }
    if let Some(rea) = &record.rea_number {
        output.push_str(&format!("REA: {}\n", rea));
    }
    if let Some(pec) = &record.certified_email {
        output.push_str(&format!("PEC: {}\n", pec));
    }
    if !record.registered_office.is_empty() {
        output.push_str(&format!(
            "Registered office: {}\n",
            record.registered_office.format()
        ));
    }
    output.push('\n');

    if !record.activity_codes.is_empty() {
        output.push_str("Activities:\n");
        for activity in &record.activity_codes {
            let marker = if activity.primary { "*" } else { " " };
            output.push_str(&format!(
                "  {} {} {}\n",
                marker, activity.code, activity.description
            ));
        }
        output.push('\n');
    }

    if let Some(purpose) = &record.purpose {
        output.push_str("Purpose:\n");
        output.push_str(&format!("  {}\n\n", purpose));
    }

    if !record.officers.is_empty() {
        output.push_str("Officers:\n");
        for officer in &record.officers {
            output.push_str(&format!("  {} ({})\n", officer.full_name, officer.role));
        }
        output.push('\n');
    }

    output.push_str(&format!(
        "Confidence: {:.2} ({})\n",
        record.confidence.score.as_fraction(),
        record.confidence.assessment
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "Denominazione: ALFA SRL\n\
                        Partita IVA: 01234567890\n\
                        Codice ATECO: 62.01 - Produzione di software";

    #[test]
    fn test_csv_has_header_and_row() {
        let outcome = VisuraParser::new().extract(TEXT);
        let csv = format_outcome(&outcome, OutputFormat::Csv, false).unwrap();
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("denominazione,partita_iva"));
        assert!(lines[1].starts_with("ALFA SRL,01234567890"));
        assert!(lines[1].contains("62.01"));
    }

    #[test]
    fn test_text_marks_primary_activity() {
        let outcome = VisuraParser::new().extract(TEXT);
        let text = format_outcome(&outcome, OutputFormat::Text, false).unwrap();

        assert!(text.contains("Company: ALFA SRL"));
        assert!(text.contains("* 62.01 Produzione di software"));
    }

    #[test]
    fn test_failed_outcome_in_text_format() {
        let outcome = VisuraParser::new().extract("");
        let text = format_outcome(&outcome, OutputFormat::Text, false).unwrap();
        assert!(text.starts_with("Extraction failed:"));
    }
}
