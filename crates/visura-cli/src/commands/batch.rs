//! Batch command - extract registry fields from many text files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use visura_core::{ExtractionOutcome, RegistryExtractor, VisuraParser};

use super::extract::{format_outcome, OutputFormat, ProfileArg};
use super::load_config;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching the input text files
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Extraction profile (overrides the config file)
    #[arg(short, long, value_enum)]
    profile: Option<ProfileArg>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    outcome: Option<ExtractionOutcome>,
    error: Option<String>,
}

impl FileResult {
    fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut parser = VisuraParser::from_config(config.extraction);
    if let Some(profile) = args.profile {
        parser = parser.with_profile(profile.into());
    }
    let parser = Arc::new(parser);
    let permits = Arc::new(Semaphore::new(args.jobs.max(1)));

    let mut tasks = JoinSet::new();
    for (index, path) in files.into_iter().enumerate() {
        let parser = Arc::clone(&parser);
        let permits = Arc::clone(&permits);
        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await;
            let result = tokio::task::spawn_blocking(move || process_file(path, &parser)).await;
            (index, result)
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let (index, result) = joined?;
        let result = result?;

        if let Some(error_msg) = &result.error {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), error_msg);
            } else {
                error!("Failed to process {}: {}", result.path.display(), error_msg);
                tasks.abort_all();
                pb.abandon();
                anyhow::bail!("Processing failed: {}", error_msg);
            }
        }

        pb.inc(1);
        results.push((index, result));
    }
    pb.finish_with_message("Complete");

    results.sort_by_key(|(index, _)| *index);
    let results: Vec<FileResult> = results.into_iter().map(|(_, r)| r).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &results {
            if let Some(outcome) = &result.outcome {
                let output_name = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("visura");
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                let content = format_outcome(outcome, args.format, config.output.pretty)?;
                fs::write(&output_path, content)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| !r.succeeded()).collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_file(path: PathBuf, parser: &VisuraParser) -> FileResult {
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) => {
            return FileResult {
                path,
                outcome: None,
                error: Some(e.to_string()),
            };
        }
    };

    let outcome = parser.extract(&text);
    FileResult {
        path,
        error: outcome.error.clone(),
        outcome: Some(outcome),
    }
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "denominazione",
        "partita_iva",
        "codice_ateco",
        "confidence",
        "warnings",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let status = if result.succeeded() { "success" } else { "error" };
        let error = result.error.as_deref().unwrap_or("");

        let record = result.outcome.as_ref().and_then(|o| o.data.as_ref());
        let time_ms = result
            .outcome
            .as_ref()
            .map(|o| o.processing_time_ms.to_string())
            .unwrap_or_default();
        let warnings = result
            .outcome
            .as_ref()
            .map(|o| o.warnings.len().to_string())
            .unwrap_or_default();
        let confidence = record
            .map(|r| format!("{:.2}", r.confidence.score.as_fraction()))
            .unwrap_or_default();

        wtr.write_record([
            filename,
            status,
            record.and_then(|r| r.company_name.as_deref()).unwrap_or_default(),
            record.and_then(|r| r.vat_number.as_deref()).unwrap_or_default(),
            record
                .and_then(|r| r.primary_activity())
                .map(|a| a.code.as_str())
                .unwrap_or_default(),
            confidence.as_str(),
            warnings.as_str(),
            time_ms.as_str(),
            error,
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
