//! Batch command - parse many statements, several documents at a time.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use vypiska_core::models::config::VypiskaConfig;
use vypiska_core::{ParseOutcome, StatementParser};

use super::{format_records, load_config, load_document, OutputFormat, SourceArg};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Statement layout for every file (default: guessed per file name)
    #[arg(short, long, value_enum)]
    source: Option<SourceArg>,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of documents parsed concurrently
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    source: SourceArg,
    outcome: Option<ParseOutcome>,
    error: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = Arc::new(load_config(config_path)?);
    let parser = Arc::new(StatementParser::new(&config)?);

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "pdf" | "json")
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

    // Each task builds its own extractor state.
    let permits = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut handles = Vec::with_capacity(files.len());

    for path in files {
        let source = SourceArg::resolve(args.source, &path);
        let permit = permits.clone().acquire_owned().await?;
        let parser = Arc::clone(&parser);
        let config = Arc::clone(&config);
        let pb = pb.clone();

        handles.push(tokio::task::spawn_blocking(move || {
            let result = parse_file(&path, source, &parser, &config);
            pb.inc(1);
            drop(permit);
            (path, source, result)
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let (path, source, result) = handle.await?;
        match result {
            Ok(outcome) => results.push(FileResult {
                path,
                source,
                outcome: Some(outcome),
                error: None,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(FileResult {
                        path,
                        source,
                        outcome: None,
                        error: Some(error_msg),
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }
    }

    pb.finish_with_message("Complete");

    if let Some(output_dir) = &args.output_dir {
        for result in &results {
            if let Some(outcome) = &result.outcome {
                let output_name = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("statement");
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                fs::write(&output_path, format_records(&outcome.records, args.format)?)?;
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

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
    let transactions: usize = results
        .iter()
        .filter_map(|r| r.outcome.as_ref())
        .map(|o| o.records.len())
        .sum();

    println!();
    println!(
        "{} Processed {} files ({} transactions) in {:?}",
        style("✓").green(),
        results.len(),
        transactions,
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

fn parse_file(
    path: &Path,
    source: SourceArg,
    parser: &StatementParser,
    config: &VypiskaConfig,
) -> anyhow::Result<ParseOutcome> {
    let document = load_document(path, source, config)?;
    Ok(parser.parse(&document))
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "source",
        "pages",
        "transactions",
        "rejected_heads",
        "orphan_lines",
        "skipped_rows",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();
        let source = result.source.source().as_str().to_string();

        if let Some(outcome) = &result.outcome {
            let stats = &outcome.stats;
            wtr.write_record([
                filename,
                "success".to_string(),
                source,
                stats.pages.to_string(),
                outcome.records.len().to_string(),
                stats.rejected_heads.to_string(),
                stats.orphan_lines.to_string(),
                stats.skipped_rows.to_string(),
                outcome.processing_time_ms.to_string(),
                String::new(),
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error".to_string(),
                source,
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                result.error.clone().unwrap_or_default(),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
