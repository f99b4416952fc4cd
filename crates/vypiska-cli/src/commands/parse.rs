//! Parse command - extract transactions from a single statement.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use vypiska_core::StatementParser;

use super::{format_records, load_config, load_document, OutputFormat, SourceArg};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input file (PDF or JSON pages)
    #[arg(required = true)]
    input: PathBuf,

    /// Statement layout (default: guessed from the file name)
    #[arg(short, long, value_enum)]
    source: Option<SourceArg>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show counts of dropped lines and rows
    #[arg(long)]
    show_stats: bool,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let parser = StatementParser::new(&config)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let source = SourceArg::resolve(args.source, &args.input);
    info!("Processing {} statement: {}", source.source(), args.input.display());

    let document = load_document(&args.input, source, &config)?;
    let outcome = parser.parse(&document);

    let output = format_records(&outcome.records, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} {} transactions written to {}",
            style("✓").green(),
            outcome.records.len(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_stats {
        let stats = &outcome.stats;
        eprintln!();
        eprintln!(
            "{} Pages: {} ({} empty)",
            style("ℹ").blue(),
            stats.pages,
            stats.empty_pages
        );
        eprintln!(
            "{} Dropped: {} head lines, {} orphan lines, {} rows",
            style("ℹ").blue(),
            stats.rejected_heads,
            stats.orphan_lines,
            stats.skipped_rows
        );
        eprintln!(
            "{} Processing time: {}ms",
            style("ℹ").blue(),
            outcome.processing_time_ms
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
