//! CLI subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod parse;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use vypiska_core::models::config::VypiskaConfig;
use vypiska_core::statement::{LinePage, StatementDocument, TablePage};
use vypiska_core::{Source, TransactionRecord};

/// Statement layout selected on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum SourceArg {
    /// Line-based text statement (PDF or JSON pages of lines)
    Freedom,
    /// Table statement (JSON pages of rows)
    Kaspi,
}

impl SourceArg {
    /// Pick the layout from the file name when none is given: names containing
    /// "kaspi" are table statements, everything else is line-based.
    pub fn resolve(explicit: Option<Self>, path: &Path) -> Self {
        explicit.unwrap_or_else(|| {
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("")
                .to_lowercase();
            if name.contains("kaspi") {
                Self::Kaspi
            } else {
                Self::Freedom
            }
        })
    }

    pub fn source(self) -> Source {
        match self {
            Self::Freedom => Source::Freedom,
            Self::Kaspi => Source::Kaspi,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text table
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text => "txt",
        }
    }
}

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vypiska")
        .join("config.json")
}

/// Load the explicit config, else the default file if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<VypiskaConfig> {
    if let Some(path) = config_path {
        return Ok(VypiskaConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config from {}", default_path.display());
        Ok(VypiskaConfig::from_file(&default_path)?)
    } else {
        Ok(VypiskaConfig::default())
    }
}

/// Read a statement file into pages for the selected layout.
pub fn load_document(
    path: &Path,
    source: SourceArg,
    config: &VypiskaConfig,
) -> anyhow::Result<StatementDocument> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match (source, extension.as_str()) {
        (SourceArg::Freedom, "pdf") => {
            let data = fs::read(path)?;
            Ok(StatementDocument::from_pdf(&data, &config.pdf)?)
        }
        (SourceArg::Freedom, "json") => {
            let pages: Vec<LinePage> = serde_json::from_str(&fs::read_to_string(path)?)?;
            Ok(StatementDocument::Lines(pages))
        }
        (SourceArg::Kaspi, "json") => {
            let pages: Vec<TablePage> = serde_json::from_str(&fs::read_to_string(path)?)?;
            Ok(StatementDocument::Table(pages))
        }
        (SourceArg::Kaspi, "pdf") => anyhow::bail!(
            "Table statements must be supplied as JSON table pages, not PDF: {}",
            path.display()
        ),
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    }
}

/// Render records in the requested format.
pub fn format_records(records: &[TransactionRecord], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        OutputFormat::Csv => format_csv(records),
        OutputFormat::Text => Ok(format_text(records)),
    }
}

fn format_csv(records: &[TransactionRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "date",
        "amount",
        "currency",
        "operation",
        "description",
        "direction",
        "transfer_type",
        "source",
    ])?;

    for record in records {
        wtr.write_record([
            record.date().to_string(),
            record.amount().to_string(),
            record.currency().to_string(),
            record.operation().to_string(),
            record.description().to_string(),
            record.direction().as_str().to_string(),
            record
                .transfer_type()
                .map(|t| t.as_str().to_string())
                .unwrap_or_default(),
            record.source().as_str().to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(records: &[TransactionRecord]) -> String {
    let mut output = String::new();

    for record in records {
        output.push_str(&format!(
            "{}  {:>14} {}  {:<12} {}\n",
            record.date().format("%d.%m.%Y"),
            record.amount().to_string(),
            record.currency(),
            record.operation(),
            record.description()
        ));
    }

    output.push_str(&format!("\n{} transactions\n", records.len()));
    output
}
