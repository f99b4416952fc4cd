//! Statement parsing: per-format extractors and the document assembler.

pub mod head_line;
pub mod line_based;
pub mod operations;
pub mod table;

pub use head_line::HeadLineDecoder;
pub use line_based::LineReconstructor;
pub use operations::OperationVocabulary;
pub use table::{ColumnMap, TableExtractor, TableLayout};

use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cleaner::DescriptionCleaner;
use crate::error::{ConfigError, Result};
#[cfg(feature = "pdf")]
use crate::models::config::PdfConfig;
use crate::models::config::VypiskaConfig;
use crate::models::transaction::{Source, TransactionRecord};
#[cfg(feature = "pdf")]
use crate::pdf::PdfPageSource;

/// One page of a text statement: trimmed, non-empty lines in reading order.
pub type LinePage = Vec<String>;

/// One table row; cells may be null.
pub type TableRow = Vec<Option<String>>;

/// One page of a table statement; `None` when no table was found on the page.
pub type TablePage = Option<Vec<TableRow>>;

/// A statement document as delivered by the page extraction layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "layout", content = "pages", rename_all = "snake_case")]
pub enum StatementDocument {
    /// Line-based text pages.
    Lines(Vec<LinePage>),
    /// Table pages.
    Table(Vec<TablePage>),
}

impl StatementDocument {
    /// Extractor that handles this layout.
    pub fn source(&self) -> Source {
        match self {
            Self::Lines(_) => Source::Freedom,
            Self::Table(_) => Source::Kaspi,
        }
    }

    pub fn page_count(&self) -> usize {
        match self {
            Self::Lines(pages) => pages.len(),
            Self::Table(pages) => pages.len(),
        }
    }

    /// Read a line-based statement from PDF bytes.
    #[cfg(feature = "pdf")]
    pub fn from_pdf(data: &[u8], config: &PdfConfig) -> Result<Self> {
        let pdf = PdfPageSource::load(data)?;
        tracing::debug!("PDF has {} pages", pdf.page_count());
        Ok(Self::Lines(pdf.line_pages(config)?))
    }
}

/// Counters for units dropped while parsing a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Pages consumed.
    pub pages: usize,
    /// Pages that contributed no content (no table, or no lines).
    pub empty_pages: usize,
    /// Date-led lines that failed head-line decoding.
    pub rejected_heads: usize,
    /// Lines discarded because no block was open.
    pub orphan_lines: usize,
    /// Table rows that qualified but failed to decode.
    pub skipped_rows: usize,
}

/// Result of parsing one document.
#[derive(Debug, Clone, Serialize)]
pub struct ParseOutcome {
    /// Records in page order, then physical order within the page.
    pub records: Vec<TransactionRecord>,
    /// Drop counters.
    pub stats: ParseStats,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Document assembler for both statement formats.
///
/// Holds only compiled configuration, so one parser can serve many documents,
/// including from several threads at once.
#[derive(Debug, Clone)]
pub struct StatementParser {
    decoder: HeadLineDecoder,
    layout: TableLayout,
    cleaner: DescriptionCleaner,
}

impl StatementParser {
    /// Compile a parser from configuration.
    pub fn new(config: &VypiskaConfig) -> std::result::Result<Self, ConfigError> {
        Ok(Self {
            decoder: HeadLineDecoder::new(&config.line)?,
            layout: TableLayout::new(&config.table)?,
            cleaner: DescriptionCleaner::new(&config.cleaner)?,
        })
    }

    /// Load a JSON configuration file and compile it.
    pub fn from_config_file(path: &Path) -> Result<Self> {
        let config = VypiskaConfig::from_file(path)?;
        Ok(Self::new(&config)?)
    }

    /// Parse a line-based statement.
    pub fn parse_line_pages(&self, pages: &[LinePage]) -> Vec<TransactionRecord> {
        self.run_lines(pages, &mut ParseStats::default())
    }

    /// Parse a table statement.
    pub fn parse_table_pages(&self, pages: &[TablePage]) -> Vec<TransactionRecord> {
        self.run_table(pages, &mut ParseStats::default())
    }

    /// Parse a document of either layout, with drop counters and timing.
    pub fn parse(&self, document: &StatementDocument) -> ParseOutcome {
        let start = Instant::now();
        let mut stats = ParseStats::default();

        let records = match document {
            StatementDocument::Lines(pages) => self.run_lines(pages, &mut stats),
            StatementDocument::Table(pages) => self.run_table(pages, &mut stats),
        };

        ParseOutcome {
            records,
            stats,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn run_lines(&self, pages: &[LinePage], stats: &mut ParseStats) -> Vec<TransactionRecord> {
        info!("Start parsing line statement: {} pages", pages.len());
        let reconstructor = LineReconstructor::new(&self.decoder, &self.cleaner);
        let mut records = Vec::new();

        for (i, lines) in pages.iter().enumerate() {
            stats.pages += 1;
            if lines.is_empty() {
                stats.empty_pages += 1;
                continue;
            }
            records.extend(
                reconstructor
                    .reconstruct_page(i + 1, lines, stats)
                    .into_iter()
                    .map(|tx| TransactionRecord::new(tx, Source::Freedom)),
            );
        }

        info!("Finished {} parsing | parsed={}", Source::Freedom, records.len());
        records
    }

    fn run_table(&self, pages: &[TablePage], stats: &mut ParseStats) -> Vec<TransactionRecord> {
        info!("Start parsing table statement: {} pages", pages.len());
        let mut extractor = TableExtractor::new(&self.layout, &self.cleaner);
        let mut records = Vec::new();

        for (i, page) in pages.iter().enumerate() {
            stats.pages += 1;
            let Some(rows) = page.as_ref().filter(|rows| !rows.is_empty()) else {
                info!("Page {}: no table", i + 1);
                stats.empty_pages += 1;
                continue;
            };
            records.extend(
                extractor
                    .extract_page(i + 1, rows, stats)
                    .into_iter()
                    .map(|tx| TransactionRecord::new(tx, Source::Kaspi)),
            );
        }

        info!("Finished {} parsing | parsed={}", Source::Kaspi, records.len());
        records
    }
}
