//! Error types for the vypiska-core library.

use thiserror::Error;

/// Main error type for the vypiska library.
#[derive(Error, Debug)]
pub enum VypiskaError {
    /// Configuration could not be compiled.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while compiling a configuration bundle.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A configured regular expression does not compile.
    #[error("invalid pattern for {name}: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    /// The head-line pattern lacks a required named group.
    #[error("head-line pattern is missing the named group `{0}`")]
    MissingGroup(&'static str),

    /// A keyword or label list that must not be empty is empty.
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from a page.
    #[error("failed to extract text from page {page}: {reason}")]
    TextExtraction { page: u32, reason: String },

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Too little embedded text; likely a scanned document.
    #[error("PDF has only {0} characters of embedded text")]
    NoText(usize),
}

/// Errors raised while decoding a single table row.
///
/// These never leave the extractor: the offending row is logged and skipped.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The row is shorter than a mapped column index.
    #[error("row has no {column} column at index {index}")]
    MissingColumn { column: &'static str, index: usize },
}

impl ConfigError {
    pub(crate) fn pattern(name: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidPattern {
            name: name.into(),
            source,
        }
    }
}

/// Result type for the vypiska library.
pub type Result<T> = std::result::Result<T, VypiskaError>;
