//! Core library for bank statement parsing.
//!
//! This crate provides:
//! - Token normalization (locale amounts, `DD.MM.YY` / `DD.MM.YYYY` dates)
//! - Description cleaning (footer and noise removal)
//! - Line-based statement reconstruction (Freedom-style text pages)
//! - Column-mapped table extraction (Kaspi-style table pages)
//! - Optional PDF page text adapter for line-based statements

pub mod error;
pub mod models;
pub mod normalize;
pub mod cleaner;
pub mod statement;
#[cfg(feature = "pdf")]
pub mod pdf;

pub use error::{VypiskaError, Result};
pub use models::config::VypiskaConfig;
pub use models::transaction::{Direction, Source, TransactionRecord, TransferType};
pub use normalize::{parse_amount, parse_amount_checked, parse_date, DateFormat};
pub use cleaner::DescriptionCleaner;
pub use statement::{
    LinePage, ParseOutcome, StatementDocument, StatementParser, TablePage, TableRow,
};
#[cfg(feature = "pdf")]
pub use pdf::PdfPageSource;
