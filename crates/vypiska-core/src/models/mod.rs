//! Data models for statement parsing.

pub mod config;
pub mod transaction;

pub use config::{CleanerConfig, LineFormatConfig, OperationConfig, PdfConfig, TableFormatConfig, VypiskaConfig};
pub use transaction::{DecodedTransaction, Direction, Source, TransactionRecord, TransferType};
