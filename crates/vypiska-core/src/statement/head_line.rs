//! Head-line decoding for line-based statements.

use regex::Regex;

use super::operations::OperationVocabulary;
use crate::error::ConfigError;
use crate::models::config::LineFormatConfig;
use crate::models::transaction::DecodedTransaction;
use crate::normalize::{parse_amount, parse_date, DateFormat};

const REQUIRED_GROUPS: [&str; 4] = ["date", "amount", "currency", "operation"];

/// Decoder for the first line of a transaction block.
///
/// Example head line:
/// `17.12.2025  -500,00 KZT Перевод Безвозмездный перевод`
#[derive(Debug, Clone)]
pub struct HeadLineDecoder {
    start: Regex,
    head: Regex,
    date_format: DateFormat,
    operations: OperationVocabulary,
}

impl HeadLineDecoder {
    /// Compile the start and head patterns.
    pub fn new(config: &LineFormatConfig) -> Result<Self, ConfigError> {
        let start = anchored(&config.start_pattern)
            .map_err(|e| ConfigError::pattern("start pattern", e))?;
        let head = anchored(&config.head_pattern)
            .map_err(|e| ConfigError::pattern("head pattern", e))?;

        for group in REQUIRED_GROUPS {
            if !head.capture_names().flatten().any(|name| name == group) {
                return Err(ConfigError::MissingGroup(group));
            }
        }

        Ok(Self {
            start,
            head,
            date_format: config.date_format,
            operations: OperationVocabulary::new(&config.operations)?,
        })
    }

    /// Whether `line` opens a new transaction block.
    pub fn is_start(&self, line: &str) -> bool {
        self.start.is_match(line)
    }

    /// Decode a head line; the description holds the raw details pending cleaning.
    ///
    /// A required group that took no part in the match rejects the line.
    pub fn decode(&self, line: &str) -> Option<DecodedTransaction> {
        let caps = self.head.captures(line)?;
        let group = |name: &str| caps.name(name).map(|m| m.as_str());

        let date = parse_date(group("date")?, self.date_format)?;

        let raw_amount = group("amount")?.trim_start();
        let magnitude = parse_amount(raw_amount).abs();
        let amount = if raw_amount.starts_with(['-', '\u{2212}']) {
            -magnitude
        } else {
            magnitude
        };

        Some(DecodedTransaction {
            date,
            amount,
            currency: group("currency")?.to_string(),
            operation: self.operations.normalize(group("operation")?),
            description: group("details").unwrap_or_default().to_string(),
        })
    }
}

/// Compile a pattern that only matches at the start of the line.
fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})", pattern))
}
