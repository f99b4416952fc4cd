//! Transaction record model shared by both statement formats.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Money flow direction, derived from the sign of the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Positive amount.
    Income,
    /// Negative amount.
    Expense,
    /// Zero amount.
    Neutral,
}

impl Direction {
    /// Classify an amount by its sign.
    pub fn from_amount(amount: Decimal) -> Self {
        if amount.is_zero() {
            Self::Neutral
        } else if amount.is_sign_negative() {
            Self::Expense
        } else {
            Self::Income
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Neutral => "neutral",
        }
    }
}

/// Transfer classification assigned downstream of parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferType {
    /// Transfer between the account holder's own accounts.
    #[serde(rename = "self")]
    Own,
    /// Transfer to a family member.
    Family,
    /// Transfer to anyone else.
    Other,
}

impl TransferType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Own => "self",
            Self::Family => "family",
            Self::Other => "other",
        }
    }
}

/// Extractor that produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Line-based text statement.
    Freedom,
    /// Column-mapped table statement.
    Kaspi,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Freedom => "freedom",
            Self::Kaspi => "kaspi",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transaction decoded by an extractor, before it is tagged with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTransaction {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub currency: String,
    pub operation: String,
    pub description: String,
}

impl DecodedTransaction {
    /// Direction implied by the amount.
    pub fn direction(&self) -> Direction {
        Direction::from_amount(self.amount)
    }
}

/// A reconstructed statement transaction.
///
/// Fields are read-only; `direction` is always consistent with `amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRecord {
    date: NaiveDate,
    amount: Decimal,
    currency: String,
    operation: String,
    description: String,
    direction: Direction,
    transfer_type: Option<TransferType>,
    source: Source,
}

impl TransactionRecord {
    /// Finalize a decoded transaction.
    pub fn new(decoded: DecodedTransaction, source: Source) -> Self {
        let direction = decoded.direction();
        Self {
            date: decoded.date,
            amount: decoded.amount,
            currency: decoded.currency,
            operation: decoded.operation,
            description: decoded.description,
            direction,
            transfer_type: None,
            source,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn transfer_type(&self) -> Option<TransferType> {
        self.transfer_type
    }

    pub fn source(&self) -> Source {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn decoded(amount: &str) -> DecodedTransaction {
        DecodedTransaction {
            date: NaiveDate::from_ymd_opt(2025, 12, 17).unwrap(),
            amount: Decimal::from_str(amount).unwrap(),
            currency: "KZT".to_string(),
            operation: "Покупка".to_string(),
            description: "Magnum".to_string(),
        }
    }

    #[test]
    fn test_direction_follows_sign() {
        assert_eq!(Direction::from_amount(Decimal::from_str("10.5").unwrap()), Direction::Income);
        assert_eq!(Direction::from_amount(Decimal::from_str("-0.01").unwrap()), Direction::Expense);
        assert_eq!(Direction::from_amount(Decimal::ZERO), Direction::Neutral);
        assert_eq!(Direction::from_amount(Decimal::from_str("-0.00").unwrap()), Direction::Neutral);
    }

    #[test]
    fn test_record_derives_direction() {
        let record = TransactionRecord::new(decoded("-500.00"), Source::Freedom);
        assert_eq!(record.direction(), Direction::Expense);
        assert_eq!(record.transfer_type(), None);
        assert_eq!(record.source(), Source::Freedom);
    }

    #[test]
    fn test_record_serialization() {
        let record = TransactionRecord::new(decoded("3000.00"), Source::Kaspi);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["date"], "2025-12-17");
        assert_eq!(json["amount"], "3000.00");
        assert_eq!(json["direction"], "income");
        assert_eq!(json["source"], "kaspi");
        assert!(json["transfer_type"].is_null());
    }

    #[test]
    fn test_transfer_type_serializes_self() {
        assert_eq!(serde_json::to_string(&TransferType::Own).unwrap(), "\"self\"");
    }
}
