//! Configuration structures for statement parsing.
//!
//! Every pattern, keyword and label the extractors rely on lives here as data,
//! so another statement layout can be supported by supplying a new bundle.

use serde::{Deserialize, Serialize};

use crate::normalize::DateFormat;

/// Main configuration for the vypiska pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VypiskaConfig {
    /// Line-based (Freedom) statement configuration.
    pub line: LineFormatConfig,

    /// Table (Kaspi) statement configuration.
    pub table: TableFormatConfig,

    /// Description cleaning shared by both formats.
    pub cleaner: CleanerConfig,

    /// PDF page adapter configuration.
    pub pdf: PdfConfig,
}

/// Line-based statement configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LineFormatConfig {
    /// Pattern recognizing the first line of a transaction block.
    pub start_pattern: String,

    /// Full head-line pattern with named groups
    /// `date`, `amount`, `currency`, `operation` and optional `details`.
    pub head_pattern: String,

    /// Date rule for the head line.
    pub date_format: DateFormat,

    /// Operation label policy.
    pub operations: OperationConfig,
}

impl Default for LineFormatConfig {
    fn default() -> Self {
        Self {
            start_pattern: r"^\d{2}\.\d{2}\.\d{4}".to_string(),
            head_pattern: concat!(
                r"^(?P<date>\d{2}\.\d{2}\.\d{4})\s+",
                r"(?P<amount>[+\-−]?\s?\d[\d\s]*(?:[.,]\d{1,2})?)\s+",
                r"(?P<currency>[A-Z]{3})\s+",
                r"(?P<operation>\S+)",
                r"(?:\s+(?P<details>.*))?$"
            )
            .to_string(),
            date_format: DateFormat::LongYear,
            operations: OperationConfig {
                coerce_unknown: true,
                ..OperationConfig::default()
            },
        }
    }
}

/// Table statement configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableFormatConfig {
    /// Substring identifying the date column header.
    pub date_keyword: String,

    /// Substring identifying the amount column header.
    pub amount_keyword: String,

    /// Substring identifying the operation column header.
    pub operation_keyword: String,

    /// Substring identifying the optional details column header.
    pub details_keyword: String,

    /// Pattern the first cell of a transaction row must match.
    pub row_prefix_pattern: String,

    /// Date rule for the date column.
    pub date_format: DateFormat,

    /// Currency assigned to every row.
    pub currency: String,

    /// Operation label policy.
    pub operations: OperationConfig,
}

impl Default for TableFormatConfig {
    fn default() -> Self {
        Self {
            date_keyword: "дата".to_string(),
            amount_keyword: "сумм".to_string(),
            operation_keyword: "операц".to_string(),
            details_keyword: "детал".to_string(),
            row_prefix_pattern: r"^\d{2}\.\d{2}\.\d{2}".to_string(),
            date_format: DateFormat::ShortYear,
            currency: "KZT".to_string(),
            operations: OperationConfig {
                coerce_unknown: false,
                ..OperationConfig::default()
            },
        }
    }
}

/// Closed operation vocabulary and the policy for labels outside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationConfig {
    /// Recognized operation labels (capitalized).
    pub known: Vec<String>,

    /// Label substituted for unknown operations.
    pub default_label: String,

    /// Replace labels outside `known` with `default_label`.
    pub coerce_unknown: bool,
}

impl Default for OperationConfig {
    fn default() -> Self {
        Self {
            known: [
                "Покупка",
                "Перевод",
                "Пополнение",
                "Снятие",
                "Платеж",
                "Доход",
                "Возврат",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            default_label: "Покупка".to_string(),
            coerce_unknown: true,
        }
    }
}

/// Description cleaning configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// Phrases that start page footers; text is cut at the first one found.
    pub footer_markers: Vec<String>,

    /// Regular expressions removed from descriptions, applied in order.
    pub noise_patterns: Vec<String>,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            footer_markers: [
                "по всем вопросам",
                "выписка сформирована",
                "ао «фридом банк казахстан»",
                "ао «kaspi bank»",
                "лицензия №",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            noise_patterns: [
                r"курс\s+конвертации\s*:?\s*[\d\s.,]+",
                r"исх\.?\s*№\s*\S+",
                r"стр\.?\s*\d+\s+из\s+\d+",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// PDF page adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to read (0 = unlimited).
    pub max_pages: usize,

    /// Minimum text length to consider the PDF text-based.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            min_text_length: 50,
        }
    }
}

impl VypiskaConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coercion_defaults_differ_per_format() {
        let config = VypiskaConfig::default();
        assert!(config.line.operations.coerce_unknown);
        assert!(!config.table.operations.coerce_unknown);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: VypiskaConfig =
            serde_json::from_str(r#"{"table": {"currency": "USD"}}"#).unwrap();

        assert_eq!(config.table.currency, "USD");
        assert_eq!(config.table.date_keyword, "дата");
        assert_eq!(config.line.date_format, DateFormat::LongYear);
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("vypiska-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");

        let mut config = VypiskaConfig::default();
        config.pdf.max_pages = 3;
        config.save(&path).unwrap();

        let loaded = VypiskaConfig::from_file(&path).unwrap();
        assert_eq!(loaded.pdf.max_pages, 3);
        assert_eq!(loaded.cleaner.footer_markers, config.cleaner.footer_markers);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_malformed_file_is_json_error() {
        let dir = std::env::temp_dir().join(format!("vypiska-bad-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, "{ \"line\": ").unwrap();

        let result = VypiskaConfig::from_file(&path);
        assert!(matches!(result, Err(crate::VypiskaError::Json(_))));

        let missing = VypiskaConfig::from_file(&dir.join("absent.json"));
        assert!(matches!(missing, Err(crate::VypiskaError::Io(_))));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
