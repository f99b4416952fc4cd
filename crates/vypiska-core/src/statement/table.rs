//! Column-mapped table extraction.
//!
//! Table statements carry a header row on the first page only; later pages
//! are bare rows. Column positions learned from a header are kept for the rest
//! of the document until another header redefines them.

use regex::Regex;
use tracing::{debug, info, trace};

use super::operations::OperationVocabulary;
use super::{ParseStats, TableRow};
use crate::cleaner::DescriptionCleaner;
use crate::error::{ConfigError, ExtractionError};
use crate::models::config::TableFormatConfig;
use crate::models::transaction::DecodedTransaction;
use crate::normalize::{parse_amount, parse_date, DateFormat};

/// Column positions learned from header rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: Option<usize>,
    pub amount: Option<usize>,
    pub operation: Option<usize>,
    pub details: Option<usize>,
}

impl ColumnMap {
    fn resolved(&self) -> Option<ResolvedColumns> {
        Some(ResolvedColumns {
            date: self.date?,
            amount: self.amount?,
            operation: self.operation?,
            details: self.details,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct ResolvedColumns {
    date: usize,
    amount: usize,
    operation: usize,
    details: Option<usize>,
}

/// Compiled table layout rules.
#[derive(Debug, Clone)]
pub struct TableLayout {
    date_keyword: String,
    amount_keyword: String,
    operation_keyword: String,
    details_keyword: String,
    row_prefix: Regex,
    date_format: DateFormat,
    currency: String,
    operations: OperationVocabulary,
}

impl TableLayout {
    pub fn new(config: &TableFormatConfig) -> Result<Self, ConfigError> {
        let keyword = |value: &str, name: &'static str| {
            let value = value.trim().to_lowercase();
            if value.is_empty() {
                Err(ConfigError::Empty(name))
            } else {
                Ok(value)
            }
        };

        Ok(Self {
            date_keyword: keyword(&config.date_keyword, "date keyword")?,
            amount_keyword: keyword(&config.amount_keyword, "amount keyword")?,
            operation_keyword: keyword(&config.operation_keyword, "operation keyword")?,
            details_keyword: keyword(&config.details_keyword, "details keyword")?,
            row_prefix: Regex::new(&config.row_prefix_pattern)
                .map_err(|e| ConfigError::pattern("row prefix pattern", e))?,
            date_format: config.date_format,
            currency: config.currency.clone(),
            operations: OperationVocabulary::new(&config.operations)?,
        })
    }

    fn looks_like_header(&self, row: &[String]) -> bool {
        let joined = row
            .iter()
            .filter(|cell| !cell.is_empty())
            .map(|cell| cell.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");

        joined.contains(&self.date_keyword)
            && joined.contains(&self.amount_keyword)
            && joined.contains(&self.operation_keyword)
    }

    fn looks_like_transaction(&self, row: &[String]) -> bool {
        row.first()
            .is_some_and(|first| !first.is_empty() && self.row_prefix.is_match(first))
    }
}

/// Extracts transactions from one document's table pages.
///
/// One extractor per document: the column map it owns is carried from page
/// to page and must not leak into another document.
#[derive(Debug)]
pub struct TableExtractor<'a> {
    layout: &'a TableLayout,
    cleaner: &'a DescriptionCleaner,
    columns: ColumnMap,
}

impl<'a> TableExtractor<'a> {
    pub fn new(layout: &'a TableLayout, cleaner: &'a DescriptionCleaner) -> Self {
        Self {
            layout,
            cleaner,
            columns: ColumnMap::default(),
        }
    }

    /// Column positions known so far.
    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    /// Extract all transaction rows of one page, updating the column map.
    pub fn extract_page(
        &mut self,
        page_num: usize,
        rows: &[TableRow],
        stats: &mut ParseStats,
    ) -> Vec<DecodedTransaction> {
        let mut transactions = Vec::new();

        for (row_num, raw) in rows.iter().enumerate() {
            let row: Vec<String> = raw
                .iter()
                .map(|cell| cell.as_deref().unwrap_or("").trim().to_string())
                .collect();

            if self.layout.looks_like_header(&row) {
                debug!("Page {}: header detected at row {}", page_num, row_num + 1);
                self.learn_columns(&row);
                continue;
            }

            let Some(columns) = self.columns.resolved() else {
                continue;
            };

            if !self.layout.looks_like_transaction(&row) {
                continue;
            }

            match self.decode_row(columns, &row) {
                Ok(Some(tx)) => transactions.push(tx),
                Ok(None) => {
                    trace!("Page {} row {}: unparsable date, skipped", page_num, row_num + 1);
                    stats.skipped_rows += 1;
                }
                Err(e) => {
                    debug!("Page {} row {}: {}", page_num, row_num + 1, e);
                    stats.skipped_rows += 1;
                }
            }
        }

        info!("Page {}: parsed={}", page_num, transactions.len());
        transactions
    }

    fn learn_columns(&mut self, row: &[String]) {
        let layout = self.layout;
        for (i, cell) in row.iter().enumerate() {
            let low = cell.to_lowercase();
            if low.contains(&layout.date_keyword) {
                self.columns.date = Some(i);
            } else if low.contains(&layout.amount_keyword) {
                self.columns.amount = Some(i);
            } else if low.contains(&layout.operation_keyword) {
                self.columns.operation = Some(i);
            } else if low.contains(&layout.details_keyword) {
                self.columns.details = Some(i);
            }
        }
        debug!("Column map: {:?}", self.columns);
    }

    /// Decode one qualifying row. `Ok(None)` means the date did not parse.
    fn decode_row(
        &self,
        columns: ResolvedColumns,
        row: &[String],
    ) -> Result<Option<DecodedTransaction>, ExtractionError> {
        let Some(date) = parse_date(cell(row, "date", columns.date)?, self.layout.date_format)
        else {
            return Ok(None);
        };

        let amount = parse_amount(cell(row, "amount", columns.amount)?);
        let operation = self
            .layout
            .operations
            .normalize(cell(row, "operation", columns.operation)?);
        let details = match columns.details {
            Some(index) => cell(row, "details", index)?,
            None => "",
        };

        Ok(Some(DecodedTransaction {
            date,
            amount,
            currency: self.layout.currency.clone(),
            operation,
            description: self.cleaner.clean(details),
        }))
    }
}

fn cell<'r>(row: &'r [String], column: &'static str, index: usize) -> Result<&'r str, ExtractionError> {
    row.get(index)
        .map(String::as_str)
        .ok_or(ExtractionError::MissingColumn { column, index })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::CleanerConfig;
    use crate::models::transaction::Direction;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn row(cells: &[&str]) -> TableRow {
        cells.iter().map(|c| Some(c.to_string())).collect()
    }

    fn header() -> TableRow {
        row(&["Дата", "Сумма", "Операция", "Детали"])
    }

    fn fixtures() -> (TableLayout, DescriptionCleaner) {
        (
            TableLayout::new(&TableFormatConfig::default()).unwrap(),
            DescriptionCleaner::new(&CleanerConfig::default()).unwrap(),
        )
    }

    #[test]
    fn test_extracts_rows_after_header() {
        let (layout, cleaner) = fixtures();
        let mut extractor = TableExtractor::new(&layout, &cleaner);
        let mut stats = ParseStats::default();

        let txs = extractor.extract_page(
            1,
            &[
                header(),
                row(&["17.12.25", "-2 880,00 ₸", "ПОКУПКА", "  Magnum   Cash&Carry "]),
                row(&["18.12.25", "+3 000,00 ₸", "пополнение", "С Kaspi Депозита"]),
            ],
            &mut stats,
        );

        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].date, NaiveDate::from_ymd_opt(2025, 12, 17).unwrap());
        assert_eq!(txs[0].amount, Decimal::from_str("-2880.00").unwrap());
        assert_eq!(txs[0].operation, "Покупка");
        assert_eq!(txs[0].description, "Magnum Cash&Carry");
        assert_eq!(txs[0].currency, "KZT");
        assert_eq!(txs[1].direction(), Direction::Income);
        assert_eq!(txs[1].operation, "Пополнение");
    }

    #[test]
    fn test_rows_before_header_skipped() {
        let (layout, cleaner) = fixtures();
        let mut extractor = TableExtractor::new(&layout, &cleaner);
        let mut stats = ParseStats::default();

        let txs = extractor.extract_page(
            1,
            &[row(&["17.12.25", "-100,00 ₸", "Покупка", "Кофе"])],
            &mut stats,
        );

        assert!(txs.is_empty());
        assert_eq!(extractor.columns(), &ColumnMap::default());
    }

    #[test]
    fn test_header_columns_in_any_order() {
        let (layout, cleaner) = fixtures();
        let mut extractor = TableExtractor::new(&layout, &cleaner);
        let mut stats = ParseStats::default();

        let txs = extractor.extract_page(
            1,
            &[
                row(&["Дата", "Операция", "Детали", "Сумма"]),
                row(&["17.12.25", "Перевод", "Айгерим Б.", "-5 000,00 ₸"]),
            ],
            &mut stats,
        );

        assert_eq!(
            extractor.columns(),
            &ColumnMap {
                date: Some(0),
                amount: Some(3),
                operation: Some(1),
                details: Some(2),
            }
        );
        assert_eq!(txs[0].amount, Decimal::from_str("-5000.00").unwrap());
        assert_eq!(txs[0].description, "Айгерим Б.");
    }

    #[test]
    fn test_header_persists_across_pages() {
        let (layout, cleaner) = fixtures();
        let mut extractor = TableExtractor::new(&layout, &cleaner);
        let mut stats = ParseStats::default();

        let first = extractor.extract_page(
            1,
            &[header(), row(&["01.12.25", "-100,00 ₸", "Покупка", "A"])],
            &mut stats,
        );
        let second = extractor.extract_page(2, &[row(&["02.12.25", "-200,00 ₸", "Покупка", "B"])], &mut stats);
        let third = extractor.extract_page(3, &[row(&["03.12.25", "+300,00 ₸", "Пополнение", "C"])], &mut stats);

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].description, "B");
        assert_eq!(third.len(), 1);
        assert_eq!(third[0].amount, Decimal::from_str("300.00").unwrap());
    }

    #[test]
    fn test_later_header_redefines_columns() {
        let (layout, cleaner) = fixtures();
        let mut extractor = TableExtractor::new(&layout, &cleaner);
        let mut stats = ParseStats::default();

        extractor.extract_page(1, &[header()], &mut stats);
        let txs = extractor.extract_page(
            2,
            &[
                row(&["Дата", "Операция", "Сумма"]),
                row(&["05.12.25", "Покупка", "-50,00 ₸"]),
            ],
            &mut stats,
        );

        // Details keeps its earlier index, which this narrower table lacks.
        assert!(txs.is_empty());
        assert_eq!(stats.skipped_rows, 1);
        assert_eq!(extractor.columns().amount, Some(2));
    }

    #[test]
    fn test_non_transaction_rows_skipped() {
        let (layout, cleaner) = fixtures();
        let mut extractor = TableExtractor::new(&layout, &cleaner);
        let mut stats = ParseStats::default();

        let txs = extractor.extract_page(
            1,
            &[
                header(),
                row(&["Итого", "-3 000,00 ₸", "", ""]),
                vec![None, Some("-1,00".to_string()), None, None],
                vec![],
                row(&["17.12.25", "-1 000,00 ₸", "Покупка", "Small"]),
            ],
            &mut stats,
        );

        assert_eq!(txs.len(), 1);
        assert_eq!(stats.skipped_rows, 0);
    }

    #[test]
    fn test_invalid_date_skips_row() {
        let (layout, cleaner) = fixtures();
        let mut extractor = TableExtractor::new(&layout, &cleaner);
        let mut stats = ParseStats::default();

        let txs = extractor.extract_page(
            1,
            &[
                header(),
                row(&["31.13.25", "-1,00 ₸", "Покупка", "x"]),
                row(&["17.12.25 12:30", "-1,00 ₸", "Покупка", "y"]),
                row(&["17.12.25", "-1,00 ₸", "Покупка", "z"]),
            ],
            &mut stats,
        );

        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].description, "z");
        assert_eq!(stats.skipped_rows, 2);
    }

    #[test]
    fn test_short_row_does_not_stop_page() {
        let (layout, cleaner) = fixtures();
        let mut extractor = TableExtractor::new(&layout, &cleaner);
        let mut stats = ParseStats::default();

        let txs = extractor.extract_page(
            1,
            &[
                header(),
                row(&["16.12.25"]),
                row(&["17.12.25", "-1 000,00 ₸", "Покупка", "Small"]),
            ],
            &mut stats,
        );

        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].description, "Small");
        assert_eq!(stats.skipped_rows, 1);
    }

    #[test]
    fn test_unknown_operation_kept() {
        let (layout, cleaner) = fixtures();
        let mut extractor = TableExtractor::new(&layout, &cleaner);
        let mut stats = ParseStats::default();

        let txs = extractor.extract_page(
            1,
            &[header(), row(&["17.12.25", "+90,00 ₸", "КЭШБЭК", "Бонусы"])],
            &mut stats,
        );

        assert_eq!(txs[0].operation, "Кэшбэк");
    }

    #[test]
    fn test_missing_details_column_yields_empty_description() {
        let (layout, cleaner) = fixtures();
        let mut extractor = TableExtractor::new(&layout, &cleaner);
        let mut stats = ParseStats::default();

        let txs = extractor.extract_page(
            1,
            &[
                row(&["Дата", "Сумма", "Операция"]),
                row(&["17.12.25", "-10,00 ₸", "Покупка"]),
            ],
            &mut stats,
        );

        assert_eq!(txs[0].description, "");
    }

    #[test]
    fn test_garbage_amount_is_zero() {
        let (layout, cleaner) = fixtures();
        let mut extractor = TableExtractor::new(&layout, &cleaner);
        let mut stats = ParseStats::default();

        let txs = extractor.extract_page(
            1,
            &[header(), row(&["17.12.25", "—", "Покупка", "?"])],
            &mut stats,
        );

        assert_eq!(txs[0].amount, Decimal::ZERO);
        assert_eq!(txs[0].direction(), Direction::Neutral);
    }
}
