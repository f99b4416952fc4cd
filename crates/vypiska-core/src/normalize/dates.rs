//! Date normalization for statement tokens.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref DATE_SHORT_YEAR: Regex = Regex::new(r"^(\d{1,2})\.(\d{1,2})\.(\d{2})$").unwrap();
    static ref DATE_LONG_YEAR: Regex = Regex::new(r"^(\d{1,2})\.(\d{1,2})\.(\d{4})$").unwrap();
}

/// Supported day-first date layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFormat {
    /// `DD.MM.YY`
    ShortYear,
    /// `DD.MM.YYYY`
    LongYear,
}

/// Parse a day-first date in the given layout.
///
/// Returns `None` when the text does not match or names an impossible date.
pub fn parse_date(text: &str, format: DateFormat) -> Option<NaiveDate> {
    let text = text.trim();
    match format {
        DateFormat::ShortYear => {
            let caps = DATE_SHORT_YEAR.captures(text)?;
            let year = expand_year(caps[3].parse().ok()?);
            build_date(&caps, year)
        }
        DateFormat::LongYear => {
            let caps = DATE_LONG_YEAR.captures(text)?;
            build_date(&caps, caps[3].parse().ok()?)
        }
    }
}

fn build_date(caps: &Captures<'_>, year: i32) -> Option<NaiveDate> {
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

// POSIX pivot: 69-99 are 1900s, 00-68 are 2000s.
fn expand_year(year: i32) -> i32 {
    if year >= 69 { 1900 + year } else { 2000 + year }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_year() {
        assert_eq!(
            parse_date("17.12.2025", DateFormat::LongYear),
            NaiveDate::from_ymd_opt(2025, 12, 17)
        );
        assert_eq!(parse_date("17.12.25", DateFormat::LongYear), None);
    }

    #[test]
    fn test_parse_short_year() {
        assert_eq!(
            parse_date("17.12.25", DateFormat::ShortYear),
            NaiveDate::from_ymd_opt(2025, 12, 17)
        );
        assert_eq!(
            parse_date(" 01.02.99 ", DateFormat::ShortYear),
            NaiveDate::from_ymd_opt(1999, 2, 1)
        );
        assert_eq!(parse_date("17.12.2025", DateFormat::ShortYear), None);
    }

    #[test]
    fn test_invalid_dates_fail() {
        assert_eq!(parse_date("31.13.2025", DateFormat::LongYear), None);
        assert_eq!(parse_date("31.13.2025", DateFormat::ShortYear), None);
        assert_eq!(parse_date("30.02.24", DateFormat::ShortYear), None);
        assert_eq!(parse_date("Итого", DateFormat::LongYear), None);
    }
}
