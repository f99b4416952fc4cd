//! Token normalization for statement amounts, dates and labels.

pub mod amounts;
pub mod dates;

pub use amounts::{parse_amount, parse_amount_checked};
pub use dates::{parse_date, DateFormat};

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("ПЕРЕВОД"), "Перевод");
        assert_eq!(capitalize("покупка"), "Покупка");
        assert_eq!(capitalize("sALARY"), "Salary");
        assert_eq!(capitalize(""), "");
    }
}
