//! Format - Formatting Utilities

use chrono::{DateTime, Local, NaiveDate};

/// Format a local datetime for display
pub fn format_local_datetime(dt: &DateTime<Local>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format a date the way the data endpoints expect it
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Format an integer with thousand separators
pub fn format_number(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        result.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Round a volume and format it with thousand separators
pub fn format_rounded(value: f64) -> String {
    format_number(value.round() as i64)
}

/// Format a value with fixed decimals and thousand separators
pub fn format_decimal(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };
    let int_value: i64 = int_part.parse().unwrap_or(0);
    let sign = if value < 0.0 && fixed.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{sign}{}.{frac}", format_number(int_value)),
        None => format!("{sign}{}", format_number(int_value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(300), "300");
        assert_eq!(format_number(1234), "1,234");
        assert_eq!(format_number(-1234567), "-1,234,567");
    }

    #[test]
    fn test_format_rounded_and_decimal() {
        assert_eq!(format_rounded(299.6), "300");
        assert_eq!(format_decimal(1234.5, 2), "1,234.50");
        assert_eq!(format_decimal(-0.001, 2), "0.00");
    }
}
