//! Utility functions for number formatting.
//!
//! This module provides helpers used by the reply formatters to display the
//! statistics returned by the stats provider.

/// Formats a count with comma thousands separators.
///
/// Absent values are displayed as `0` so a missing field never leaks into the
/// chat as an empty or undefined value.
///
/// # Arguments
///
/// * `value` - The count to format, `None` when the provider did not send it
///
/// # Examples
///
/// ```
/// # use covibot::utils::format_count;
/// assert_eq!(format_count(Some(125000000)), "125,000,000");
/// assert_eq!(format_count(None), "0");
/// ```
pub fn format_count(value: Option<i64>) -> String {
    let value = value.unwrap_or(0);
    let digits = value.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count_zero() {
        assert_eq!(format_count(Some(0)), "0");
    }

    #[test]
    fn test_format_count_absent() {
        assert_eq!(format_count(None), "0");
    }

    #[test]
    fn test_format_count_below_thousand() {
        assert_eq!(format_count(Some(7)), "7");
        assert_eq!(format_count(Some(999)), "999");
    }

    #[test]
    fn test_format_count_exact_groups() {
        assert_eq!(format_count(Some(1000)), "1,000");
        assert_eq!(format_count(Some(125_000_000)), "125,000,000");
    }

    #[test]
    fn test_format_count_partial_leading_group() {
        assert_eq!(format_count(Some(12_345)), "12,345");
        assert_eq!(format_count(Some(1_234_567)), "1,234,567");
    }

    #[test]
    fn test_format_count_negative() {
        assert_eq!(format_count(Some(-1_234)), "-1,234");
    }

    #[test]
    fn test_format_count_max() {
        assert_eq!(format_count(Some(i64::MAX)), "9,223,372,036,854,775,807");
    }

    #[test]
    fn test_format_count_min() {
        assert_eq!(format_count(Some(i64::MIN)), "-9,223,372,036,854,775,808");
    }
}
