//! Asset tag format.
//!
//! Tags look like `AST-202301-000042`: purchase year and month followed by a
//! store-wide sequence number. Uniqueness comes from the sequence, which the
//! registry owns.

use chrono::NaiveDate;

/// Prefix shared by every generated tag.
pub const TAG_PREFIX: &str = "AST";

/// Formats a tag from a purchase date and sequence number.
#[must_use]
pub fn format_tag(purchase_date: NaiveDate, sequence: u64) -> String {
    format!(
        "{TAG_PREFIX}-{}-{sequence:06}",
        purchase_date.format("%Y%m")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_tag() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 15).unwrap();
        assert_eq!(format_tag(date, 42), "AST-202301-000042");
    }

    #[test]
    fn test_format_tag_wide_sequence() {
        let date = NaiveDate::from_ymd_opt(2024, 11, 2).unwrap();
        assert_eq!(format_tag(date, 1_234_567), "AST-202411-1234567");
    }
}
