//! Lenient date handling for answer-service payloads.

use chrono::NaiveDate;

/// Placeholder some answers use instead of omitting the date.
pub const UNDATED: &str = "Undated";

/// Parse a `YYYY-MM-DD` calendar date, or `None`.
///
/// Absent values, the `Undated` placeholder, non-padded or otherwise
/// malformed strings and impossible dates (e.g. `2024-02-30`) all map to
/// `None`. This never fails.
pub fn normalize_date(value: Option<&str>) -> Option<NaiveDate> {
    let value = value?.trim();
    if value.is_empty() || value == UNDATED {
        return None;
    }
    if value.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
