//! Timestamp utilities

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::{Error, Result};

/// Parse an HTML date input (`YYYY-MM-DD`) as UTC midnight
pub fn parse_date_input(value: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| Error::InvalidInput(format!("Invalid date '{}': {}", value, e)))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| Error::InvalidInput(format!("Invalid date '{}'", value)))?;
    Ok(Utc.from_utc_datetime(&midnight))
}

/// Value for an HTML date input (`YYYY-MM-DD`, UTC)
pub fn to_date_input(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}

/// Long US form, e.g. `March 5, 2025`
pub fn to_display_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%B %-d, %Y").to_string()
}

/// Unix epoch milliseconds back to a timestamp
pub fn from_millis(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| Error::Internal(format!("Timestamp out of range: {}", millis)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_input_round_trip_is_utc_midnight() {
        let parsed = parse_date_input("2025-07-04").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2025-07-04T00:00:00+00:00");
        assert_eq!(to_date_input(parsed), "2025-07-04");
    }

    #[test]
    fn test_parse_date_input_rejects_garbage() {
        assert!(matches!(parse_date_input(""), Err(Error::InvalidInput(_))));
        assert!(matches!(parse_date_input("07/04/2025"), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_display_date_long_form() {
        let parsed = parse_date_input("2025-03-05").unwrap();
        assert_eq!(to_display_date(parsed), "March 5, 2025");
    }

    #[test]
    fn test_from_millis() {
        let ts = from_millis(1_700_000_000_000).unwrap();
        assert_eq!(ts.timestamp_millis(), 1_700_000_000_000);
    }
}
