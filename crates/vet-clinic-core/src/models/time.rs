//! Timestamp handling.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use crate::error::{ClinicError, ClinicResult};

/// Current time as an RFC 3339 string.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Normalize a caller-supplied timestamp to RFC 3339 UTC.
///
/// Accepts a full RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn normalize_timestamp(field: &str, value: &str) -> ClinicResult<String> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Millis, true));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight
                .and_utc()
                .to_rfc3339_opts(SecondsFormat::Millis, true));
        }
    }
    Err(ClinicError::Validation(format!(
        "{field} must be an RFC 3339 timestamp or a YYYY-MM-DD date, got {value:?}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_date_is_midnight_utc() {
        let ts = normalize_timestamp("date", "2025-08-09").unwrap();
        assert_eq!(ts, "2025-08-09T00:00:00.000Z");
    }

    #[test]
    fn test_offset_is_converted_to_utc() {
        let ts = normalize_timestamp("date", "2025-08-09T10:30:00+10:00").unwrap();
        assert_eq!(ts, "2025-08-09T00:30:00.000Z");
    }

    #[test]
    fn test_garbage_is_rejected() {
        let err = normalize_timestamp("date", "next tuesday").unwrap_err();
        assert!(matches!(err, ClinicError::Validation(_)));
    }
}
