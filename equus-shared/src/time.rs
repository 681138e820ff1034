use chrono::{DateTime, SecondsFormat, Utc};

/// Render an instant the way the document store expects it:
/// ISO-8601, UTC, millisecond precision, `Z` suffix.
pub fn to_iso_utc(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_iso_utc_format() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 4, 9, 30, 0).unwrap();
        assert_eq!(to_iso_utc(&instant), "2024-01-04T09:30:00.000Z");
    }
}
