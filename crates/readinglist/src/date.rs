use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;
use thiserror::Error;

/// The format dates are displayed in.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The date given to entries that don't have one: January 1st of year 0, UTC.
pub static ZERO_DATE: Lazy<DateTime<Utc>> = Lazy::new(|| {
    let midnight = NaiveDate::from_ymd_opt(0, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("year 0 should be representable");

    Utc.from_utc_datetime(&midnight)
});

#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid date '{text}': expected an RFC 3339 timestamp or YYYY-MM-DD")]
pub struct ParseDateError {
    pub text: String,
}

/// Parses either an RFC 3339 timestamp or a plain `YYYY-MM-DD` date.
///
/// Plain dates are taken to be midnight UTC.
pub fn parse_date(text: &str) -> Result<DateTime<Utc>, ParseDateError> {
    let invalid = || ParseDateError {
        text: text.to_owned(),
    };

    if text.contains('T') {
        DateTime::parse_from_rfc3339(text)
            .map(|date| date.with_timezone(&Utc))
            .map_err(|_| invalid())
    } else {
        let midnight = NaiveDate::parse_from_str(text, DATE_FORMAT)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .ok_or_else(invalid)?;

        Ok(Utc.from_utc_datetime(&midnight))
    }
}

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_plain_date() {
        let date = parse_date("2023-01-05").unwrap();

        assert_eq!(date.to_rfc3339(), "2023-01-05T00:00:00+00:00");
    }

    #[test]
    fn test_parse_rfc3339_is_converted_to_utc() {
        let date = parse_date("2023-02-01T01:30:00+02:00").unwrap();

        assert_eq!(date.to_rfc3339(), "2023-01-31T23:30:00+00:00");
    }

    #[test]
    fn test_parse_invalid_date() {
        assert_eq!(
            parse_date("05/01/2023"),
            Err(ParseDateError {
                text: "05/01/2023".to_string()
            })
        );
        assert!(parse_date("2023-13-01").is_err());
        assert!(parse_date("2023-01-05Tnoon").is_err());
    }

    #[test]
    fn test_format_date() {
        let date = parse_date("2023-02-10T18:00:00Z").unwrap();

        assert_eq!(format_date(&date), "2023-02-10");
    }

    #[test]
    fn test_zero_date() {
        assert_eq!(ZERO_DATE.year(), 0);
        assert_eq!(ZERO_DATE.month(), 1);
        assert_eq!(ZERO_DATE.day(), 1);
        assert_eq!(format_date(&ZERO_DATE), "0000-01-01");
    }
}
