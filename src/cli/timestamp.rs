//! Timestamp grammar for `created.*:` and `modified.*:` filter terms.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use thiserror::Error;

/// Accepted date shapes (`d` stands for any digit) and their chrono formats.
const DATE_FORMATS: &[(&str, &str)] = &[
    ("dddddddd", "%Y%m%d"),
    ("dddd/dd/dd", "%Y/%m/%d"),
    ("dddd-dd-dd", "%Y-%m-%d"),
];

/// Accepted time shapes and their chrono formats.
const TIME_FORMATS: &[(&str, &str)] = &[
    ("dddddd", "%H%M%S"),
    ("dddd", "%H%M"),
    ("dd:dd:dd", "%H:%M:%S"),
    ("dd:dd", "%H:%M"),
];

/// Errors parsing a filter timestamp. Every variant names the input.
#[derive(Debug, Error)]
pub enum TimestampError {
    #[error("invalid timestamp '{0}': expected DATE or 'DATE TIME'")]
    Shape(String),

    #[error("invalid date '{part}' in '{input}': expected YYYYMMDD, YYYY/MM/DD or YYYY-MM-DD")]
    Date { input: String, part: String },

    #[error("invalid time '{part}' in '{input}': expected HHMMSS, HHMM, HH:MM:SS or HH:MM")]
    Time { input: String, part: String },

    #[error("timestamp '{0}' does not exist in the local time zone")]
    Nonexistent(String),
}

/// Parses a timestamp in the local time zone.
///
/// # Examples
///
/// ```
/// use notemanager::cli::timestamp::parse_timestamp;
///
/// assert!(parse_timestamp("2025-01-15").is_ok());
/// assert!(parse_timestamp("20250115 09:30").is_ok());
/// assert!(parse_timestamp("15.01.2025").is_err());
/// ```
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, TimestampError> {
    parse_timestamp_in(input, &Local)
}

/// Parses a timestamp in the given time zone. Missing time fields are zero.
pub fn parse_timestamp_in<Tz: TimeZone>(
    input: &str,
    tz: &Tz,
) -> Result<DateTime<Utc>, TimestampError> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    let (date_part, time_part) = match parts.as_slice() {
        [date] => (*date, None),
        [date, time] => (*date, Some(*time)),
        _ => return Err(TimestampError::Shape(input.to_string())),
    };

    let date = parse_with(date_part, DATE_FORMATS, |s, f| NaiveDate::parse_from_str(s, f).ok())
        .ok_or_else(|| TimestampError::Date {
            input: input.to_string(),
            part: date_part.to_string(),
        })?;

    let time = match time_part {
        None => NaiveTime::MIN,
        Some(part) => parse_with(part, TIME_FORMATS, |s, f| NaiveTime::parse_from_str(s, f).ok())
            .ok_or_else(|| TimestampError::Time {
                input: input.to_string(),
                part: part.to_string(),
            })?,
    };

    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| TimestampError::Nonexistent(input.to_string()))
}

/// Picks the format whose shape matches `part` exactly, then parses with it.
fn parse_with<T>(
    part: &str,
    formats: &[(&str, &str)],
    parse: impl Fn(&str, &str) -> Option<T>,
) -> Option<T> {
    let shape: String = part
        .chars()
        .map(|c| if c.is_ascii_digit() { 'd' } else { c })
        .collect();
    formats
        .iter()
        .find(|(candidate, _)| *candidate == shape)
        .and_then(|(_, format)| parse(part, *format))
}
