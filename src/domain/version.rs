//! Version tokens: sortable, UTC-derived names for note content snapshots.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// chrono format of a version token, e.g. `20250131-235959`.
pub const VERSION_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Identifies one immutable content snapshot of a note.
///
/// The token is the UTC commit time in a fixed-width, zero-padded format, so
/// lexicographic order equals chronological order. The latest version of a
/// note is therefore always the last one after sorting, and the token doubles
/// as the content file's name inside the note directory.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VersionToken(String);

/// Error returned when a string is not a valid version token.
#[derive(Debug, Clone)]
pub struct ParseVersionError(String);

impl fmt::Display for ParseVersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid version '{}': expected YYYYMMDD-HHMMSS",
            self.0
        )
    }
}

impl std::error::Error for ParseVersionError {}

impl VersionToken {
    /// Creates a token from a point in time (sub-second precision is dropped).
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at.format(VERSION_FORMAT).to_string())
    }

    /// Returns the instant this token encodes.
    pub fn timestamp(&self) -> DateTime<Utc> {
        // The inner string is validated on construction.
        NaiveDateTime::parse_from_str(&self.0, VERSION_FORMAT)
            .map(|naive| naive.and_utc())
            .unwrap_or_default()
    }

    /// Returns the token for `at`, or one second after `latest` if `at` would
    /// not sort strictly after it.
    pub fn after(latest: Option<&VersionToken>, at: DateTime<Utc>) -> Self {
        let candidate = Self::from_datetime(at);
        match latest {
            Some(prev) if candidate <= *prev => {
                Self::from_datetime(prev.timestamp() + Duration::seconds(1))
            }
            _ => candidate,
        }
    }

    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VersionToken(\"{}\")", self.0)
    }
}

impl FromStr for VersionToken {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // chrono accepts unpadded fields; require the exact fixed width too.
        let well_formed = s.len() == 15
            && s.bytes()
                .enumerate()
                .all(|(i, b)| if i == 8 { b == b'-' } else { b.is_ascii_digit() });
        if !well_formed || NaiveDateTime::parse_from_str(s, VERSION_FORMAT).is_err() {
            return Err(ParseVersionError(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl Serialize for VersionToken {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for VersionToken {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn formats_fixed_width() {
        let token = VersionToken::from_datetime(utc(2025, 1, 31, 23, 59, 59));
        assert_eq!(token.as_str(), "20250131-235959");

        let token = VersionToken::from_datetime(utc(2025, 2, 3, 4, 5, 6));
        assert_eq!(token.as_str(), "20250203-040506");
    }

    #[test]
    fn converts_offsets_to_utc() {
        let local = chrono::FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 1, 1, 1, 0, 0)
            .unwrap();
        let token = VersionToken::from_datetime(local.with_timezone(&Utc));
        assert_eq!(token.as_str(), "20241231-230000");
    }

    #[test]
    fn lexicographic_order_is_chronological() {
        let times = [
            utc(2024, 12, 31, 23, 59, 59),
            utc(2025, 1, 1, 0, 0, 0),
            utc(2025, 1, 1, 0, 0, 1),
            utc(2025, 10, 2, 9, 0, 0),
        ];
        let mut tokens: Vec<String> = times
            .iter()
            .rev()
            .map(|t| VersionToken::from_datetime(*t).to_string())
            .collect();
        tokens.sort();
        let expected: Vec<String> = times
            .iter()
            .map(|t| VersionToken::from_datetime(*t).to_string())
            .collect();
        assert_eq!(tokens, expected);
    }

    #[test]
    fn timestamp_roundtrips() {
        let at = utc(2025, 6, 15, 12, 30, 45);
        assert_eq!(VersionToken::from_datetime(at).timestamp(), at);
    }

    #[test]
    fn after_keeps_later_candidate() {
        let prev = VersionToken::from_datetime(utc(2025, 1, 1, 0, 0, 0));
        let next = VersionToken::after(Some(&prev), utc(2025, 1, 1, 0, 0, 5));
        assert_eq!(next.as_str(), "20250101-000005");
    }

    #[test]
    fn after_bumps_same_second() {
        let prev = VersionToken::from_datetime(utc(2025, 1, 1, 0, 0, 0));
        let next = VersionToken::after(Some(&prev), utc(2025, 1, 1, 0, 0, 0));
        assert_eq!(next.as_str(), "20250101-000001");
        assert!(next > prev);
    }

    #[test]
    fn after_bumps_clock_skew() {
        let prev = VersionToken::from_datetime(utc(2025, 1, 1, 0, 0, 10));
        let next = VersionToken::after(Some(&prev), utc(2024, 12, 31, 0, 0, 0));
        assert_eq!(next.as_str(), "20250101-000011");
    }

    #[test]
    fn parse_accepts_valid_token() {
        let token: VersionToken = "20250131-235959".parse().unwrap();
        assert_eq!(token.to_string(), "20250131-235959");
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!("2025013-235959".parse::<VersionToken>().is_err());
        assert!("20250131235959".parse::<VersionToken>().is_err());
        assert!("20251331-235959".parse::<VersionToken>().is_err());
        assert!("20250131_235959".parse::<VersionToken>().is_err());
        assert!("data".parse::<VersionToken>().is_err());
    }
}
