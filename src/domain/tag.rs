//! Tag type for categorizing notes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A flat label attached to a note.
///
/// Tags are case-sensitive and must consist of ASCII letters and digits only.
/// Upper-case names such as `TODAY` are also used by virtual tags, so a filter
/// term `+TODAY` matches either kind.
///
/// # Examples
///
/// ```
/// use notemanager::domain::Tag;
///
/// let tag = Tag::new("exam").unwrap();
/// assert_eq!(tag.as_str(), "exam");
/// assert!(Tag::new("needs review").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(String);

/// Error returned when parsing an invalid tag.
#[derive(Debug, Clone)]
pub struct ParseTagError(String);

impl fmt::Display for ParseTagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseTagError {}

impl Tag {
    /// Creates a new Tag from a string.
    ///
    /// # Errors
    ///
    /// Returns `ParseTagError` if the tag is empty or contains anything other
    /// than ASCII alphanumeric characters.
    pub fn new(s: &str) -> Result<Self, ParseTagError> {
        if s.is_empty() {
            return Err(ParseTagError("tag cannot be empty".to_string()));
        }

        if !s.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ParseTagError(format!(
                "invalid tag '{}': tags must contain only letters and digits",
                s
            )));
        }

        Ok(Self(s.to_string()))
    }

    /// Returns the tag value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag(\"{}\")", self.0)
    }
}

impl FromStr for Tag {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Tag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Tag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
