//! UUID-based note identifier with short-form abbreviation and serde support.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use uuid::Uuid;

/// Length of the abbreviated identifier shown to users.
pub const ABBREVIATION_LEN: usize = 8;

/// Length of a hyphenated UUID string.
const HYPHENATED_LEN: usize = 36;

/// A unique identifier for notes based on a random (v4) UUID.
///
/// The canonical text form is the lowercase hyphenated UUID, which is also
/// the name of the note's directory on disk.
///
/// # Examples
///
/// ```
/// use notemanager::domain::NoteId;
///
/// let id = NoteId::new();
/// assert_eq!(id.to_string().len(), 36);
/// assert_eq!(id.short().len(), 8);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteId(Uuid);

impl NoteId {
    /// Creates a fresh random NoteId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the 8-character abbreviation of the identifier.
    ///
    /// This is the form used in confirmations and listings, e.g. `1cf77aeb`.
    pub fn short(&self) -> String {
        self.to_string()[..ABBREVIATION_LEN].to_string()
    }

    /// Returns true if `s` has the shape of an abbreviated identifier:
    /// exactly eight lowercase hex characters.
    pub fn is_abbreviation(s: &str) -> bool {
        s.len() == ABBREVIATION_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    /// Returns true if `s` parses as a full identifier.
    pub fn is_identifier(s: &str) -> bool {
        s.parse::<NoteId>().is_ok()
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for NoteId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl fmt::Debug for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NoteId(\"{}\")", self.0.hyphenated())
    }
}

/// Error returned when parsing an invalid identifier string.
#[derive(Debug, Clone)]
pub struct ParseNoteIdError {
    value: String,
    reason: String,
}

impl ParseNoteIdError {
    /// Returns the invalid value that caused this error.
    pub fn invalid_value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ParseNoteIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid note id '{}': {}", self.value, self.reason)
    }
}

impl std::error::Error for ParseNoteIdError {}

impl FromStr for NoteId {
    type Err = ParseNoteIdError;

    /// Parses the hyphenated 36-character form only. Other UUID spellings
    /// (simple, braced, urn) are rejected so that directory names stay canonical.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != HYPHENATED_LEN {
            return Err(ParseNoteIdError {
                value: s.to_string(),
                reason: format!("expected {} characters, got {}", HYPHENATED_LEN, s.len()),
            });
        }

        Uuid::parse_str(s)
            .map(NoteId)
            .map_err(|e| ParseNoteIdError {
                value: s.to_string(),
                reason: e.to_string(),
            })
    }
}

impl Serialize for NoteId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for NoteId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
