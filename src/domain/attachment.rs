//! File attachments stored alongside a note.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::infra::ContentHash;

/// A file copied into a note's `attachments/` directory.
///
/// Attachments are immutable once recorded. The content hash is used to
/// detect the same file being attached twice, even under a different name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    filename: String,
    sha256: ContentHash,
    created: DateTime<Utc>,
}

impl Attachment {
    pub fn new(filename: impl Into<String>, sha256: ContentHash, created: DateTime<Utc>) -> Self {
        Self {
            filename: filename.into(),
            sha256,
            created,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn hash(&self) -> &ContentHash {
        &self.sha256
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }
}
