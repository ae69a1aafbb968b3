//! Note metadata record: identity, tags, alias, versions and timestamps.

use crate::domain::{Attachment, NoteId, Tag, VersionToken, VirtualTag};
use crate::infra::ContentHash;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of error that occurred when constructing a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseNoteErrorKind {
    EmptyTitle,
}

/// Error returned when constructing an invalid note.
#[derive(Debug, Clone)]
pub struct ParseNoteError {
    kind: ParseNoteErrorKind,
}

impl fmt::Display for ParseNoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ParseNoteErrorKind::EmptyTitle => write!(f, "invalid note: title cannot be empty"),
        }
    }
}

impl std::error::Error for ParseNoteError {}

/// A note's persisted metadata.
///
/// Content lives in one file per version next to the metadata record; this
/// struct only carries the list of version tokens. Virtual tags are derived
/// from the timestamps whenever the note is loaded and are never written.
///
/// # Examples
///
/// ```
/// use notemanager::domain::{Note, NoteId};
/// use chrono::Utc;
///
/// let note = Note::new(NoteId::new(), "Exam Deadline", Utc::now()).unwrap();
/// assert_eq!(note.title(), "Exam Deadline");
/// assert!(note.versions().is_empty());
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct Note {
    id: NoteId,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alias: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<Attachment>,
    #[serde(default)]
    versions: Vec<VersionToken>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tags: Vec<Tag>,
    created: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modified: Vec<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deleted: Option<DateTime<Utc>>,
    #[serde(skip)]
    virtual_tags: Vec<VirtualTag>,
}

impl Note {
    /// Creates a note with no versions, tags or attachments.
    ///
    /// # Errors
    ///
    /// Returns `ParseNoteError` if the title is empty or whitespace-only.
    pub fn new(
        id: NoteId,
        title: impl Into<String>,
        created: DateTime<Utc>,
    ) -> Result<Self, ParseNoteError> {
        Ok(Self {
            id,
            title: validate_title(title.into())?,
            created,
            alias: None,
            attachments: Vec::new(),
            versions: Vec::new(),
            tags: Vec::new(),
            modified: Vec::new(),
            deleted: None,
            virtual_tags: Vec::new(),
        })
    }

    pub fn id(&self) -> &NoteId {
        &self.id
    }

    /// Returns the abbreviated identifier used in user-facing messages.
    pub fn short_id(&self) -> String {
        self.id.short()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn versions(&self) -> &[VersionToken] {
        &self.versions
    }

    /// Returns the explicit tags, in insertion order.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Returns the modification history, oldest first.
    pub fn modified(&self) -> &[DateTime<Utc>] {
        &self.modified
    }

    pub fn deleted(&self) -> Option<DateTime<Utc>> {
        self.deleted
    }

    pub fn virtual_tags(&self) -> &[VirtualTag] {
        &self.virtual_tags
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted.is_some()
    }

    /// Returns the most recent version token, if the note has been materialized.
    pub fn latest_version(&self) -> Option<&VersionToken> {
        self.versions.last()
    }

    pub fn has_version(&self, version: &VersionToken) -> bool {
        self.versions.contains(version)
    }

    /// Returns the latest modification time, falling back to creation time.
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.modified.last().copied().unwrap_or(self.created)
    }

    /// Returns true if `name` is an explicit or a virtual tag of this note.
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.as_str() == name)
            || self.virtual_tags.iter().any(|v| v.as_str() == name)
    }

    /// Adds tags that are not already present and returns the ones added.
    pub fn add_tags(&mut self, tags: &[Tag]) -> Vec<Tag> {
        let mut added = Vec::new();
        for tag in tags {
            if !self.tags.contains(tag) {
                self.tags.push(tag.clone());
                added.push(tag.clone());
            }
        }
        added
    }

    /// Removes the given tags; tags the note does not carry are ignored.
    pub fn remove_tags(&mut self, tags: &[Tag]) {
        self.tags.retain(|t| !tags.contains(t));
    }

    /// Replaces the title.
    ///
    /// # Errors
    ///
    /// Returns `ParseNoteError` if the new title is empty.
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), ParseNoteError> {
        self.title = validate_title(title.into())?;
        Ok(())
    }

    pub fn set_alias(&mut self, alias: Option<String>) {
        self.alias = alias;
    }

    /// Sets deleted-at unless the note is already deleted. Returns true if
    /// the state changed.
    pub fn mark_deleted(&mut self, at: DateTime<Utc>) -> bool {
        if self.deleted.is_some() {
            return false;
        }
        self.deleted = Some(at);
        true
    }

    /// Clears deleted-at. Returns true if the state changed.
    pub fn clear_deleted(&mut self) -> bool {
        self.deleted.take().is_some()
    }

    /// Records the first committed version of a freshly created note.
    pub(crate) fn push_initial_version(&mut self, version: VersionToken) {
        self.versions.push(version);
    }

    /// Records an edit: appends the version and a modification timestamp.
    pub(crate) fn push_version(&mut self, version: VersionToken, modified_at: DateTime<Utc>) {
        self.versions.push(version);
        self.modified.push(modified_at);
    }

    pub(crate) fn push_attachment(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    /// Returns the existing attachment with the given content, if any.
    pub fn attachment_with_hash(&self, hash: &ContentHash) -> Option<&Attachment> {
        self.attachments.iter().find(|a| a.hash() == hash)
    }

    /// Recomputes virtual tags relative to `now`.
    pub fn refresh_virtual_tags<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) {
        self.virtual_tags = VirtualTag::derive(self, now);
    }
}

fn validate_title(title: String) -> Result<String, ParseNoteError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ParseNoteError {
            kind: ParseNoteErrorKind::EmptyTitle,
        });
    }
    Ok(trimmed.to_string())
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.title, self.id.short())
    }
}

impl fmt::Debug for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Note")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("alias", &self.alias)
            .field("tags", &self.tags)
            .field("versions", &self.versions)
            .field("created", &self.created)
            .field("modified", &self.modified)
            .field("deleted", &self.deleted)
            .field("attachments", &self.attachments)
            .finish()
    }
}
