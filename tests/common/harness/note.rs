//! Builder for test notes with sensible defaults.

use chrono::{DateTime, Utc};
use notemanager::domain::{Note, NoteId, Tag, VERSION_FORMAT};
use notemanager::infra::decode;

/// Builder for notes seeded directly into a data directory.
///
/// Automatically generates an ID and timestamps, with a fluent API
/// for setting optional fields. The note gets a single version holding
/// the body.
#[derive(Debug)]
pub struct TestNote {
    id: NoteId,
    title: String,
    created: DateTime<Utc>,
    deleted: Option<DateTime<Utc>>,
    tags: Vec<Tag>,
    body: String,
}

impl TestNote {
    /// Creates a new test note with the given title, created now.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: NoteId::new(),
            title: title.into(),
            created: Utc::now(),
            deleted: None,
            tags: Vec::new(),
            body: String::new(),
        }
    }

    /// Sets an explicit ID for the note.
    pub fn id(mut self, id: &str) -> Self {
        self.id = id.parse().expect("Invalid NoteId");
        self
    }

    /// Adds a tag to the note.
    pub fn tag(mut self, tag: impl AsRef<str>) -> Self {
        self.tags.push(Tag::new(tag.as_ref()).expect("Invalid tag"));
        self
    }

    /// Sets the creation time from an RFC 3339 string.
    pub fn created(mut self, rfc3339: &str) -> Self {
        self.created = DateTime::parse_from_rfc3339(rfc3339)
            .expect("Invalid timestamp")
            .with_timezone(&Utc);
        self
    }

    /// Marks the note as deleted at its creation time.
    pub fn deleted(mut self) -> Self {
        self.deleted = Some(self.created);
        self
    }

    /// Sets the body content (builder method).
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns the abbreviated ID.
    pub fn short_id(&self) -> String {
        self.id.short()
    }

    /// Returns the body content.
    pub fn get_body(&self) -> &str {
        &self.body
    }

    /// Returns the title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the ID.
    pub fn note_id(&self) -> &NoteId {
        &self.id
    }

    /// Returns the token of the single version.
    pub fn version(&self) -> String {
        self.created.format(VERSION_FORMAT).to_string()
    }

    /// Renders the metadata record as it is stored on disk.
    pub fn to_yaml(&self) -> String {
        let mut yaml = format!(
            "id: {}\ntitle: '{}'\nversions:\n- '{}'\ncreated: {}\n",
            self.id,
            self.title.replace('\'', "''"),
            self.version(),
            self.created.to_rfc3339(),
        );
        if !self.tags.is_empty() {
            yaml.push_str("tags:\n");
            for tag in &self.tags {
                yaml.push_str(&format!("- {}\n", tag));
            }
        }
        if let Some(deleted) = self.deleted {
            yaml.push_str(&format!("deleted: {}\n", deleted.to_rfc3339()));
        }
        yaml
    }

    /// Converts this TestNote to a domain Note.
    pub fn to_note(&self) -> Note {
        decode(&self.to_yaml()).expect("TestNote should always produce valid Note")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===========================================
    // TestNote Builder
    // ===========================================

    #[test]
    fn test_note_new_with_title() {
        let note = TestNote::new("My Test Note");
        assert_eq!(note.title(), "My Test Note");
    }

    #[test]
    fn test_note_builder_fluent() {
        let note = TestNote::new("Exam Deadline")
            .id("1cf77aeb-fcb2-44ad-87d6-69717dba1d0c")
            .tag("important")
            .tag("exam")
            .created("2025-01-15T09:30:00Z")
            .body("Study chapter 3\n");

        let domain_note = note.to_note();
        assert_eq!(domain_note.title(), "Exam Deadline");
        assert_eq!(domain_note.short_id(), "1cf77aeb");
        assert_eq!(domain_note.tags().len(), 2);
        assert_eq!(domain_note.versions()[0].as_str(), "20250115-093000");
        assert!(!domain_note.is_deleted());
    }

    #[test]
    fn test_note_title_with_quote() {
        let note = TestNote::new("Don't forget");
        assert_eq!(note.to_note().title(), "Don't forget");
    }

    #[test]
    fn test_note_deleted() {
        let note = TestNote::new("Gone").deleted();
        assert!(note.to_note().is_deleted());
    }
}
