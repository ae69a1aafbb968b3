//! Structured note filter and the predicate that evaluates it.

use chrono::{DateTime, Utc};

use crate::domain::{Note, NoteId};

/// A predicate over notes built from command-line filter terms.
///
/// Tag lists hold raw names rather than [`crate::domain::Tag`] values because
/// they also match virtual tags. An explicit note set is mutually exclusive
/// with every other selection field; the filter parser enforces that.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    pub tags_include: Vec<String>,
    pub tags_exclude: Vec<String>,
    pub notes: Vec<NoteId>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    pub modified_after: Option<DateTime<Utc>>,
    pub modified_before: Option<DateTime<Utc>>,
    pub include_deleted: bool,
}

impl NoteFilter {
    /// Returns true if any attribute predicate (tags or date ranges) is set.
    pub fn has_attribute_terms(&self) -> bool {
        !self.tags_include.is_empty()
            || !self.tags_exclude.is_empty()
            || self.created_after.is_some()
            || self.created_before.is_some()
            || self.modified_after.is_some()
            || self.modified_before.is_some()
    }

    /// Returns true if the filter selects notes by anything at all.
    ///
    /// `include_deleted` alone does not count: it widens a selection rather
    /// than narrowing one.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty() && !self.has_attribute_terms()
    }

    /// Evaluates the filter against one note.
    ///
    /// Predicates are checked in a fixed order and the first failure
    /// short-circuits. Tag terms see the union of explicit and virtual tags,
    /// so virtual tags must have been derived for `note` beforehand.
    pub fn matches(&self, note: &Note) -> bool {
        if !self.include_deleted && note.is_deleted() {
            return false;
        }

        if !self.tags_include.iter().all(|t| note.has_tag(t)) {
            return false;
        }

        if self.tags_exclude.iter().any(|t| note.has_tag(t)) {
            return false;
        }

        if !self.notes.is_empty() && !self.notes.contains(note.id()) {
            return false;
        }

        let created = note.created();
        if self.created_before.is_some_and(|before| created > before) {
            return false;
        }
        if self.created_after.is_some_and(|after| created < after) {
            return false;
        }

        let modified = note.last_modified();
        if self.modified_before.is_some_and(|before| modified > before) {
            return false;
        }
        if self.modified_after.is_some_and(|after| modified < after) {
            return false;
        }

        true
    }
}
