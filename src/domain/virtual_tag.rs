//! Derived tags computed from a note's timestamps and state.

use chrono::{DateTime, Datelike, TimeZone};
use std::fmt;

use crate::domain::Note;

/// A tag that is never stored but derived whenever a note is loaded.
///
/// Date-based tags are relative to "now" in the caller's time zone, which is
/// why they are recomputed on every load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VirtualTag {
    /// Created in the current calendar year.
    Year,
    /// Created in the current calendar month.
    Month,
    /// Created in the current ISO week.
    Week,
    /// Created today.
    Today,
    /// Created yesterday.
    Yesterday,
    /// Soft-deleted.
    Deleted,
    /// Has at least one edit after creation.
    Modified,
    /// Has at least one explicit tag.
    Tagged,
    /// Has at least one attachment.
    File,
}

impl VirtualTag {
    pub const ALL: [VirtualTag; 9] = [
        VirtualTag::Year,
        VirtualTag::Month,
        VirtualTag::Week,
        VirtualTag::Today,
        VirtualTag::Yesterday,
        VirtualTag::Deleted,
        VirtualTag::Modified,
        VirtualTag::Tagged,
        VirtualTag::File,
    ];

    /// Returns the tag name as matched by filter terms, e.g. `TODAY`.
    pub fn as_str(&self) -> &'static str {
        match self {
            VirtualTag::Year => "YEAR",
            VirtualTag::Month => "MONTH",
            VirtualTag::Week => "WEEK",
            VirtualTag::Today => "TODAY",
            VirtualTag::Yesterday => "YESTERDAY",
            VirtualTag::Deleted => "DELETED",
            VirtualTag::Modified => "MODIFIED",
            VirtualTag::Tagged => "TAGGED",
            VirtualTag::File => "FILE",
        }
    }

    /// Derives the virtual tags of `note` as seen at `now`.
    ///
    /// Calendar comparisons happen in `now`'s time zone.
    pub fn derive<Tz: TimeZone>(note: &Note, now: &DateTime<Tz>) -> Vec<VirtualTag> {
        let today = now.date_naive();
        let created = note.created().with_timezone(&now.timezone()).date_naive();

        let mut tags = Vec::new();
        if created.year() == today.year() {
            tags.push(VirtualTag::Year);
            if created.month() == today.month() {
                tags.push(VirtualTag::Month);
            }
        }
        if created.iso_week() == today.iso_week() {
            tags.push(VirtualTag::Week);
        }
        if created == today {
            tags.push(VirtualTag::Today);
        }
        if created.succ_opt() == Some(today) {
            tags.push(VirtualTag::Yesterday);
        }
        if note.is_deleted() {
            tags.push(VirtualTag::Deleted);
        }
        if !note.modified().is_empty() {
            tags.push(VirtualTag::Modified);
        }
        if !note.tags().is_empty() {
            tags.push(VirtualTag::Tagged);
        }
        if !note.attachments().is_empty() {
            tags.push(VirtualTag::File);
        }
        tags
    }
}

impl fmt::Display for VirtualTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
