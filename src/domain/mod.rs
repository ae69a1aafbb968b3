//! Core types: Note, NoteId (UUID), Tag, VersionToken, VirtualTag, NoteFilter

mod attachment;
mod filter;
mod note;
mod note_id;
mod tag;
mod version;
mod virtual_tag;

pub use attachment::Attachment;
pub use filter::NoteFilter;
pub use note::{Note, ParseNoteError};
pub use note_id::{ABBREVIATION_LEN, NoteId, ParseNoteIdError};
pub use tag::{ParseTagError, Tag};
pub use version::{ParseVersionError, VERSION_FORMAT, VersionToken};
pub use virtual_tag::VirtualTag;
