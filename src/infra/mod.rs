//! File I/O, content hashing, metadata codec, templates

mod content_hash;
pub mod fs;
mod metadata;
mod template;

pub use content_hash::{ContentHash, ContentHashError};
pub use fs::FsError;
pub use metadata::{MetadataError, decode, encode, read_metadata, write_metadata};
pub use template::{DEFAULT_TEMPLATE, TemplateValues, render_template};
