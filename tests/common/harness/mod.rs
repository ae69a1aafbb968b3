//! Test harness for CLI integration tests.
//!
//! Provides isolated test environments, seeded notes,
//! and CLI assertion helpers using `assert_cmd`.

mod command;
mod env;
mod note;

// Re-export main types for external use
#[allow(unused_imports)]
pub use command::{APPENDING_EDITOR, NoteCommand, VIEWING_EDITOR};
#[allow(unused_imports)]
pub use env::TestEnv;
#[allow(unused_imports)]
pub use note::TestNote;
