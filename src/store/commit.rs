//! The edit-and-detect-change protocol for creating notes and versions.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

use super::{NoteStore, PendingNote, StoreError};
use crate::domain::{Note, VersionToken};
use crate::infra::ContentHash;
use crate::infra::fs::{self, FsError};

/// Errors from a create or edit cycle.
#[derive(Debug, Error)]
pub enum CommitError {
    #[error("invalid editor command '{command}': {reason}")]
    InvalidCommand { command: String, reason: String },

    #[error("failed to launch editor '{program}'")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("editor '{program}' exited with {status}")]
    EditorFailed { program: String, status: ExitStatus },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Fs(#[from] FsError),
}

/// Opens a file for the user and returns once they are done with it.
pub trait Editor {
    fn edit(&self, path: &Path) -> Result<(), CommitError>;
}

/// An [`Editor`] that runs an external command with the file path appended.
///
/// The command inherits stdin and stdout so the user interacts with it
/// directly.
#[derive(Debug, Clone)]
pub struct CommandEditor {
    program: String,
    args: Vec<String>,
}

impl CommandEditor {
    /// Splits a command line such as `code --wait` into program and arguments.
    pub fn from_command_line(command: &str) -> Result<Self, CommitError> {
        let invalid = |reason: String| CommitError::InvalidCommand {
            command: command.to_string(),
            reason,
        };
        let mut words = shell_words::split(command).map_err(|e| invalid(e.to_string()))?;
        if words.is_empty() {
            return Err(invalid("command is empty".to_string()));
        }
        let program = words.remove(0);
        Ok(Self {
            program,
            args: words,
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Editor for CommandEditor {
    fn edit(&self, path: &Path) -> Result<(), CommitError> {
        debug!("running {} {:?} {}", self.program, self.args, path.display());
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .status()
            .map_err(|source| CommitError::Launch {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(CommitError::EditorFailed {
                program: self.program.clone(),
                status,
            });
        }
        Ok(())
    }
}

/// Outcome of editing an existing note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The content changed and was stored as this new version.
    Committed(VersionToken),
    /// The content was not changed; nothing was written.
    Unchanged,
}

/// Outcome of creating a note.
#[derive(Debug)]
pub enum CreateOutcome {
    Created(Note),
    /// The scratch file was never modified, so no note was created.
    Abandoned,
}

/// Removes a scratch file when dropped, whatever happened in between.
struct ScratchGuard(PathBuf);

impl Drop for ScratchGuard {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.0) {
            Ok(()) => debug!("removed scratch file {}", self.0.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("could not remove scratch file {}: {}", self.0.display(), e),
        }
    }
}

/// Runs an editor on staged content and commits the result if it changed.
pub struct VersionCommitter<'a, E: Editor> {
    store: &'a NoteStore,
    editor: &'a E,
}

impl<'a, E: Editor> VersionCommitter<'a, E> {
    pub fn new(store: &'a NoteStore, editor: &'a E) -> Self {
        Self { store, editor }
    }

    /// Opens a staged note in the editor and materializes it if the scratch
    /// file's modification time changed.
    ///
    /// The creation time and first version token are taken from the scratch
    /// file's modification time after editing.
    pub fn commit_new(&self, pending: PendingNote) -> Result<CreateOutcome, CommitError> {
        let guard = ScratchGuard(pending.scratch.clone());
        let scratch = guard.0.as_path();

        let before = fs::modified_time(scratch)?;
        self.editor.edit(scratch)?;
        let after = fs::modified_time(scratch)?;

        if after == before {
            debug!("scratch file for {} untouched", pending.id.short());
            return Ok(CreateOutcome::Abandoned);
        }

        let created: DateTime<Utc> = after.into();
        let version = VersionToken::from_datetime(created);
        let mut note = Note::new(pending.id, pending.title, created).map_err(StoreError::from)?;
        note.add_tags(&pending.tags);
        note.push_initial_version(version.clone());

        fs::ensure_dir(&self.store.note_dir(note.id()))?;
        fs::move_file(scratch, &self.store.version_path(note.id(), &version))?;
        self.store.save(&note)?;

        info!("created note {} at version {}", note.short_id(), version);
        Ok(CreateOutcome::Created(note))
    }

    /// Stages `version` (or the latest version) in a scratch file, opens it in
    /// the editor and commits a new version if the content hash changed.
    ///
    /// On any error the note is left as it was.
    pub fn edit(
        &self,
        note: &mut Note,
        version: Option<&VersionToken>,
    ) -> Result<CommitOutcome, CommitError> {
        let content = self.store.content_bytes(note, version)?;

        let guard = ScratchGuard(self.store.scratch_path(note.id()));
        let scratch = guard.0.as_path();
        std::fs::write(scratch, &content).map_err(|e| FsError::from_io(scratch, e))?;
        debug!("staged {} at {}", note.short_id(), scratch.display());

        let before = ContentHash::compute(&content);
        self.editor.edit(scratch)?;
        let after = ContentHash::compute_file(scratch).map_err(|e| FsError::from_io(scratch, e))?;

        if before == after {
            debug!("content of {} unchanged", note.short_id());
            return Ok(CommitOutcome::Unchanged);
        }

        let modified: DateTime<Utc> = fs::modified_time(scratch)?.into();
        let token = VersionToken::after(note.latest_version(), modified);

        fs::move_file(scratch, &self.store.version_path(note.id(), &token))?;

        let mut updated = note.clone();
        updated.push_version(token.clone(), Utc::now());
        self.store.save(&updated)?;
        *note = updated;

        info!("committed version {} of note {}", token, note.short_id());
        Ok(CommitOutcome::Committed(token))
    }
}
