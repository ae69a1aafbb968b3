//! On-disk note corpus: layout, lifecycle operations, aliases, version commits.
//!
//! ```text
//! <data_dir>/
//!   aliases                      alias -> note id table (YAML)
//!   templates/<name>             note templates
//!   tmp/<id>                     scratch files for create/edit
//!   notes/<id>/data              metadata record (YAML)
//!   notes/<id>/<version>         one content file per version
//!   notes/<id>/attachments/<f>   read-only attached files
//! ```

mod aliases;
mod commit;
mod resolve;


use chrono::{DateTime, Local, TimeZone, Utc};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::{Attachment, Note, NoteFilter, NoteId, ParseNoteError, Tag, VersionToken};
use crate::infra::fs::{self, FsError};
use crate::infra::{
    ContentHash, DEFAULT_TEMPLATE, MetadataError, TemplateValues, read_metadata,
    render_template, write_metadata,
};

pub use aliases::{AliasTable, RESERVED_ALIASES, validate_alias};
pub use commit::{
    CommandEditor, CommitError, CommitOutcome, CreateOutcome, Editor, VersionCommitter,
};

const NOTES_DIR: &str = "notes";
const TMP_DIR: &str = "tmp";
const TEMPLATES_DIR: &str = "templates";
const ALIASES_FILE: &str = "aliases";
const DATA_FILE: &str = "data";
const ATTACHMENTS_DIR: &str = "attachments";

/// Errors from note store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no such note: {0}")]
    NoteNotFound(String),

    #[error("ambiguous abbreviation '{prefix}': matches {count} notes")]
    AmbiguousAbbreviation { prefix: String, count: usize },

    #[error("invalid alias '{alias}': {reason}")]
    InvalidAlias { alias: String, reason: String },

    #[error("attachment '{filename}' already exists for note {note}; rename the file and retry")]
    AttachmentExists { filename: String, note: String },

    #[error("not a file: {0}")]
    InvalidAttachment(PathBuf),

    #[error("note {note} has no version '{version}'")]
    VersionNotFound { note: String, version: String },

    #[error("note {0} has no versions")]
    NoVersions(String),

    #[error("invalid alias table {path}")]
    InvalidAliasTable {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    InvalidNote(#[from] ParseNoteError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Fs(#[from] FsError),
}

/// Result of attaching a file to a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachOutcome {
    /// The file was copied in under this name.
    Attached { filename: String },
    /// The note already has an attachment with identical content.
    Duplicate { existing: String },
}

/// A note that has been staged for creation but not yet committed.
///
/// Nothing is written under `notes/` until the scratch file has been changed
/// by the editor; see [`VersionCommitter::commit_new`].
#[derive(Debug)]
pub struct PendingNote {
    id: NoteId,
    title: String,
    tags: Vec<Tag>,
    scratch: PathBuf,
}

impl PendingNote {
    pub fn id(&self) -> &NoteId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Path of the rendered scratch file the editor will open.
    pub fn scratch(&self) -> &Path {
        &self.scratch
    }
}

/// Handle to a data directory.
#[derive(Debug, Clone)]
pub struct NoteStore {
    root: PathBuf,
}

impl NoteStore {
    /// Opens the store rooted at `root`, creating the directory layout if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self { root: root.into() };
        for dir in [store.notes_dir(), store.tmp_dir(), store.templates_dir()] {
            fs::ensure_dir(&dir)?;
        }
        debug!("opened note store at {}", store.root.display());
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn notes_dir(&self) -> PathBuf {
        self.root.join(NOTES_DIR)
    }

    pub fn tmp_dir(&self) -> PathBuf {
        self.root.join(TMP_DIR)
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.root.join(TEMPLATES_DIR)
    }

    pub fn aliases_path(&self) -> PathBuf {
        self.root.join(ALIASES_FILE)
    }

    pub fn note_dir(&self, id: &NoteId) -> PathBuf {
        self.notes_dir().join(id.to_string())
    }

    pub fn data_path(&self, id: &NoteId) -> PathBuf {
        self.note_dir(id).join(DATA_FILE)
    }

    pub fn version_path(&self, id: &NoteId, version: &VersionToken) -> PathBuf {
        self.note_dir(id).join(version.as_str())
    }

    pub fn attachments_dir(&self, id: &NoteId) -> PathBuf {
        self.note_dir(id).join(ATTACHMENTS_DIR)
    }

    pub fn scratch_path(&self, id: &NoteId) -> PathBuf {
        self.tmp_dir().join(id.to_string())
    }

    pub fn template_path(&self, name: &str) -> PathBuf {
        self.templates_dir().join(name)
    }

    /// Returns true if a metadata record exists for `id`.
    pub fn exists(&self, id: &NoteId) -> bool {
        self.data_path(id).is_file()
    }

    // ===========================================
    // Loading
    // ===========================================

    /// Loads one note and derives its virtual tags relative to the local clock.
    pub fn load(&self, id: &NoteId) -> Result<Note, StoreError> {
        self.load_at(id, &Local::now())
    }

    /// Loads one note and derives its virtual tags relative to `now`.
    pub fn load_at<Tz: TimeZone>(&self, id: &NoteId, now: &DateTime<Tz>) -> Result<Note, StoreError> {
        let mut note = read_metadata(&self.data_path(id)).map_err(|e| match e {
            MetadataError::Fs(FsError::NotFound { .. }) => StoreError::NoteNotFound(id.to_string()),
            other => other.into(),
        })?;
        note.refresh_virtual_tags(now);
        Ok(note)
    }

    /// Persists a note's metadata record.
    pub fn save(&self, note: &Note) -> Result<(), StoreError> {
        fs::ensure_dir(&self.note_dir(note.id()))?;
        write_metadata(&self.data_path(note.id()), note)?;
        debug!("saved metadata for {}", note.short_id());
        Ok(())
    }

    /// Lists the identifiers of every note directory, sorted.
    ///
    /// Directories whose names are not note identifiers are ignored.
    pub fn ids(&self) -> Result<Vec<NoteId>, StoreError> {
        let mut ids = Vec::new();
        for dir in fs::list_subdirs(&self.notes_dir())? {
            let name = dir.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            match name.parse::<NoteId>() {
                Ok(id) => ids.push(id),
                Err(_) => debug!("ignoring {}", dir.display()),
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Loads every note, oldest first. Unreadable notes are skipped with a warning.
    pub fn notes(&self) -> Result<Vec<Note>, StoreError> {
        let now = Local::now();
        let mut notes = Vec::new();
        for id in self.ids()? {
            match self.load_at(&id, &now) {
                Ok(note) => notes.push(note),
                Err(e) => warn!("skipping note {}: {}", id, e),
            }
        }
        notes.sort_by(|a, b| a.created().cmp(&b.created()).then_with(|| a.id().cmp(b.id())));
        Ok(notes)
    }

    /// Loads the notes matching `filter`, oldest first.
    pub fn select(&self, filter: &NoteFilter) -> Result<Vec<Note>, StoreError> {
        let mut notes = self.notes()?;
        notes.retain(|note| filter.matches(note));
        debug!("filter selected {} notes", notes.len());
        Ok(notes)
    }

    /// Reads the content of `version`, or of the latest version when `None`.
    ///
    /// Bytes that are not valid UTF-8 are replaced with `U+FFFD`; use
    /// [`content_bytes`](Self::content_bytes) for the stored bytes.
    pub fn content(&self, note: &Note, version: Option<&VersionToken>) -> Result<String, StoreError> {
        let bytes = self.content_bytes(note, version)?;
        Ok(match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                debug!("note {} content is not valid UTF-8", note.short_id());
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        })
    }

    /// Reads the stored bytes of `version`, or of the latest version when `None`.
    pub fn content_bytes(
        &self,
        note: &Note,
        version: Option<&VersionToken>,
    ) -> Result<Vec<u8>, StoreError> {
        let version = match version {
            Some(v) if note.has_version(v) => v,
            Some(v) => {
                return Err(StoreError::VersionNotFound {
                    note: note.short_id(),
                    version: v.to_string(),
                });
            }
            None => note
                .latest_version()
                .ok_or_else(|| StoreError::NoVersions(note.short_id()))?,
        };
        let path = self.version_path(note.id(), version);
        std::fs::read(&path).map_err(|e| FsError::from_io(&path, e).into())
    }

    // ===========================================
    // Lifecycle
    // ===========================================

    /// Stages a new note: renders the named template into `tmp/<id>`.
    ///
    /// A missing template file yields empty content.
    pub fn create(&self, title: &str, tags: &[Tag], template: &str) -> Result<PendingNote, StoreError> {
        let created = Utc::now();
        let id = NoteId::new();
        // Validates the title before anything is written.
        let note = Note::new(id, title, created)?;

        let template_path = self.template_path(template);
        let source = match std::fs::read(&template_path) {
            Ok(source) => source,
            Err(e) => {
                debug!("template {} not loaded: {}", template_path.display(), e);
                DEFAULT_TEMPLATE.to_vec()
            }
        };

        let rendered = render_template(
            &source,
            &TemplateValues {
                id: &id,
                title: note.title(),
                tags,
                created: created.with_timezone(&Local).fixed_offset(),
            },
        );

        let scratch = self.scratch_path(&id);
        std::fs::write(&scratch, rendered).map_err(|e| FsError::from_io(&scratch, e))?;
        debug!("staged new note at {}", scratch.display());

        Ok(PendingNote {
            id,
            title: note.title().to_string(),
            tags: tags.to_vec(),
            scratch,
        })
    }

    /// Adds and removes tags, optionally retitles, then persists.
    pub fn modify(
        &self,
        note: &mut Note,
        add: &[Tag],
        remove: &[Tag],
        title: Option<&str>,
    ) -> Result<(), StoreError> {
        note.add_tags(add);
        note.remove_tags(remove);
        if let Some(title) = title {
            note.set_title(title)?;
        }
        self.save(note)?;
        info!("modified note {}", note.short_id());
        Ok(())
    }

    /// Soft-deletes a note. Returns false if it was already deleted.
    pub fn delete(&self, note: &mut Note) -> Result<bool, StoreError> {
        if !note.mark_deleted(Utc::now()) {
            return Ok(false);
        }
        self.save(note)?;
        info!("deleted note {}", note.short_id());
        Ok(true)
    }

    /// Clears a soft-delete. Returns false if the note was not deleted.
    pub fn undelete(&self, note: &mut Note) -> Result<bool, StoreError> {
        if !note.clear_deleted() {
            return Ok(false);
        }
        self.save(note)?;
        info!("undeleted note {}", note.short_id());
        Ok(true)
    }

    /// Copies `source` into the note's attachment directory.
    ///
    /// Content already attached under any name is skipped. An existing file
    /// with the same name is reported as [`StoreError::AttachmentExists`].
    pub fn attach_file(&self, note: &mut Note, source: &Path) -> Result<AttachOutcome, StoreError> {
        if !source.is_file() {
            return Err(StoreError::InvalidAttachment(source.to_path_buf()));
        }
        let hash = ContentHash::compute_file(source).map_err(|e| FsError::from_io(source, e))?;
        if let Some(existing) = note.attachment_with_hash(&hash) {
            return Ok(AttachOutcome::Duplicate {
                existing: existing.filename().to_string(),
            });
        }

        let filename = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StoreError::InvalidAttachment(source.to_path_buf()))?
            .to_string();

        let dir = self.attachments_dir(note.id());
        fs::ensure_dir(&dir)?;
        let destination = dir.join(&filename);
        fs::copy_new(source, &destination).map_err(|e| match e {
            FsError::AlreadyExists { .. } => StoreError::AttachmentExists {
                filename: filename.clone(),
                note: note.short_id(),
            },
            other => other.into(),
        })?;
        fs::set_readonly(&destination)?;

        note.push_attachment(Attachment::new(filename.clone(), hash, Utc::now()));
        self.save(note)?;
        info!("attached {} to note {}", filename, note.short_id());
        Ok(AttachOutcome::Attached { filename })
    }

    // ===========================================
    // Aliases
    // ===========================================

    /// Loads the alias table.
    pub fn aliases(&self) -> Result<AliasTable, StoreError> {
        AliasTable::load(&self.aliases_path())
    }

    /// Binds `alias` to the note, replacing any alias it had before.
    pub fn assign_alias(&self, note: &mut Note, alias: &str) -> Result<(), StoreError> {
        let mut table = self.aliases()?;
        table.set(alias, *note.id())?;
        table.save()?;
        note.set_alias(Some(alias.to_string()));
        self.save(note)
    }

    /// Removes the note's alias from both the table and its metadata.
    pub fn clear_alias(&self, note: &mut Note) -> Result<(), StoreError> {
        let mut table = self.aliases()?;
        if table.delete_by_id(note.id()) > 0 {
            table.save()?;
        }
        note.set_alias(None);
        self.save(note)
    }

    // ===========================================
    // Templates
    // ===========================================

    /// Lists template files, sorted by name.
    pub fn templates(&self) -> Result<Vec<PathBuf>, StoreError> {
        Ok(fs::list_files(&self.templates_dir())?)
    }
}
