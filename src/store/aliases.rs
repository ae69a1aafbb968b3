//! Alias table: human-chosen names bound to note identifiers.

use log::debug;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::StoreError;
use crate::domain::NoteId;
use crate::infra::fs::{FsError, write_atomic};

/// Words that cannot be used as aliases because they are action verbs.
pub const RESERVED_ALIASES: &[&str] = &[
    "add",
    "alias",
    "completions",
    "delete",
    "edit",
    "file",
    "list",
    "modify",
    "print",
    "read",
    "search",
    "tags",
    "undelete",
    "version",
    "versions",
];

/// Checks that `alias` can be bound to a note.
///
/// An alias must be non-empty ASCII alphanumeric, must not parse as a note
/// identifier or abbreviation, and must not be a reserved action verb.
pub fn validate_alias(alias: &str) -> Result<(), StoreError> {
    let invalid = |reason: &str| StoreError::InvalidAlias {
        alias: alias.to_string(),
        reason: reason.to_string(),
    };

    if alias.is_empty() {
        return Err(invalid("alias cannot be empty"));
    }
    if !alias.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid("aliases must contain only letters and digits"));
    }
    if NoteId::is_identifier(alias) || NoteId::is_abbreviation(alias) {
        return Err(invalid("alias looks like a note id"));
    }
    if RESERVED_ALIASES.contains(&alias) {
        return Err(invalid("alias is a reserved word"));
    }
    Ok(())
}

/// The persisted alias table.
///
/// The whole table is read and written as one YAML mapping. There is no
/// locking; callers load, mutate and save within one command.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    path: PathBuf,
    entries: BTreeMap<String, NoteId>,
}

impl AliasTable {
    /// Loads the table at `path`. A missing or empty file is an empty table.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let entries = match std::fs::read_to_string(path) {
            Ok(yaml) if yaml.trim().is_empty() => BTreeMap::new(),
            Ok(yaml) => {
                serde_yaml::from_str(&yaml).map_err(|source| StoreError::InvalidAliasTable {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(FsError::from_io(path, e).into()),
        };
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Writes the table back to the file it was loaded from.
    pub fn save(&self) -> Result<(), StoreError> {
        let yaml = serde_yaml::to_string(&self.entries).map_err(|source| {
            StoreError::InvalidAliasTable {
                path: self.path.clone(),
                source,
            }
        })?;
        write_atomic(&self.path, yaml.as_bytes())?;
        debug!("saved {} aliases to {}", self.entries.len(), self.path.display());
        Ok(())
    }

    /// Looks up the note bound to `alias`.
    pub fn get(&self, alias: &str) -> Option<NoteId> {
        self.entries.get(alias).copied()
    }

    /// Returns the alias bound to `id`, if any.
    pub fn alias_for(&self, id: &NoteId) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, bound)| *bound == id)
            .map(|(alias, _)| alias.as_str())
    }

    /// Binds `alias` to `id`, dropping any alias `id` had before.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidAlias` if the alias fails validation or is
    /// already bound to a different note.
    pub fn set(&mut self, alias: &str, id: NoteId) -> Result<(), StoreError> {
        validate_alias(alias)?;
        if let Some(other) = self.get(alias).filter(|other| *other != id) {
            return Err(StoreError::InvalidAlias {
                alias: alias.to_string(),
                reason: format!("already bound to note {}", other.short()),
            });
        }
        self.delete_by_id(&id);
        self.entries.insert(alias.to_string(), id);
        Ok(())
    }

    /// Removes every alias bound to `id` and returns how many were removed.
    pub fn delete_by_id(&mut self, id: &NoteId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, bound| *bound != *id);
        before - self.entries.len()
    }

    /// Iterates over `(alias, id)` pairs in alias order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NoteId)> {
        self.entries.iter().map(|(alias, id)| (alias.as_str(), id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
