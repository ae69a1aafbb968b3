//! Resolving user tokens to note identifiers.

use log::trace;

use super::{AliasTable, NoteStore, StoreError};
use crate::domain::NoteId;

impl NoteStore {
    /// Returns the identifiers of every note whose id starts with `prefix`.
    pub fn find_by_prefix(&self, prefix: &str) -> Result<Vec<NoteId>, StoreError> {
        Ok(self
            .ids()?
            .into_iter()
            .filter(|id| id.to_string().starts_with(prefix))
            .collect())
    }

    /// Resolves a token to an existing note.
    ///
    /// Tried in order: a full identifier, an abbreviated identifier (eight
    /// lowercase hex characters, which must match exactly one note), then an
    /// alias.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NoteNotFound` when nothing matches and
    /// `StoreError::AmbiguousAbbreviation` when an abbreviation matches more
    /// than one note.
    pub fn resolve(&self, token: &str, aliases: &AliasTable) -> Result<NoteId, StoreError> {
        if let Ok(id) = token.parse::<NoteId>() {
            trace!("'{}' is a full identifier", token);
            return self.existing(id, token);
        }

        if NoteId::is_abbreviation(token) {
            trace!("'{}' is an abbreviation", token);
            return self.resolve_prefix(token);
        }

        match aliases.get(token) {
            Some(id) => {
                trace!("'{}' is an alias of {}", token, id);
                self.existing(id, token)
            }
            None => Err(StoreError::NoteNotFound(token.to_string())),
        }
    }

    /// Resolves a hex prefix of any length to exactly one note.
    pub fn resolve_prefix(&self, prefix: &str) -> Result<NoteId, StoreError> {
        let mut matches = self.find_by_prefix(prefix)?;
        match matches.len() {
            0 => Err(StoreError::NoteNotFound(prefix.to_string())),
            1 => Ok(matches.remove(0)),
            count => Err(StoreError::AmbiguousAbbreviation {
                prefix: prefix.to_string(),
                count,
            }),
        }
    }

    fn existing(&self, id: NoteId, token: &str) -> Result<NoteId, StoreError> {
        if self.exists(&id) {
            Ok(id)
        } else {
            Err(StoreError::NoteNotFound(token.to_string()))
        }
    }
}
