//! Turns the leading command-line tokens into a [`NoteFilter`].
//!
//! Tokens are consumed from the front while they match one of these kinds,
//! tried in order:
//!
//! | token                         | kind                       |
//! |-------------------------------|----------------------------|
//! | `+name` / `-name`             | include / exclude tag      |
//! | `created.after:<ts>` etc.     | date range bound           |
//! | full note id                  | explicit note              |
//! | 8 lowercase hex characters    | abbreviated note id        |
//! | known alias                   | explicit note              |
//!
//! The first token of no kind ends the filter; it and everything after it
//! belong to the action.

use chrono::{DateTime, Utc};
use log::debug;
use thiserror::Error;

use super::timestamp::{TimestampError, parse_timestamp};
use crate::domain::{NoteFilter, NoteId};
use crate::store::{AliasTable, NoteStore, StoreError};

/// Errors parsing filter terms.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid tag filter '{0}': tags must contain only letters and digits")]
    InvalidTag(String),

    #[error("invalid filter '{term}'")]
    Timestamp {
        term: String,
        #[source]
        source: TimestampError,
    },

    #[error("mutually exclusive filter: notes selected by id or alias cannot be combined with tag or date terms")]
    MutuallyExclusive,

    #[error(transparent)]
    Resolve(#[from] StoreError),
}

/// One recognized filter term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterToken {
    IncludeTag(String),
    ExcludeTag(String),
    CreatedAfter(DateTime<Utc>),
    CreatedBefore(DateTime<Utc>),
    ModifiedAfter(DateTime<Utc>),
    ModifiedBefore(DateTime<Utc>),
    Note(NoteId),
}

type DateBound = fn(DateTime<Utc>) -> FilterToken;

const DATE_PREFIXES: &[(&str, DateBound)] = &[
    ("created.after:", FilterToken::CreatedAfter),
    ("created.before:", FilterToken::CreatedBefore),
    ("modified.after:", FilterToken::ModifiedAfter),
    ("modified.before:", FilterToken::ModifiedBefore),
];

/// Parses filter terms, resolving note references against a store.
pub struct FilterParser<'a> {
    store: &'a NoteStore,
    aliases: &'a AliasTable,
}

impl<'a> FilterParser<'a> {
    pub fn new(store: &'a NoteStore, aliases: &'a AliasTable) -> Self {
        Self { store, aliases }
    }

    /// Classifies one token. `Ok(None)` means the token is not a filter term.
    ///
    /// Note references are resolved immediately, so an unknown id or an
    /// ambiguous abbreviation fails here.
    pub fn classify(&self, token: &str) -> Result<Option<FilterToken>, FilterError> {
        if let Some(rest) = token.strip_prefix('+') {
            return tag_name(token, rest).map(|t| Some(FilterToken::IncludeTag(t)));
        }
        if let Some(rest) = token.strip_prefix('-') {
            return tag_name(token, rest).map(|t| Some(FilterToken::ExcludeTag(t)));
        }

        for (prefix, bound) in DATE_PREFIXES {
            if let Some(value) = token.strip_prefix(prefix) {
                let at = parse_timestamp(value).map_err(|source| FilterError::Timestamp {
                    term: token.to_string(),
                    source,
                })?;
                return Ok(Some(bound(at)));
            }
        }

        if NoteId::is_identifier(token)
            || NoteId::is_abbreviation(token)
            || self.aliases.get(token).is_some()
        {
            let id = self.store.resolve(token, self.aliases)?;
            return Ok(Some(FilterToken::Note(id)));
        }

        Ok(None)
    }

    /// Consumes filter terms from the front of `tokens` and returns the
    /// filter together with the unconsumed rest.
    ///
    /// An explicit note selection turns on `include_deleted`, so deleted
    /// notes can still be addressed by id.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::MutuallyExclusive` if explicit notes are combined
    /// with tag or date terms.
    pub fn parse<'t>(&self, tokens: &'t [String]) -> Result<(NoteFilter, &'t [String]), FilterError> {
        let mut filter = NoteFilter::default();
        let mut consumed = 0;

        for token in tokens {
            let Some(term) = self.classify(token)? else {
                break;
            };
            debug!("filter term {:?}", term);
            apply(&mut filter, term);
            consumed += 1;
        }

        if !filter.notes.is_empty() {
            if filter.has_attribute_terms() {
                return Err(FilterError::MutuallyExclusive);
            }
            filter.include_deleted = true;
        }

        Ok((filter, &tokens[consumed..]))
    }
}

fn tag_name(token: &str, name: &str) -> Result<String, FilterError> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(FilterError::InvalidTag(token.to_string()));
    }
    Ok(name.to_string())
}

fn push_unique<T: PartialEq>(list: &mut Vec<T>, item: T) {
    if !list.contains(&item) {
        list.push(item);
    }
}

fn apply(filter: &mut NoteFilter, term: FilterToken) {
    match term {
        FilterToken::IncludeTag(tag) => push_unique(&mut filter.tags_include, tag),
        FilterToken::ExcludeTag(tag) => push_unique(&mut filter.tags_exclude, tag),
        FilterToken::CreatedAfter(at) => filter.created_after = Some(at),
        FilterToken::CreatedBefore(at) => filter.created_before = Some(at),
        FilterToken::ModifiedAfter(at) => filter.modified_after = Some(at),
        FilterToken::ModifiedBefore(at) => filter.modified_before = Some(at),
        FilterToken::Note(id) => push_unique(&mut filter.notes, id),
    }
}
