//! Modify, delete and undelete command handlers.

use anyhow::{Result, bail};

use super::{Session, for_each_note, split_tag_words};
use crate::cli::ModifyArgs;

pub fn handle_modify(args: &ModifyArgs, session: &Session<'_>) -> Result<()> {
    let words = split_tag_words(&args.words)?;
    let title = (!words.rest.is_empty()).then(|| words.rest.join(" "));
    if words.add.is_empty() && words.remove.is_empty() && title.is_none() {
        bail!("nothing to modify: give +TAG, -TAG or a new title");
    }

    let mut notes = if title.is_some() {
        vec![session.single_note("changing the title")?]
    } else {
        session.notes()?
    };
    if notes.is_empty() {
        bail!("no notes match the filter");
    }

    for_each_note(&mut notes, |note| {
        session
            .store
            .modify(note, &words.add, &words.remove, title.as_deref())?;
        Ok("Updated note.".to_string())
    })
}

pub fn handle_delete(session: &Session<'_>) -> Result<()> {
    if session.filter.is_empty() {
        bail!("delete needs a filter; refusing to delete every note");
    }
    let mut notes = session.notes()?;
    if notes.is_empty() {
        bail!("no notes match the filter");
    }
    for_each_note(&mut notes, |note| {
        Ok(if session.store.delete(note)? {
            "Deleted".to_string()
        } else {
            "Already deleted".to_string()
        })
    })
}

pub fn handle_undelete(session: &Session<'_>) -> Result<()> {
    if session.filter.is_empty() {
        bail!("undelete needs a filter; refusing to restore every note");
    }
    let mut filter = session.filter.clone();
    filter.include_deleted = true;
    let mut notes = session.store.select(&filter)?;
    if notes.is_empty() {
        bail!("no notes match the filter");
    }
    for_each_note(&mut notes, |note| {
        Ok(if session.store.undelete(note)? {
            "Undeleted".to_string()
        } else {
            "Not deleted".to_string()
        })
    })
}
