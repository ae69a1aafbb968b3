//! Command handlers for the CLI.

mod add;
mod alias;
mod edit;
mod file;
mod list;
mod modify;
mod search;
mod show;
mod tags;


use anyhow::{Context, Result, bail};
use std::io::Write;
use std::process::{Command, Stdio};

use crate::cli::config::Config;
use crate::domain::{Note, NoteFilter, Tag};
use crate::store::NoteStore;

// Re-export public items
pub use add::handle_add;
pub use alias::handle_alias;
pub use edit::handle_edit;
pub use file::handle_file;
pub use list::handle_list;
pub use modify::{handle_delete, handle_modify, handle_undelete};
pub use search::handle_search;
pub use show::{handle_print, handle_read, handle_versions, render_note};
pub use tags::handle_tags;

// Re-export for tests
#[cfg(test)]
pub(crate) use add::handle_add_impl;
#[cfg(test)]
pub(crate) use edit::handle_edit_impl;
#[cfg(test)]
pub(crate) use list::notes_table;
#[cfg(test)]
pub(crate) use search::matching_lines;
#[cfg(test)]
pub(crate) use tags::group_by_tag;

// ===========================================
// Shared Utilities
// ===========================================

/// Everything a handler needs: the store, the configuration and the filter
/// parsed from the command line.
pub struct Session<'a> {
    pub store: &'a NoteStore,
    pub config: &'a Config,
    pub filter: NoteFilter,
}

impl<'a> Session<'a> {
    pub fn new(store: &'a NoteStore, config: &'a Config, filter: NoteFilter) -> Self {
        Self {
            store,
            config,
            filter,
        }
    }

    /// Loads the notes selected by the filter, oldest first.
    pub fn notes(&self) -> Result<Vec<Note>> {
        self.store
            .select(&self.filter)
            .with_context(|| format!("failed to load notes from {}", self.store.root().display()))
    }

    /// Loads the single note an action operates on.
    pub fn single_note(&self, action: &str) -> Result<Note> {
        let mut notes = self.notes()?;
        match notes.len() {
            0 => bail!("no notes match the filter"),
            1 => Ok(notes.remove(0)),
            n => bail!("{action} needs exactly one note, but {n} notes match the filter"),
        }
    }
}

/// Tag changes and remaining words split from an action's arguments.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct TagWords {
    pub add: Vec<Tag>,
    pub remove: Vec<Tag>,
    pub rest: Vec<String>,
}

/// Splits leading `+tag` / `-tag` words off `words`.
///
/// Words after the first non-tag word are kept as they are, so a title may
/// contain `+` or `-` words.
pub(crate) fn split_tag_words(words: &[String]) -> Result<TagWords> {
    let mut split = TagWords::default();
    let mut iter = words.iter();
    for word in iter.by_ref() {
        let (list, name) = if let Some(name) = word.strip_prefix('+') {
            (&mut split.add, name)
        } else if let Some(name) = word.strip_prefix('-') {
            (&mut split.remove, name)
        } else {
            split.rest.push(word.clone());
            break;
        };
        let tag = Tag::new(name).with_context(|| format!("invalid tag argument '{word}'"))?;
        if !list.contains(&tag) {
            list.push(tag);
        }
    }
    split.rest.extend(iter.cloned());
    Ok(split)
}

/// Runs `action` for every note, printing its message or its error, and
/// fails at the end if any note failed. Earlier successes are kept.
pub(crate) fn for_each_note<F>(notes: &mut [Note], mut action: F) -> Result<()>
where
    F: FnMut(&mut Note) -> Result<String>,
{
    let mut failures = 0;
    for note in notes.iter_mut() {
        match action(note) {
            Ok(message) => println!("{}: {}", note.short_id(), message),
            Err(err) => {
                eprintln!("{}: error: {:#}", note.short_id(), err);
                failures += 1;
            }
        }
    }
    if failures > 0 {
        bail!("{} of {} notes failed", failures, notes.len());
    }
    Ok(())
}

/// Runs a configured command line with `input` on its stdin.
pub(crate) fn run_with_input(command: &str, input: &str) -> Result<()> {
    let words = shell_words::split(command)
        .with_context(|| format!("invalid command '{command}'"))?;
    let Some((program, args)) = words.split_first() else {
        bail!("command is empty");
    };

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to launch '{command}'"))?;

    if let Some(mut stdin) = child.stdin.take() {
        // A pager that quits early closes the pipe; that is not an error.
        match stdin.write_all(input.as_bytes()) {
            Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => {
                return Err(e).with_context(|| format!("failed to write to '{command}'"));
            }
            _ => {}
        }
    }

    let status = child
        .wait()
        .with_context(|| format!("failed to wait for '{command}'"))?;
    if !status.success() {
        bail!("'{command}' exited with {status}");
    }
    Ok(())
}

/// Runs a configured command line with `arg` appended and returns its stdout.
pub(crate) fn run_captured(command: &str, arg: &std::path::Path) -> Result<String> {
    let words = shell_words::split(command)
        .with_context(|| format!("invalid command '{command}'"))?;
    let Some((program, args)) = words.split_first() else {
        bail!("command is empty");
    };

    let output = Command::new(program)
        .args(args)
        .arg(arg)
        .output()
        .with_context(|| format!("failed to launch '{command}'"))?;
    if !output.status.success() {
        bail!(
            "'{command}' exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
