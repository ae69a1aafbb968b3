//! File (attachment) command handler.

use anyhow::{Context, Result, bail};
use std::path::PathBuf;

use super::{Session, run_captured};
use crate::cli::{FileArgs, FileCommand};
use crate::domain::Note;
use crate::store::{AttachOutcome, StoreError};

pub fn handle_file(args: &FileArgs, session: &Session<'_>) -> Result<()> {
    let mut note = session.single_note("file")?;
    match &args.command {
        None | Some(FileCommand::List) => list_files(&note),
        Some(FileCommand::Add { files }) => add_files(&mut note, files, session),
        Some(FileCommand::Browse) => browse(&note, session),
    }
}

fn list_files(note: &Note) -> Result<()> {
    if note.attachments().is_empty() {
        println!("{}: Note does not have attachments", note.short_id());
        return Ok(());
    }
    for attachment in note.attachments() {
        println!(
            "{}  {}  {}",
            attachment.created().format("%Y-%m-%d %H:%M"),
            &attachment.hash().as_str()[..12],
            attachment.filename()
        );
    }
    Ok(())
}

/// Attaches each file in turn. Duplicates and name clashes are reported and
/// skipped; other failures are reported and make the command fail at the end.
fn add_files(note: &mut Note, files: &[PathBuf], session: &Session<'_>) -> Result<()> {
    let mut failures = 0;
    for file in files {
        match session.store.attach_file(note, file) {
            Ok(AttachOutcome::Attached { filename }) => {
                println!("{}: Attached file {}.", note.short_id(), filename)
            }
            Ok(AttachOutcome::Duplicate { existing }) => {
                println!("File with same checksum already attached: {existing}.")
            }
            Err(StoreError::AttachmentExists { filename, .. }) => {
                println!("File already attached. Use another name: {filename}.")
            }
            Err(err) => {
                eprintln!("{}: error: {}", file.display(), err);
                failures += 1;
            }
        }
    }
    if failures > 0 {
        bail!("{} of {} files could not be attached", failures, files.len());
    }
    Ok(())
}

fn browse(note: &Note, session: &Session<'_>) -> Result<()> {
    let dir = session.store.attachments_dir(note.id());
    if !dir.is_dir() {
        println!("{}: Note does not have attachments", note.short_id());
        return Ok(());
    }
    let command = session.config.file_manager();
    run_captured(&command, &dir)
        .with_context(|| format!("failed to browse attachments of {}", note.short_id()))?;
    Ok(())
}
