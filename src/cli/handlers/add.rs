use anyhow::{Context, Result, bail};

use super::{Session, split_tag_words};
use crate::cli::AddArgs;
use crate::domain::Note;
use crate::store::{CommandEditor, CreateOutcome, Editor, VersionCommitter};

/// Stages a note from a template, opens it in the editor, and creates the
/// note if the scratch file was saved.
///
/// Returns the created note, or `None` if the editor left the file untouched.
pub(crate) fn handle_add_impl<E: Editor>(
    args: &AddArgs,
    session: &Session<'_>,
    editor: &E,
) -> Result<Option<Note>> {
    let words = split_tag_words(&args.words)?;
    if let Some(tag) = words.remove.first() {
        bail!("cannot remove tag '{tag}' from a new note");
    }
    let title = words.rest.join(" ");
    if title.trim().is_empty() {
        bail!("a new note needs a title");
    }

    let pending = session
        .store
        .create(&title, &words.add, &args.template)
        .with_context(|| format!("failed to stage note '{title}'"))?;
    let short = pending.id().short();

    match VersionCommitter::new(session.store, editor)
        .commit_new(pending)
        .with_context(|| format!("failed to create note {short}"))?
    {
        CreateOutcome::Created(note) => {
            println!("{}: Created note.", note.short_id());
            Ok(Some(note))
        }
        CreateOutcome::Abandoned => {
            println!("{short}: Note file was not saved, note not created.");
            Ok(None)
        }
    }
}

pub fn handle_add(args: &AddArgs, session: &Session<'_>) -> Result<()> {
    if !session.filter.is_empty() {
        bail!("add does not take a filter");
    }
    let command = session.config.editor();
    let editor = CommandEditor::from_command_line(&command)
        .with_context(|| format!("invalid editor command '{command}'"))?;
    handle_add_impl(args, session, &editor)?;
    Ok(())
}
