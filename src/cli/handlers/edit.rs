use anyhow::{Context, Result};

use super::Session;
use crate::cli::EditArgs;
use crate::domain::VersionToken;
use crate::store::{CommandEditor, CommitOutcome, Editor, VersionCommitter};

pub(crate) fn handle_edit_impl<E: Editor>(
    args: &EditArgs,
    session: &Session<'_>,
    editor: &E,
) -> Result<CommitOutcome> {
    let mut note = session.single_note("edit")?;
    let version = args
        .version
        .as_deref()
        .map(str::parse::<VersionToken>)
        .transpose()?;

    let outcome = VersionCommitter::new(session.store, editor)
        .edit(&mut note, version.as_ref())
        .with_context(|| format!("failed to edit note {}", note.short_id()))?;

    match &outcome {
        CommitOutcome::Committed(token) => {
            println!("{}: Created note version {}", note.short_id(), token)
        }
        CommitOutcome::Unchanged => {
            println!("{}: No changes, version not created.", note.short_id())
        }
    }
    Ok(outcome)
}

pub fn handle_edit(args: &EditArgs, session: &Session<'_>) -> Result<()> {
    let command = session.config.editor();
    let editor = CommandEditor::from_command_line(&command)
        .with_context(|| format!("invalid editor command '{command}'"))?;
    handle_edit_impl(args, session, &editor)?;
    Ok(())
}
