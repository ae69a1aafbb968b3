use anyhow::{Context, Result};

use super::Session;
use crate::cli::{AliasArgs, AliasCommand};

pub fn handle_alias(args: &AliasArgs, session: &Session<'_>) -> Result<()> {
    match &args.command {
        AliasCommand::Set { alias } => {
            let mut note = session.single_note("alias set")?;
            session
                .store
                .assign_alias(&mut note, alias)
                .with_context(|| format!("failed to set alias for {}", note.short_id()))?;
            println!("{}: OK", note.short_id());
        }
        AliasCommand::List => {
            if session.filter.is_empty() {
                let table = session.store.aliases()?;
                for (alias, id) in table.iter() {
                    println!("{}: {}", id.short(), alias);
                }
            } else {
                for note in session.notes()? {
                    if let Some(alias) = note.alias() {
                        println!("{}: {}", note.short_id(), alias);
                    }
                }
            }
        }
        AliasCommand::Remove => {
            let mut note = session.single_note("alias remove")?;
            session
                .store
                .clear_alias(&mut note)
                .with_context(|| format!("failed to remove alias of {}", note.short_id()))?;
            println!("{}: OK", note.short_id());
        }
    }
    Ok(())
}
