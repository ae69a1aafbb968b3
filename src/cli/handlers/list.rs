//! List command handler.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use super::Session;
use crate::cli::output::{NoteListing, Output, OutputFormat, TemplateListing, format_table};
use crate::cli::{ListArgs, ListKind};
use crate::domain::Note;

pub fn handle_list(args: &ListArgs, session: &Session<'_>) -> Result<()> {
    match args.kind {
        ListKind::Notes => list_notes(args.format, session),
        ListKind::Templates => list_templates(args.format, session),
    }
}

fn list_notes(format: OutputFormat, session: &Session<'_>) -> Result<()> {
    let notes = session.notes()?;

    match format {
        OutputFormat::Human => {
            if notes.is_empty() {
                println!("No notes found.");
            } else {
                print!("{}", notes_table(&notes));
            }
        }
        OutputFormat::Json => {
            let listings: Vec<NoteListing> = notes.iter().map(NoteListing::from).collect();
            let output = Output::new(listings);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Paths => {
            for note in &notes {
                println!("{}", session.store.note_dir(note.id()).display());
            }
        }
    }

    Ok(())
}

/// Renders notes as an id / tags / title / created table.
pub(crate) fn notes_table(notes: &[Note]) -> String {
    let rows: Vec<Vec<String>> = notes
        .iter()
        .map(|note| {
            let tags: Vec<&str> = note.tags().iter().map(|t| t.as_str()).collect();
            vec![
                note.short_id(),
                tags.join(","),
                note.title().to_string(),
                note.created()
                    .with_timezone(&Local)
                    .format("%Y-%m-%d")
                    .to_string(),
            ]
        })
        .collect();
    format_table(&["id", "tags", "title", "created"], &rows)
}

fn list_templates(format: OutputFormat, session: &Session<'_>) -> Result<()> {
    let paths = session.store.templates().with_context(|| {
        format!(
            "failed to list templates in {}",
            session.store.templates_dir().display()
        )
    })?;

    if let OutputFormat::Paths = format {
        for path in &paths {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let mut listings = Vec::with_capacity(paths.len());
    for path in &paths {
        let meta = std::fs::metadata(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let modified: DateTime<Local> = meta
            .modified()
            .with_context(|| format!("failed to read mtime of {}", path.display()))?
            .into();
        listings.push(TemplateListing {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            size: meta.len(),
            modified,
        });
    }

    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(&Output::new(listings))?);
        return Ok(());
    }

    println!("Note Templates:");
    for t in &listings {
        println!(
            "   {} ({} Bytes, modified: {})",
            t.name,
            t.size,
            t.modified.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}
