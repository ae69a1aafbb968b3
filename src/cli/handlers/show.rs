//! Print, read and versions command handlers.

use anyhow::{Context, Result, bail};
use chrono::Local;

use super::{Session, run_with_input};
use crate::cli::ShowArgs;
use crate::domain::{Note, VersionToken};

/// Renders a note version as header lines followed by its content.
pub fn render_note(note: &Note, version: &VersionToken, content: &str) -> String {
    let tags: Vec<&str> = note.tags().iter().map(|t| t.as_str()).collect();
    format!(
        "+\n\
         + Title:       {}\n\
         + Date:        {}\n\
         +\n\
         + Tags:        {}\n\
         + Attachments: {}\n\
         + Version:     {}\n\
         +\n\
         \n\
         \n\
         {}\n",
        note.title(),
        note.created().with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
        tags.join(", "),
        note.attachments().len(),
        version,
        content
    )
}

/// Renders every selected note, or one note at a given version.
fn render_selection(args: &ShowArgs, session: &Session<'_>, action: &str) -> Result<String> {
    let notes = match &args.version {
        Some(_) => vec![session.single_note(action)?],
        None => session.notes()?,
    };
    if notes.is_empty() {
        bail!("no notes match the filter");
    }
    let requested = args
        .version
        .as_deref()
        .map(str::parse::<VersionToken>)
        .transpose()?;

    let mut out = String::new();
    for note in &notes {
        let Some(version) = requested.as_ref().or(note.latest_version()) else {
            bail!("note {} has no versions", note.short_id());
        };
        let content = session
            .store
            .content(note, Some(version))
            .with_context(|| format!("failed to read note {}", note.short_id()))?;
        out.push_str(&render_note(note, version, &content));
    }
    Ok(out)
}

pub fn handle_print(args: &ShowArgs, session: &Session<'_>) -> Result<()> {
    print!("{}", render_selection(args, session, "print")?);
    Ok(())
}

pub fn handle_read(args: &ShowArgs, session: &Session<'_>) -> Result<()> {
    let text = render_selection(args, session, "read")?;
    run_with_input(&session.config.pager(), &text)
}

pub fn handle_versions(session: &Session<'_>) -> Result<()> {
    let note = session.single_note("versions")?;
    for (i, version) in note.versions().iter().enumerate() {
        println!("{i}: {version}");
    }
    println!("---");
    println!("Total: {}", note.versions().len());
    Ok(())
}
