//! Tags command handler.

use anyhow::Result;
use std::collections::BTreeMap;

use super::Session;
use crate::cli::{TagOrder, TagsArgs};
use crate::domain::Note;

/// Groups notes under each of their explicit tags.
///
/// Tags come out sorted by name, or by descending note count with ties
/// kept in name order.
pub(crate) fn group_by_tag(notes: &[Note], order: TagOrder) -> Vec<(String, Vec<&Note>)> {
    let mut groups: BTreeMap<&str, Vec<&Note>> = BTreeMap::new();
    for note in notes {
        for tag in note.tags() {
            groups.entry(tag.as_str()).or_default().push(note);
        }
    }

    let mut groups: Vec<(String, Vec<&Note>)> = groups
        .into_iter()
        .map(|(tag, notes)| (tag.to_string(), notes))
        .collect();
    if order == TagOrder::Count {
        groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
    }
    groups
}

pub fn handle_tags(args: &TagsArgs, session: &Session<'_>) -> Result<()> {
    let notes = session.notes()?;
    for (tag, tagged) in group_by_tag(&notes, args.order) {
        println!("{} ({})", tag, tagged.len());
        if args.full {
            for note in &tagged {
                println!(
                    "  - {}: {} ({})",
                    note.short_id(),
                    note.title(),
                    note.created().format("%Y-%m-%d")
                );
            }
            println!();
        }
    }
    Ok(())
}
