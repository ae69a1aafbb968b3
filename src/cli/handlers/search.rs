//! Search command handler.

use anyhow::{Context, Result};
use log::warn;
use regex::{Regex, RegexBuilder};

use super::Session;
use crate::cli::SearchArgs;

/// One-based numbers of the lines of `content` that match `pattern`.
pub(crate) fn matching_lines(pattern: &Regex, content: &str) -> Vec<usize> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| pattern.is_match(line))
        .map(|(i, _)| i + 1)
        .collect()
}

pub fn handle_search(args: &SearchArgs, session: &Session<'_>) -> Result<()> {
    let pattern = RegexBuilder::new(&args.pattern)
        .case_insensitive(!args.case_sensitive)
        .build()
        .with_context(|| format!("invalid search pattern '{}'", args.pattern))?;

    let mut matches = Vec::new();
    for note in session.notes()? {
        if note.latest_version().is_none() {
            continue;
        }
        let content = match session.store.content(&note, None) {
            Ok(content) => content,
            Err(e) => {
                warn!("skipping note {}: {}", note.short_id(), e);
                continue;
            }
        };
        let lines = matching_lines(&pattern, &content);
        if !lines.is_empty() {
            matches.push((note.short_id(), lines));
        }
    }

    println!("Search Results for pattern: {}", args.pattern);
    println!("Matches found: {}", matches.len());
    if !matches.is_empty() {
        println!();
        println!("Matches:");
        for (short, lines) in &matches {
            let lines: Vec<String> = lines.iter().map(usize::to_string).collect();
            println!(" - {} at lines {}", short, lines.join(", "));
        }
    }
    Ok(())
}
