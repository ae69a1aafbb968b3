//! CLI command definitions and handlers
//!
//! A command line has three parts: global options, filter terms, and an
//! action with its arguments:
//!
//! ```text
//! note [-a] [-d DIR] [-v...] [FILTER...] ACTION [ARGS...]
//! ```
//!
//! [`Cli`] parses the global options and collects everything else. The
//! [`filter::FilterParser`] consumes filter terms from the front, and the
//! remainder is parsed as an [`Action`] by [`ActionCli`].

pub mod config;
pub mod filter;
pub mod handlers;
pub mod output;
pub mod timestamp;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

use output::OutputFormat;

/// note - plain-text notes with tags, versions and attachments
#[derive(Parser, Debug)]
#[command(
    name = "note",
    version,
    about,
    long_about = None,
    after_help = "Run `note help` to list the actions."
)]
pub struct Cli {
    /// Include deleted notes in filter results
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Data directory (overrides config file)
    #[arg(short = 'd', long)]
    pub dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Filter terms (+tag, -tag, created.after:DATE, id, alias) followed by an action
    #[arg(
        value_name = "FILTER... ACTION",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub args: Vec<String>,
}

/// Parser for the action part of the command line.
#[derive(Parser, Debug)]
#[command(
    name = "note",
    override_usage = "note [OPTIONS] [FILTER]... <ACTION> [ARGS]...",
    disable_version_flag = true
)]
pub struct ActionCli {
    #[command(subcommand)]
    pub action: Action,
}

#[derive(Subcommand, Debug)]
pub enum Action {
    /// Create a new note from a template
    Add(AddArgs),

    /// List notes or templates
    List(ListArgs),

    /// Print notes with a header
    Print(ShowArgs),

    /// Show notes in the pager
    Read(ShowArgs),

    /// Edit a note in your editor
    Edit(EditArgs),

    /// List the versions of a note
    Versions,

    /// Add or remove tags, or change the title
    Modify(ModifyArgs),

    /// Mark notes as deleted
    Delete,

    /// Restore deleted notes
    Undelete,

    /// Search the latest content of notes with a regular expression
    Search(SearchArgs),

    /// Show tag counts for the selected notes
    Tags(TagsArgs),

    /// List, add or browse a note's attachments
    File(FileArgs),

    /// Manage note aliases
    Alias(AliasArgs),

    /// Print version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `add` action
#[derive(Parser, Debug)]
pub struct AddArgs {
    /// Template name from the templates directory
    #[arg(short, long, default_value = "note")]
    pub template: String,

    /// Leading +TAG words, then the title
    #[arg(
        value_name = "[+TAG]... TITLE",
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub words: Vec<String>,
}

/// What `list` shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ListKind {
    #[default]
    Notes,
    Templates,
}

/// Arguments for the `list` action
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// What to list
    #[arg(value_enum, default_value_t = ListKind::Notes)]
    pub kind: ListKind,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `print` and `read` actions
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Version to show (default: latest)
    pub version: Option<String>,
}

/// Arguments for the `edit` action
#[derive(Parser, Debug)]
pub struct EditArgs {
    /// Version to start from (default: latest)
    pub version: Option<String>,
}

/// Arguments for the `modify` action
#[derive(Parser, Debug)]
pub struct ModifyArgs {
    /// +TAG to add, -TAG to remove, then an optional new title
    #[arg(
        value_name = "[+TAG|-TAG]... [TITLE]",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub words: Vec<String>,
}

/// Arguments for the `search` action
#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Match case exactly (default: case-insensitive)
    #[arg(short = 's', long)]
    pub case_sensitive: bool,

    /// Regular expression
    pub pattern: String,
}

/// Ordering of the `tags` output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum TagOrder {
    /// Most used first
    #[default]
    Count,
    /// Alphabetical
    Name,
}

/// Arguments for the `tags` action
#[derive(Parser, Debug)]
pub struct TagsArgs {
    /// List the notes under each tag
    #[arg(short = 'f', long)]
    pub full: bool,

    /// Ordering of tags
    #[arg(short = 'o', long, value_enum, default_value_t = TagOrder::Count)]
    pub order: TagOrder,
}

/// Arguments for the `file` action
#[derive(Parser, Debug)]
pub struct FileArgs {
    #[command(subcommand)]
    pub command: Option<FileCommand>,
}

#[derive(Subcommand, Debug)]
pub enum FileCommand {
    /// List attachments (default)
    List,

    /// Attach files
    Add {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Open the attachment directory in the file manager
    Browse,
}

/// Arguments for the `alias` action
#[derive(Parser, Debug)]
pub struct AliasArgs {
    #[command(subcommand)]
    pub command: AliasCommand,
}

#[derive(Subcommand, Debug)]
pub enum AliasCommand {
    /// Give a note an alias, replacing its previous one
    Set { alias: String },

    /// List aliases of the selected notes (all aliases without a filter)
    List,

    /// Remove a note's alias
    Remove,
}

/// Arguments for the `completions` action
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for (bash, zsh, fish)
    #[arg(value_enum)]
    pub shell: Shell,
}
