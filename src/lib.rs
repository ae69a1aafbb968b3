//! notemanager - plain-text notes with tags, versions, aliases and attachments

pub mod cli;
pub mod domain;
pub mod infra;
pub mod store;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::LevelFilter;

use cli::{
    Action, ActionCli, Cli,
    config::Config,
    filter::FilterParser,
    handlers::{
        Session, handle_add, handle_alias, handle_delete, handle_edit, handle_file, handle_list,
        handle_modify, handle_print, handle_read, handle_search, handle_tags, handle_undelete,
        handle_versions,
    },
};
use store::NoteStore;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // RUST_LOG, when set, overrides the -v level.
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load()?;
    let data_dir = config.data_dir(cli.dir.as_ref());
    let store = NoteStore::open(&data_dir)
        .with_context(|| format!("failed to open data directory {}", data_dir.display()))?;
    let aliases = store.aliases()?;

    let (mut filter, rest) = FilterParser::new(&store, &aliases).parse(&cli.args)?;
    if cli.all {
        filter.include_deleted = true;
    }

    if rest.is_empty() {
        ActionCli::command().print_help()?;
        return Ok(());
    }
    let argv = std::iter::once("note").chain(rest.iter().map(String::as_str));
    let action = match ActionCli::try_parse_from(argv) {
        Ok(parsed) => parsed.action,
        Err(e) => e.exit(),
    };

    let session = Session::new(&store, &config, filter);
    match &action {
        Action::Add(args) => handle_add(args, &session),
        Action::List(args) => handle_list(args, &session),
        Action::Print(args) => handle_print(args, &session),
        Action::Read(args) => handle_read(args, &session),
        Action::Edit(args) => handle_edit(args, &session),
        Action::Versions => handle_versions(&session),
        Action::Modify(args) => handle_modify(args, &session),
        Action::Delete => handle_delete(&session),
        Action::Undelete => handle_undelete(&session),
        Action::Search(args) => handle_search(args, &session),
        Action::Tags(args) => handle_tags(args, &session),
        Action::File(args) => handle_file(args, &session),
        Action::Alias(args) => handle_alias(args, &session),
        Action::Version => {
            println!("note {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Action::Completions(args) => {
            let mut command = ActionCli::command();
            clap_complete::generate(args.shell, &mut command, "note", &mut std::io::stdout());
            Ok(())
        }
    }
}
