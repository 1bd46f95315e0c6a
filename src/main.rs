//! ty2ini-edit - terminal editor for Ty 2 INI config text
//!
//! Live highlighting of section names, field names and values, plus
//! completion of known identifiers.

mod buffer;
mod command;
mod completion;
mod config;
mod display;
mod document;
mod editor;
mod error;
mod input;
mod line;
mod logging;
mod syntax;
mod terminal;
mod toolchain;
mod window;
mod wordlist;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{error, info, warn};

use completion::CompletionIndex;
use config::Config;
use editor::EditorState;
use error::Result;
use syntax::{Classifier, SyntaxManager};
use terminal::Terminal;
use toolchain::ExternalToolchain;
use wordlist::WordLists;

/// Terminal editor for Ty 2 INI config text
#[derive(Debug, Parser)]
#[command(name = "ty2ini-edit", version, about)]
struct Cli {
    /// Document to open (.txt is read as text, anything else is imported)
    file: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory holding SectionNames.txt and FieldNames.txt
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "ty2ini_edit=trace" (overrides RUST_LOG)
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = match logging::init_logging(cli.log_level.as_deref()) {
        Ok((guard, path)) => {
            info!(log_file = %path.display(), "ty2ini-edit starting");
            Some(guard)
        }
        Err(e) => {
            eprintln!("Warning: logging disabled: {}", e);
            None
        }
    };

    if let Err(e) = run(cli) {
        error!(error = %e, "fatal");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref());

    let data_dir = config.data_dir(cli.data_dir.as_deref());
    let words = WordLists::load(&data_dir);
    info!(
        data_dir = %data_dir.display(),
        sections = words.sections.len(),
        fields = words.fields.len(),
        "loaded word lists"
    );

    let classifier = match Classifier::new(words.fields.words()) {
        Ok(classifier) => classifier,
        Err(e) => {
            warn!(error = %e, "field rules unavailable");
            Classifier::new(&[])?
        }
    };
    if !classifier.has_field_rules() {
        warn!(data_dir = %data_dir.display(), "no field identifiers; field highlighting off");
    }
    let syntax = SyntaxManager::new(classifier);

    let completion = CompletionIndex::new(&words.sections, &words.fields)
        .with_min_fragment(config.completion.min_fragment);
    if completion.is_empty() {
        warn!(data_dir = %data_dir.display(), "no identifiers to complete");
    }
    let toolchain = ExternalToolchain::new(config.toolchain.clone());

    let mut editor = EditorState::new(&config, syntax, completion, Box::new(toolchain));

    if let Some(path) = &cli.file {
        editor.open_file(path)?;
    }

    let mut terminal = Terminal::new()?;
    editor.run(&mut terminal)?;

    info!("ty2ini-edit exiting");
    Ok(())
}
