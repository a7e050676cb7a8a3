use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use flow_editor_core::persist::{to_json, validate_key};
use flow_editor_core::{
    Editor, EditorAction, EditorConfig, FileStorage, Outcome, Selection, Storage,
    deserialize_plain_text, serialize_plain_text,
};
use miette::{IntoDiagnostic, Result, WrapErr};

mod config;

#[derive(Parser)]
#[command(version, about = "Flow editor - rich-text formatting from the command line", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Directory holding the stored document
    #[arg(long, global = true, env = "FLOW_EDITOR_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Path to a KDL config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Storage key of the document (overrides the config)
    #[arg(long, global = true)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the stored document
    Show {
        /// Print the JSON snapshot instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// Replace the document with the contents of a plain-text file
    Import {
        /// One paragraph per line
        file: PathBuf,
    },
    /// Write the document as plain text
    Export {
        /// Output file (stdout if omitted)
        file: Option<PathBuf>,
    },
    /// Run actions in order, e.g. `bold@0:0-0:5 heading1@1:0 undo`
    Apply {
        #[arg(required = true)]
        actions: Vec<String>,
    },
    /// Show the toolbar state for a selection, e.g. `0:0-0:5`
    Status { selection: String },
    /// Delete the stored document
    Reset,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    init_miette();

    let cli = Cli::parse();

    let mut config = config::load_config(cli.config.as_deref())?;
    if let Some(key) = cli.key {
        config.storage_key = key.into();
    }
    validate_key(&config.storage_key)?;
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    tracing::debug!(dir = %data_dir.display(), key = %config.storage_key, "opening editor");
    let mut editor = Editor::open(FileStorage::new(data_dir), &config);

    match cli.command {
        Commands::Show { json } => {
            if json {
                println!("{}", to_json(editor.document())?);
            } else {
                println!("{}", serialize_plain_text(editor.document()));
            }
        }
        Commands::Import { file } => import(&mut editor, &file)?,
        Commands::Export { file } => export(&editor, file.as_deref())?,
        Commands::Apply { actions } => apply(&mut editor, &config, &actions)?,
        Commands::Status { selection } => {
            let selection: Selection = selection.parse()?;
            editor.state_mut().set_selection(Some(selection));
            print!("{}", editor.state().toolbar(config.toolbar));
        }
        Commands::Reset => {
            editor.reset()?;
            println!("Document reset");
        }
    }

    Ok(())
}

fn import(editor: &mut Editor<FileStorage>, file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .into_diagnostic()
        .wrap_err_with(|| format!("reading {}", file.display()))?;
    let document = deserialize_plain_text(&text);
    let blocks = document.len();
    editor.replace_document(document)?;
    println!("Imported {blocks} block(s) from {}", file.display());
    Ok(())
}

fn export(editor: &Editor<FileStorage>, file: Option<&Path>) -> Result<()> {
    let text = serialize_plain_text(editor.document());
    match file {
        Some(file) => {
            std::fs::write(file, text)
                .into_diagnostic()
                .wrap_err_with(|| format!("writing {}", file.display()))?;
        }
        None => println!("{text}"),
    }
    Ok(())
}

/// Parse every action up front so a typo does not leave half a sequence
/// applied, then run them in one session. Fails if any action was rejected.
fn apply<S: Storage>(
    editor: &mut Editor<S>,
    config: &EditorConfig,
    actions: &[String],
) -> Result<()> {
    let actions = actions
        .iter()
        .map(|action| action.parse::<EditorAction>())
        .collect::<Result<Vec<_>, _>>()?;

    let mut rejected = 0;
    for action in actions {
        match editor.execute(action) {
            Outcome::Applied => println!("applied   {action}"),
            Outcome::Unchanged => println!("unchanged {action}"),
            Outcome::Rejected(e) => {
                rejected += 1;
                println!("rejected  {action}: {e}");
            }
        }
    }

    println!();
    print!("{}", editor.state().toolbar(config.toolbar));

    if rejected > 0 {
        return Err(miette::miette!("{rejected} action(s) rejected"));
    }
    Ok(())
}

fn default_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("flow-editor"))
        .ok_or_else(|| miette::miette!("Could not determine data directory, pass --data-dir"))
}

fn init_miette() {
    let hook = miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }));
    if let Err(e) = hook {
        tracing::warn!(error = %e, "couldn't set the miette hook");
    }
    miette::set_panic_hook();
}
