//! Shelf CLI
//!
//! Command-line interface for Shelf - categorized bookmarks with search,
//! manual ordering and JSON backups.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use shelf_core::{CategoryFilter, Config, Store};

mod commands;
mod editor;
mod logging;
mod output;

use commands::bookmark::BookmarkFields;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "Shelf - Local bookmark manager with categories and search")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use an alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List bookmarks, optionally filtered by category and search text
    #[command(alias = "ls")]
    List {
        /// Category id, or "all"
        #[arg(short, long, default_value = "all")]
        category: CategoryFilter,
        /// Case-insensitive text matched against title, URL, notes and tags
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Manage categories
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// Manage bookmarks
    Bookmark {
        #[command(subcommand)]
        command: BookmarkCommands,
    },
    /// List all tags
    Tags,
    /// Export all data to a JSON file
    Export {
        /// Output file (defaults to bookmark_data_<date>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace all data with a JSON export
    Import {
        /// File to import
        file: PathBuf,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show database location and record counts
    Status,
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// List categories with bookmark counts
    #[command(alias = "ls")]
    List,
    /// Create a category
    #[command(alias = "create")]
    Add {
        /// Category name
        name: String,
    },
    /// Rename a category
    Rename {
        /// Category id
        id: i64,
        /// New name
        name: String,
    },
    /// Delete a category; its bookmarks become uncategorized
    #[command(alias = "rm")]
    Delete {
        /// Category id
        id: i64,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Set the category order (ids in their new order)
    Reorder {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

#[derive(Args)]
struct FieldArgs {
    /// Bookmark title
    #[arg(short = 'T', long)]
    title: Option<String>,
    /// Bookmark URL
    #[arg(short, long)]
    url: Option<String>,
    /// Free-form notes
    #[arg(short, long)]
    notes: Option<String>,
    /// Comma-separated tags
    #[arg(short, long)]
    tags: Option<String>,
    /// Category id or name (empty for uncategorized)
    #[arg(short, long)]
    category: Option<String>,
    /// Write notes in $EDITOR
    #[arg(long)]
    edit_notes: bool,
}

impl FieldArgs {
    fn split(self) -> (BookmarkFields, bool) {
        (
            BookmarkFields {
                title: self.title,
                url: self.url,
                notes: self.notes,
                tags: self.tags,
                category: self.category,
            },
            self.edit_notes,
        )
    }
}

#[derive(Subcommand)]
enum BookmarkCommands {
    /// Create a bookmark
    #[command(alias = "create")]
    Add {
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Edit a bookmark (prompts when no fields are given)
    Edit {
        /// Bookmark id
        id: i64,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a bookmark
    #[command(alias = "rm")]
    Delete {
        /// Bookmark id
        id: i64,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Show bookmark details
    Show {
        /// Bookmark id
        id: i64,
    },
    /// Open a bookmark in the default browser
    Open {
        /// Bookmark id
        id: i64,
    },
    /// Set the bookmark order (ids in their new order)
    Reorder {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, db_name, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands don't need the store
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), config_path, &output);
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    logging::init(&config);

    let mut store = Store::open(&config)
        .await
        .with_context(|| {
            format!(
                "Failed to open database at {}",
                config.database_path().display()
            )
        })
        .map_err(|err| with_hint(err, &output))?;

    let result = match cli.command {
        Commands::List { category, search } => list(&store, category, search, &output),
        Commands::Category { command } => {
            handle_category_command(command, &mut store, &output).await
        }
        Commands::Bookmark { command } => {
            handle_bookmark_command(command, &mut store, &output).await
        }
        Commands::Tags => commands::tag::list(&store, &output).await,
        Commands::Export { output: path } => {
            commands::transfer::export(&store, path, &output).await
        }
        Commands::Import { file, yes } => {
            commands::transfer::import(&mut store, file, yes, &output).await
        }
        Commands::Config { .. } => unreachable!(), // Handled above
        Commands::Status => commands::status::show(&store, &config, &output).await,
    };

    // A target that vanished between listing and acting is not a failure
    match result {
        Err(err) if is_not_found(&err) => {
            output.warning(&err.to_string());
            Ok(())
        }
        Err(err) => Err(with_hint(err, &output)),
        ok => ok,
    }
}

/// Print the recovery suggestion for a core error before it is reported
fn with_hint(err: anyhow::Error, output: &Output) -> anyhow::Error {
    if let Some(hint) = recovery_hint(&err) {
        output.warning(&format!("Hint: {}", hint));
    }
    err
}

fn recovery_hint(err: &anyhow::Error) -> Option<&'static str> {
    err.downcast_ref::<shelf_core::Error>()
        .and_then(shelf_core::Error::recovery_suggestion)
}

fn list(store: &Store, category: CategoryFilter, search: String, output: &Output) -> Result<()> {
    let view = store.compute_view(category, &search);
    output.print_view(&view);
    Ok(())
}

async fn handle_category_command(
    command: CategoryCommands,
    store: &mut Store,
    output: &Output,
) -> Result<()> {
    match command {
        CategoryCommands::List => commands::category::list(store, output),
        CategoryCommands::Add { name } => commands::category::add(store, name, output).await,
        CategoryCommands::Rename { id, name } => {
            commands::category::rename(store, id, name, output).await
        }
        CategoryCommands::Delete { id, yes } => {
            commands::category::delete(store, id, yes, output).await
        }
        CategoryCommands::Reorder { ids } => commands::category::reorder(store, ids, output).await,
    }
}

async fn handle_bookmark_command(
    command: BookmarkCommands,
    store: &mut Store,
    output: &Output,
) -> Result<()> {
    match command {
        BookmarkCommands::Add { fields } => {
            let (fields, edit_notes) = fields.split();
            commands::bookmark::add(store, fields, edit_notes, output).await
        }
        BookmarkCommands::Edit { id, fields } => {
            let (fields, edit_notes) = fields.split();
            commands::bookmark::edit(store, id, fields, edit_notes, output).await
        }
        BookmarkCommands::Delete { id, yes } => {
            commands::bookmark::delete(store, id, yes, output).await
        }
        BookmarkCommands::Show { id } => commands::bookmark::show(store, id, output),
        BookmarkCommands::Open { id } => commands::bookmark::open(store, id, output),
        BookmarkCommands::Reorder { ids } => commands::bookmark::reorder(store, ids, output).await,
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<shelf_core::Error>()
        .is_some_and(shelf_core::Error::is_not_found)
}
