//! lichen-curator - curate a taxonomic database of lichens
//!
//! Browse, add and edit taxa, synonyms and substrates stored in a local
//! SQLite file; back the database up as a SQL dump and restore it.
//!
//! CHANGELOG:
//! - 10/18/2026 - config command, vernacular names, synonym authors
//! - 10/18/2026 - Initial CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use lichen_curator::commands;
use lichen_curator::config::{default_config_path, resolve_db_path, Config};
use lichen_curator::db::SqlHelper;
use lichen_curator::output::{self, OutputControls};
use lichen_curator::taxa::{NewTaxon, TaxonEdit};

/// Curate a taxonomic database of lichens.
#[derive(Parser, Debug)]
#[command(name = "lichen-curator")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Database file (overrides LICHEN_DB_PATH and the config file)
    #[arg(long, global = true)]
    db: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Compact JSON output (no whitespace)
    #[arg(long, global = true)]
    compact: bool,

    /// Comma-separated field allowlist for JSON output
    #[arg(long, global = true)]
    fields: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the schema and seed taxon levels and statuses
    Init,

    /// Browse and edit taxa
    Taxa {
        #[command(subcommand)]
        action: TaxaAction,
    },

    /// Manage synonyms (other names) of a taxon
    Synonyms {
        #[command(subcommand)]
        action: SynonymAction,
    },

    /// Manage substrate types
    Substrates {
        #[command(subcommand)]
        action: SubstrateAction,
    },

    /// Count the rows of a table
    Count {
        /// Table name
        table: String,
    },

    /// Delete every row of one or more tables
    Clean {
        /// Tables, cleaned in the given order
        #[arg(required = true)]
        tables: Vec<String>,

        /// Clean all tables or none
        #[arg(long)]
        atomic: bool,
    },

    /// Export the database as a SQL dump
    Export {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Restore a SQL dump into an empty database
    Import {
        /// Dump file
        input: PathBuf,
    },

    /// Show or change the saved configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show the config file and the database in use
    Show,

    /// Remember the database file to use by default
    SetDb {
        /// Database file
        path: String,
    },
}

#[derive(Subcommand, Debug)]
enum TaxaAction {
    /// List taxa
    List {
        /// Only this level (e.g. Genus, Species)
        #[arg(short, long)]
        level: Option<String>,
    },

    /// Show a taxon and its synonyms
    Show {
        /// Exact taxon name
        name: String,
    },

    /// List taxa as "(Level) name" labels
    Labels,

    /// Add a taxon
    Add {
        /// Taxon name
        name: String,

        /// Taxon level (e.g. Genus, Species)
        #[arg(short, long)]
        level: String,

        /// Author citation
        #[arg(short, long)]
        author: Option<String>,

        /// Status (default: accepted)
        #[arg(short, long)]
        status: Option<String>,

        /// Parent taxon name or "(Level) name" label
        #[arg(short, long)]
        parent: Option<String>,

        /// English name
        #[arg(long)]
        english_name: Option<String>,

        /// Local (vernacular) name
        #[arg(long)]
        local_name: Option<String>,

        /// Synonym to record with the taxon (repeatable)
        #[arg(long = "synonym")]
        synonyms: Vec<String>,

        /// Author of the synonym at the same position (repeatable)
        #[arg(long = "synonym-author")]
        synonym_authors: Vec<String>,
    },

    /// Edit a taxon
    Edit {
        /// Taxon id
        id: i64,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New author citation (empty to clear)
        #[arg(long)]
        author: Option<String>,

        /// New status
        #[arg(long)]
        status: Option<String>,

        /// New English name (empty to clear)
        #[arg(long)]
        english_name: Option<String>,

        /// New local name (empty to clear)
        #[arg(long)]
        local_name: Option<String>,
    },

    /// Find taxa and synonyms by approximate name
    Find {
        /// Name or part of a name
        query: String,

        /// Max results
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },
}

#[derive(Subcommand, Debug)]
enum SynonymAction {
    /// Add synonyms to a taxon
    Add {
        /// Taxon name or "(Level) name" label
        taxon: String,

        /// Synonyms
        #[arg(required = true)]
        names: Vec<String>,

        /// Author of the synonym at the same position (repeatable)
        #[arg(short, long = "author")]
        authors: Vec<String>,
    },

    /// List synonyms of a taxon
    List {
        /// Taxon name
        taxon: String,
    },

    /// Remove a synonym by id
    Remove {
        /// Synonym id
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
enum SubstrateAction {
    /// List substrates
    List,

    /// Add a substrate
    Add {
        /// Substrate name
        name: String,
    },

    /// Rename a substrate
    Rename {
        /// Substrate id
        id: i64,

        /// New name
        name: String,
    },

    /// Delete a substrate
    Delete {
        /// Substrate id
        id: i64,
    },
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let output_controls = OutputControls {
        json: cli.json,
        compact: cli.compact,
        fields: cli.fields.clone(),
    };

    match run(cli, &output_controls) {
        Ok(()) => ExitCode::from(0),
        Err(e) => {
            if output_controls.json {
                println!("{}", output::format_error(&e));
            } else {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli, out: &OutputControls) -> Result<()> {
    // Config commands work without opening the database.
    let command = match cli.command {
        Command::Config { action } => return run_config(action, cli.db.as_deref(), out),
        command => command,
    };

    let config = Config::load_default()?;
    let db_path = resolve_db_path(cli.db.as_deref(), &config);
    let helper = open_helper(&db_path)?;

    match command {
        Command::Init => commands::setup::init(&helper, out),

        Command::Taxa { action } => match action {
            TaxaAction::List { level } => commands::taxa::list(&helper, level.as_deref(), out),
            TaxaAction::Show { name } => commands::taxa::show(&helper, &name, out),
            TaxaAction::Labels => commands::taxa::labels(&helper, out),
            TaxaAction::Add {
                name,
                level,
                author,
                status,
                parent,
                english_name,
                local_name,
                synonyms,
                synonym_authors,
            } => {
                let new = NewTaxon {
                    name,
                    author,
                    level,
                    status,
                    parent,
                    english_name,
                    local_name,
                    synonyms,
                    synonym_authors,
                };
                commands::taxa::add(&helper, &new, out)
            }
            TaxaAction::Edit { id, name, author, status, english_name, local_name } => {
                let edit = TaxonEdit { name, author, status, english_name, local_name };
                commands::taxa::edit(&helper, id, &edit, out)
            }
            TaxaAction::Find { query, limit } => commands::taxa::find(&helper, &query, limit, out),
        },

        Command::Synonyms { action } => match action {
            SynonymAction::Add { taxon, names, authors } => {
                commands::synonyms::add(&helper, &taxon, &names, &authors, out)
            }
            SynonymAction::List { taxon } => commands::synonyms::list(&helper, &taxon, out),
            SynonymAction::Remove { id } => commands::synonyms::remove(&helper, id, out),
        },

        Command::Substrates { action } => match action {
            SubstrateAction::List => commands::substrates::list(&helper, out),
            SubstrateAction::Add { name } => commands::substrates::add(&helper, &name, out),
            SubstrateAction::Rename { id, name } => {
                commands::substrates::rename(&helper, id, &name, out)
            }
            SubstrateAction::Delete { id } => commands::substrates::delete(&helper, id, out),
        },

        Command::Count { table } => commands::maintenance::count(&helper, &table, out),
        Command::Clean { tables, atomic } => {
            commands::maintenance::clean(&helper, &tables, atomic, out)
        }

        Command::Export { output } => commands::backup::export(&helper, output.as_deref(), out),
        Command::Import { input } => commands::backup::import(&helper, &input, out),
        Command::Config { action } => run_config(action, cli.db.as_deref(), out),
    }
}

fn run_config(action: ConfigAction, db_flag: Option<&str>, out: &OutputControls) -> Result<()> {
    let config_path = default_config_path();
    match action {
        ConfigAction::Show => commands::config::show(&config_path, db_flag, out),
        ConfigAction::SetDb { path } => commands::config::set_db(&config_path, &path, out),
    }
}

/// Open the database, creating its directory on first use.
fn open_helper(path: &Path) -> Result<SqlHelper> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }
    SqlHelper::open(path).with_context(|| format!("Failed to open database at {:?}", path))
}
