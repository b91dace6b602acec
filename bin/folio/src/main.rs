//! Folio CLI
//!
//! Validates markdown content collections against their front matter schemas.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for Folio.
#[derive(Parser)]
#[command(
    name = "folio",
    version,
    about = "Schema-checked markdown content collections"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "folio.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Validate every document and report all schema violations
    Check {
        /// Only check this collection
        #[arg(short = 'C', long)]
        collection: Option<String>,
    },
    /// Validate collections and write the JSON manifest
    Build {
        /// Manifest output path
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
        /// Leave invalid documents out instead of failing
        #[arg(long)]
        skip_invalid: bool,
    },
    /// List a collection's chapters in order
    List {
        /// Collection to list
        #[arg(short = 'C', long)]
        collection: Option<String>,
    },
    /// Create a new chapter with valid front matter
    New {
        /// Path for the new chapter, relative to the collection directory
        path: std::path::PathBuf,
        /// Target collection
        #[arg(short = 'C', long)]
        collection: Option<String>,
        /// Chapter number (defaults to one past the highest)
        #[arg(short, long)]
        number: Option<i64>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    folio::init_tracing(cli.verbose);

    match cli.command {
        Commands::Check { collection } => {
            folio::cmd::check::run(&cli.config, collection.as_deref())?;
        }
        Commands::Build {
            output,
            skip_invalid,
        } => {
            folio::cmd::build::run(&cli.config, output.as_deref(), skip_invalid)?;
        }
        Commands::List { collection } => {
            folio::cmd::list::run(&cli.config, collection.as_deref())?;
        }
        Commands::New {
            path,
            collection,
            number,
        } => {
            folio::cmd::new::run(&cli.config, &path, collection.as_deref(), number)?;
        }
    }

    Ok(())
}
