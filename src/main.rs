//! # Unified Context CLI (`uctx`)
//!
//! Drives a [`ContextStore`](unified_context_core::store::ContextStore)
//! outside of any UI: a session script of inbound operations is replayed
//! against a fresh store and the resulting context is printed the way it
//! would be handed to an AI request.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `uctx replay <script>` | Replay a session script and print the unified context |
//! | `uctx check <script>` | Parse a session script without applying it |
//! | `uctx config` | Print the effective configuration |
//! | `uctx completions <shell>` | Generate a shell completion script |
//!
//! ## Examples
//!
//! ```bash
//! uctx replay session.jsonl
//! uctx replay session.jsonl --format json
//! uctx replay session.jsonl --type tag
//! uctx --config ./config/uctx.toml config
//! ```

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use unified_context::config::{self, OutputFormat};
use unified_context::replay::{run_check, run_replay, ReplayOptions};
use unified_context_core::models::ContextCategory;

const DEFAULT_CONFIG_PATH: &str = "./config/uctx.toml";

/// Unified Context CLI — assemble files, folders, tags, transcripts, and
/// search results into one ordered AI prompt context.
#[derive(Parser)]
#[command(
    name = "uctx",
    about = "Unified Context — replay context-store sessions and render the resulting AI prompt context",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/uctx.toml`; built-in defaults are used when
    /// that default file does not exist.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a session script and print the resulting context.
    ///
    /// The script is JSON Lines, one operation per line (`add_file`,
    /// `add_tag`, `set_current_file`, `remove`, `clock_set`, ...).
    Replay {
        /// Path to the session script.
        script: PathBuf,

        /// Output format; overrides `render.format` from the config.
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Print only one category's items (`file`, `folder`, `youtube`,
        /// `tag`, `captured_data`, `search`) instead of the unified view.
        #[arg(long = "type")]
        category: Option<ContextCategory>,
    },

    /// Parse a session script and report how many operations it holds.
    Check {
        /// Path to the session script.
        script: PathBuf,
    },

    /// Print the effective configuration as TOML.
    Config,

    /// Generate shell completions.
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_logging(filter: &str) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(env) => env,
        Err(_) => EnvFilter::try_new(filter)
            .with_context(|| format!("Invalid log.filter: '{}'", filter))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "uctx", &mut std::io::stdout());
        return Ok(());
    }

    let cfg = match &cli.config {
        Some(path) => config::load_or_default(path, false)?,
        None => config::load_or_default(&PathBuf::from(DEFAULT_CONFIG_PATH), true)?,
    };
    init_logging(&cfg.log.filter)?;

    match cli.command {
        Commands::Replay {
            script,
            format,
            category,
        } => {
            let output = run_replay(&cfg, &script, &ReplayOptions { format, category })?;
            println!("{}", output);
        }
        Commands::Check { script } => {
            let count = run_check(&script)?;
            println!("{}: {} operations OK", script.display(), count);
        }
        Commands::Config => {
            let text = toml::to_string(&cfg).context("Failed to serialize config")?;
            print!("{}", text);
        }
        Commands::Completions { .. } => unreachable!(),
    }

    Ok(())
}
