mod config;
mod prompts;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;

use promptbook_core::{BoardError, Database, StoreError};
use promptbook_logging::LogFormat;

use crate::config::AppConfig;
use crate::prompts::{handle_prompts_command, PromptsAction};

#[derive(Parser, Debug)]
#[command(
    name = "promptbook",
    about = "Store, search and edit text prompts",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: PromptsAction,

    /// Path to the prompt database (default: ~/.local/share/promptbook/promptbook.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Working directory used to find promptbook.toml (default: current directory)
    #[arg(short = 'd', long, global = true)]
    working_dir: Option<PathBuf>,

    /// Tracing filter, e.g. "info" or "promptbook_db=debug"
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormatChoice>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        // Validation and missing-prompt errors carry their own wording;
        // storage failures keep the full context chain.
        let message = match (err.downcast_ref::<BoardError>(), err.downcast_ref::<StoreError>()) {
            (Some(BoardError::Store(StoreError::Storage(_))), _) | (_, Some(StoreError::Storage(_))) => {
                format!("{:#}", err)
            }
            (Some(board_err), _) => board_err.user_message(),
            (_, Some(store_err)) => store_err.user_message(),
            _ => format!("{:#}", err),
        };
        eprintln!("{} {}", "error:".red().bold(), message);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Determine working directory
    let working_dir = match cli.working_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    let config = AppConfig::load(&working_dir)?.unwrap_or_default();

    promptbook_logging::init_tracing(
        config.log_level(cli.log_level.as_deref()),
        config.log_format(cli.log_format.map(Into::into)),
    );

    let db_path = config.database_path(cli.db.as_deref());
    let db = Database::open_at(&db_path)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;

    handle_prompts_command(&db, cli.command, &config)
}
