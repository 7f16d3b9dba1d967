use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quoteboard_cli::commands::{drain_notifications, execute, Command, CommandResult};
use quoteboard_cli::config::{endpoint_from_env, CliConfig};
use quoteboard_cli::repl;
use quoteboard_core::mock_remote::{self, MockRemote};
use quoteboard_core::tracing_setup::init_tracing_with_default;
use quoteboard_core::QuoteBoard;

#[derive(Parser)]
#[command(name = "quoteboard")]
#[command(about = "Display, collect and sync short quotes")]
struct Cli {
    /// Path to JSON config file (dataDir, sessionDir, endpoint, ...)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Directory for the durable quote collection
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Remote endpoint URL (overrides QUOTEBOARD_ENDPOINT and the config file)
    #[arg(long)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the last displayed quote (default)
    Show,

    /// Show a random quote from the current category
    Next,

    /// Add a quote
    Add {
        /// Quote text
        text: String,
        /// Category
        category: String,
    },

    /// List quotes in the current category
    List,

    /// List categories
    Categories,

    /// Select a category filter ("all" to clear)
    Filter {
        name: String,
    },

    /// Export every quote as pretty JSON
    Export {
        /// Output file (defaults to ./quotes.json)
        path: Option<PathBuf>,
    },

    /// Import quotes from a JSON array file
    Import {
        path: PathBuf,
    },

    /// Push the collection and merge new remote quotes once
    Sync,

    /// Interactive session with background sync
    Repl,

    /// Serve a mock remote endpoint at /posts
    ServeMock {
        #[arg(long, default_value = "127.0.0.1:3000")]
        bind: String,
    },
}

impl Commands {
    fn into_command(self) -> Option<Command> {
        let command = match self {
            Commands::Show => Command::Show,
            Commands::Next => Command::Next,
            Commands::Add { text, category } => Command::Add { text, category },
            Commands::List => Command::List,
            Commands::Categories => Command::Categories,
            Commands::Filter { name } => Command::Filter(name),
            Commands::Export { path } => Command::Export(path),
            Commands::Import { path } => Command::Import(path),
            Commands::Sync => Command::Sync,
            Commands::Repl | Commands::ServeMock { .. } => return None,
        };
        Some(command)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing_with_default("warn");
    let cli = Cli::parse();

    let file_config = match cli.config {
        Some(ref path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    let config = file_config.into_core_config(cli.data_dir, cli.endpoint, endpoint_from_env());

    let subcommand = cli.command.unwrap_or(Commands::Show);

    if let Commands::ServeMock { ref bind } = subcommand {
        println!("Serving mock remote on http://{bind}/posts");
        return mock_remote::serve(bind, MockRemote::new())
            .await
            .with_context(|| format!("Mock remote failed on {bind}"));
    }

    let board = QuoteBoard::open(config).context("Failed to open quote collection")?;

    let Some(command) = subcommand.into_command() else {
        return repl::run(board).await;
    };

    let engine = board
        .sync_engine()
        .context("Failed to build sync engine")?;

    let failed = match execute(&board, &engine, command).await {
        CommandResult::Lines(lines) => {
            lines.iter().for_each(|line| println!("{line}"));
            false
        }
        CommandResult::Failed(lines) => {
            lines.iter().for_each(|line| println!("{line}"));
            true
        }
        CommandResult::Quit => false,
    };

    for line in drain_notifications(&board) {
        eprintln!("{line}");
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}
