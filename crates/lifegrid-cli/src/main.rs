//! lifegrid CLI - serve the Game of Life evolution API or run boards offline.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use config::Config;

/// lifegrid: evolve Conway's Game of Life boards as a service.
///
/// Run `lifegrid` or `lifegrid serve` to start the HTTP/WebSocket server.
#[derive(Parser, Debug)]
#[command(
    name = "lifegrid",
    author,
    version,
    about = "lifegrid: Game of Life evolution service",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP and streaming API (default command).
    Serve {
        /// Port to bind (overrides the PORT environment variable).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Advance a board from a JSON file without starting the server.
    Step {
        /// Path to a JSON file holding a dense 0/1 matrix.
        #[arg(short, long)]
        input: PathBuf,

        /// Number of generations to advance.
        #[arg(short, long, default_value_t = 1)]
        generations: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load();

    init_tracing(&config, cli.verbose);

    match cli.command {
        None => commands::serve::execute(&config, config.port).await,
        Some(Commands::Serve { port }) => {
            commands::serve::execute(&config, port.unwrap_or(config.port)).await
        }
        Some(Commands::Step { input, generations }) => {
            commands::step::execute(&input, generations)
        }
    }
}

fn init_tracing(config: &Config, verbose: bool) {
    let default = if verbose {
        "debug".to_string()
    } else {
        config.log_level.clone().unwrap_or_else(|| "info".to_string())
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
