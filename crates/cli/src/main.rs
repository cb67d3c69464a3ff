//! Sleuth CLI: the main entry point.
//!
//! Commands:
//! - `research`    Research a single query, optionally saving the result
//! - `batch`       Research several queries with one agent (shared history)
//! - `interactive` Ask questions in a loop; follow-ups see earlier answers
//! - `init`        Write a default config file
//! - `config`      Show the effective configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "sleuth",
    about = "Sleuth: an LLM research agent with web search and encyclopedia tools",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging and round-by-round progress
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Research a single query
    Research {
        /// The question or topic to research
        query: String,

        /// Override the configured iteration limit
        #[arg(short = 'n', long)]
        max_iterations: Option<u32>,

        /// Write the plain-text result to this file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Research several queries in sequence with one agent
    Batch {
        /// Queries to research
        queries: Vec<String>,

        /// Read additional queries from a file, one per line
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Override the configured iteration limit
        #[arg(short = 'n', long)]
        max_iterations: Option<u32>,
    },

    /// Interactive research session
    Interactive {
        /// Override the configured iteration limit
        #[arg(short = 'n', long)]
        max_iterations: Option<u32>,
    },

    /// Write a default configuration file
    Init,

    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Research {
            query,
            max_iterations,
            save,
            json,
        } => {
            commands::research::run(query, max_iterations, save, json, cli.verbose).await?
        }
        Commands::Batch {
            queries,
            file,
            max_iterations,
        } => commands::batch::run(queries, file, max_iterations, cli.verbose).await?,
        Commands::Interactive { max_iterations } => {
            commands::interactive::run(max_iterations, cli.verbose).await?
        }
        Commands::Init => commands::init::run().await?,
        Commands::Config => commands::config_cmd::run().await?,
    }

    Ok(())
}
