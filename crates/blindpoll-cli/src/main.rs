//! Blind poll CLI
//!
//! Command-line front end for a poll kept in a local JSON document. Drives the
//! same widget and submission pipeline as the interactive page, with the
//! file store and console notifier injected.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;

use commands::{init, show, vote};
use config::CliConfig;

#[derive(Parser)]
#[command(name = "blindpoll")]
#[command(about = "Blind poll - vote with one-time auth keys", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path
    #[arg(short, long, global = true, default_value = ".blindpoll/config.toml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a poll document
    Init {
        /// Item names in display order
        #[arg(short, long, value_delimiter = ',', required = true)]
        items: Vec<String>,

        /// Auth keys to issue
        #[arg(short, long, value_delimiter = ',')]
        keys: Vec<String>,

        /// Replace an existing document
        #[arg(short, long)]
        force: bool,
    },

    /// Show poll items and vote counts
    Show,

    /// Cast a vote
    Vote {
        /// Auth key
        #[arg(short, long)]
        key: String,

        /// Item to vote for; repeat for each checked item
        #[arg(long = "choice", required = true)]
        choices: Vec<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    let config = CliConfig::load(&cli.config)?;
    tracing::debug!(
        store = %config.store_path.display(),
        poll = %config.poll_id,
        "configuration loaded"
    );

    match cli.command {
        Commands::Init { items, keys, force } => {
            init::run(&config, &items, &keys, force).await?;
        }

        Commands::Show => {
            show::run(&config).await?;
        }

        Commands::Vote { key, choices } => {
            vote::run(&config, &choices, &key).await?;
        }
    }

    Ok(())
}
