//! Command-line interface for twentyq.

use clap::{Parser, Subcommand};

/// twentyq — terminal client for a character guessing engine
#[derive(Parser, Debug)]
#[command(name = "twentyq")]
#[command(about = "Play twenty questions against a guessing engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Engine API base URL (overrides env and config file)
    #[arg(long, global = true)]
    pub server_url: Option<String>,

    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<std::path::PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play the game in the terminal
    Play,

    /// Show engine statistics
    Stats,

    /// List the characters the engine knows
    Characters,

    /// List the engine's question pool
    Questions,

    /// Add a question to the engine's pool
    AddQuestion {
        /// Question text
        text: String,

        /// Optional category
        #[arg(short, long)]
        category: Option<String>,
    },
}
