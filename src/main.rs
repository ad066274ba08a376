//! twentyq — terminal client for a character guessing engine.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use tracing::info;
use tracing_subscriber::EnvFilter;
use twentyq::client::EngineClient;
use twentyq::config::ClientConfig;
use twentyq::protocol::NewQuestion;
use twentyq::tui::run_tui;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = ClientConfig::resolve(cli.server_url, cli.config.as_deref())?;

    match cli.command {
        Command::Play => run_tui(&config).await,
        Command::Stats => run_stats(&config).await,
        Command::Characters => run_characters(&config).await,
        Command::Questions => run_questions(&config).await,
        Command::AddQuestion { text, category } => run_add_question(&config, text, category).await,
    }
}

/// Initializes stdout logging for the non-TUI commands.
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
}

/// Prints aggregate engine statistics.
async fn run_stats(config: &ClientConfig) -> Result<()> {
    init_logging();
    let client = EngineClient::new(config.server_url());
    let stats = client.get_stats().await?;

    println!("Engine statistics ({})", client.base_url());
    println!("  Total games:      {}", stats.total_games);
    println!("  Total characters: {}", stats.total_characters);
    println!("  Total questions:  {}", stats.total_questions);
    println!("  Success rate:     {}%", stats.success_rate);
    Ok(())
}

/// Lists stored characters with their guess statistics.
async fn run_characters(config: &ClientConfig) -> Result<()> {
    init_logging();
    let client = EngineClient::new(config.server_url());
    let characters = client.get_characters().await?;

    println!("Characters ({})", characters.len());
    for character in characters {
        let rate = if character.times_guessed > 0 {
            format!(
                "{:.1}%",
                character.times_correct as f64 / character.times_guessed as f64 * 100.0
            )
        } else {
            "n/a".to_string()
        };
        println!(
            "  {:<24} guessed {:>4}  correct {:>4}  rate {}",
            character.name, character.times_guessed, character.times_correct, rate
        );
    }
    Ok(())
}

/// Lists the engine's question pool.
async fn run_questions(config: &ClientConfig) -> Result<()> {
    init_logging();
    let client = EngineClient::new(config.server_url());
    let questions = client.get_questions().await?;

    println!("Questions ({})", questions.len());
    for question in questions {
        println!(
            "  {:<48} category {:<12} asked {:>4}  info {:.2}",
            question.text,
            question.category.as_deref().unwrap_or("-"),
            question.times_asked,
            question.information_value
        );
    }
    Ok(())
}

/// Adds a question to the engine's pool.
async fn run_add_question(
    config: &ClientConfig,
    text: String,
    category: Option<String>,
) -> Result<()> {
    init_logging();
    let client = EngineClient::new(config.server_url());
    client.add_question(&NewQuestion { text, category }).await?;

    info!("Question added");
    println!("Question added.");
    Ok(())
}
