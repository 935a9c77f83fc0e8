//! Kwazam - terminal front end
//!
//! Play, inspect saved games and read the rules.

#![warn(missing_docs)]

mod cli;
mod config;
mod render;
mod repl;
mod rules;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use config::KwazamConfig;
use kwazam::{Game, GameState, persistence};
use render::View;
use repl::Repl;
use std::path::Path;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = KwazamConfig::load_or_default(&cli.config)?;
    init_tracing(config.log_filter());

    match cli.command {
        Command::Play { load } => run_play(&config, load.as_deref()),
        Command::Show { path, json } => run_show(&path, json),
        Command::Rules => {
            print!("{}", rules::RULES);
            Ok(())
        }
    }
}

/// Logs go to stderr so they never interleave with the board on stdout.
fn init_tracing(fallback: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Run an interactive game on stdin/stdout
#[instrument(skip(config))]
fn run_play(config: &KwazamConfig, load: Option<&Path>) -> Result<()> {
    let mut game = Game::new(config.save_store());
    if let Some(path) = load {
        game.load(path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
    }
    info!(save_dir = %config.save_dir().display(), "Starting game");

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut repl = Repl::new(game, stdin.lock(), stdout.lock(), *config.flip_board());
    repl.run()
}

/// Print a saved game as a board diagram or JSON
#[instrument]
fn run_show(path: &Path, json: bool) -> Result<()> {
    let snapshot = persistence::read_snapshot(path)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let history_len = snapshot.history.len();
    let mut state = GameState::new();
    state.restore(snapshot);
    print!("{}", render::board(&state, &View::default()));
    println!("{}", render::status(&state));
    println!("{} pieces, {} moves played.", state.pieces().len(), history_len);
    Ok(())
}
