//! Command-line interface for kwazam.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Kwazam - two-player chess variant on a 5×8 board
#[derive(Parser, Debug)]
#[command(name = "kwazam")]
#[command(about = "Play Kwazam in the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file (defaults apply if it does not exist)
    #[arg(long, global = true, default_value = "kwazam.toml")]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a game on this terminal (both players take turns at the prompt)
    Play {
        /// Resume from a save file
        #[arg(short, long)]
        load: Option<PathBuf>,
    },

    /// Print a saved game
    Show {
        /// Save file to read
        path: PathBuf,

        /// Print the decoded save as JSON instead of a board diagram
        #[arg(long)]
        json: bool,
    },

    /// Print the piece rules
    Rules,
}
