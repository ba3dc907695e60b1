//! Command-line interface for neon_ttt.

use clap::{Parser, Subcommand};
use neon_ttt::{Difficulty, Mark};
use std::path::PathBuf;

/// Neon tic-tac-toe - against the computer or a friend on a shared store
#[derive(Parser, Debug)]
#[command(name = "neon_ttt")]
#[command(about = "Tic-tac-toe against the computer or through a shared room", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = "neon_ttt.toml")]
    pub config: PathBuf,

    /// Directory holding shared room records (overrides the config file)
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play against the computer
    Play {
        /// Computer strength: easy, medium or hard
        #[arg(short, long)]
        difficulty: Option<Difficulty>,

        /// Your mark; X moves first
        #[arg(short, long, default_value = "X")]
        mark: Mark,
    },

    /// Create a room and wait for a friend
    Host {
        /// Display name shown to your opponent
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Join a friend's room
    Join {
        /// Room id or share link
        room: String,

        /// Display name shown to your opponent
        #[arg(short, long)]
        name: Option<String>,
    },
}
