//! Neon tic-tac-toe - command-line client.

#![warn(missing_docs)]

mod cli;
mod console;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use neon_ttt::{FileStore, NeonConfig, RoomStore};
use std::sync::Arc;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    initialize_tracing();

    let mut config = NeonConfig::load_or_default(&cli.config)?;
    if let Some(dir) = cli.store_dir {
        config.set_store_dir(dir);
    }

    match cli.command {
        Command::Play { difficulty, mark } => {
            if let Some(difficulty) = difficulty {
                config.set_difficulty(difficulty);
            }
            console::play_vs_computer(&config, mark).await
        }
        Command::Host { name } => {
            config.set_player_name(console::resolve_player_name(name, &config));
            let store = open_store(&config)?;
            console::play_room(&config, store, console::RoomEntry::Host).await
        }
        Command::Join { room, name } => {
            config.set_player_name(console::resolve_player_name(name, &config));
            let room_id = neon_ttt::room_id_from_path(&room)
                .ok_or_else(|| anyhow::anyhow!("'{}' is not a room id or room link", room))?;
            let store = open_store(&config)?;
            console::play_room(&config, store, console::RoomEntry::Join(room_id)).await
        }
    }
}

#[instrument(skip(config))]
fn open_store(config: &NeonConfig) -> Result<Arc<dyn RoomStore>> {
    let store = FileStore::open(config.store_dir())?;
    info!(dir = %store.dir().display(), "Using shared room store");
    Ok(Arc::new(store))
}

/// Logs go to stderr so they do not interleave with the board on stdout.
fn initialize_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,neon_ttt=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
