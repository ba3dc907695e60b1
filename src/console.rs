//! Line-based console front end.
//!
//! Reads commands from stdin and prints the board whenever the game state
//! machine publishes a snapshot.

use anyhow::Result;
use neon_ttt::{
    GameMode, GameOptions, GameSnapshot, GameStateMachine, Mark, MoveResult, NeonConfig, Outcome,
    Position, RoomSnapshot, RoomStore, RoomSyncService, RoomUpdate, SharedGame,
    schedule_computer_reply,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Environment variable consulted when neither the flag nor the config names the player.
pub const PLAYER_NAME_ENV: &str = "NEON_TTT_PLAYER";

/// How this client enters a room.
#[derive(Debug, Clone)]
pub enum RoomEntry {
    /// Create a new room.
    Host,
    /// Join the room with this id.
    Join(String),
}

/// Picks the display name: command-line flag, then config file, then environment.
///
/// An empty result lets the room fall back to its default names.
pub fn resolve_player_name(flag: Option<String>, config: &NeonConfig) -> String {
    flag.filter(|name| !name.trim().is_empty())
        .or_else(|| Some(config.player_name().clone()).filter(|name| !name.trim().is_empty()))
        .or_else(|| std::env::var(PLAYER_NAME_ENV).ok())
        .unwrap_or_default()
}

/// Plays against the computer until the user quits or stdin closes.
#[instrument(skip(config))]
pub async fn play_vs_computer(config: &NeonConfig, mark: Mark) -> Result<()> {
    let (snapshot_tx, snapshot_rx) = mpsc::unbounded_channel();
    let mut machine = GameStateMachine::new();
    machine.set_observer(snapshot_tx);
    let game: SharedGame = Arc::new(Mutex::new(machine));
    let renderer = tokio::spawn(render_snapshots(snapshot_rx));

    let options = GameOptions::default()
        .with_difficulty(*config.difficulty())
        .with_local_mark(mark);
    println!(
        "Playing {} against the {} computer. Enter 1-9 or a cell name, n for a new game, q to quit.",
        mark,
        config.difficulty()
    );
    lock(&game).init(GameMode::VsComputer, options.clone());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        match input {
            "" => continue,
            "q" | "quit" => break,
            "n" | "new" => {
                lock(&game).init(GameMode::VsComputer, options.clone());
                continue;
            }
            _ => {}
        }

        let Some(position) = Position::parse_input(input) else {
            println!("Unknown cell '{}'. Use 1-9 or a name like top-left.", input);
            continue;
        };

        let result = lock(&game).apply_move(position.to_index());
        match result {
            MoveResult::NoOp => println!("That move is not available right now."),
            MoveResult::OpponentDue(token) => {
                // Fire and forget: a reply for a game replaced meanwhile is discarded.
                schedule_computer_reply(Arc::clone(&game), token, config.computer_delay());
            }
            MoveResult::Placed | MoveResult::Ended(_) => {}
        }
    }

    info!("Leaving game");
    drop(game);
    renderer.abort();
    Ok(())
}

/// Hosts or joins a room and plays through it until the user quits, stdin
/// closes or the room disappears.
#[instrument(skip(config, store))]
pub async fn play_room(
    config: &NeonConfig,
    store: Arc<dyn RoomStore>,
    entry: RoomEntry,
) -> Result<()> {
    let mut service = RoomSyncService::new(store, config.sync_config());
    let name = config.player_name().as_str();

    let (room_id, mark, seated) = match entry {
        RoomEntry::Host => {
            let info = service.create_room(name)?;
            println!("Room {} created. You play {}.", info.room_id, info.mark);
            println!("Share this link: {}", info.share_url);
            println!("Waiting for an opponent...");
            (info.room_id, info.mark, None)
        }
        RoomEntry::Join(room_id) => {
            let info = service.join_room(&room_id, name)?;
            println!(
                "Joined room {} hosted by {}. You play {}.",
                info.room_id, info.host_name, info.mark
            );
            (info.room_id, info.mark, Some(info.snapshot))
        }
    };

    let (snapshot_tx, snapshot_rx) = mpsc::unbounded_channel();
    let renderer = tokio::spawn(render_snapshots(snapshot_rx));
    let mut game = room_game(&room_id, mark, seated.as_ref(), snapshot_tx);

    let (update_tx, mut update_rx) = mpsc::unbounded_channel();
    service.poll_for_updates(&room_id, move |update| {
        if update_tx.send(update).is_err() {
            debug!("Console gone, dropping room update");
        }
    })?;

    let help = if service.is_host() {
        "Enter 1-9 or a cell name, r to restart, q to leave."
    } else {
        "Enter 1-9 or a cell name, q to leave."
    };
    println!("{}", help);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut room_open = true;
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let input = line.trim();
                match input {
                    "" => {}
                    "q" | "quit" => break,
                    "r" | "restart" => match service.restart_room(&room_id) {
                        Ok(snapshot) => {
                            game.reconcile(&snapshot);
                        }
                        Err(e) => println!("{}", e),
                    },
                    _ => match Position::parse_input(input) {
                        Some(position) => match service.apply_move(&room_id, position.to_index()) {
                            Ok(snapshot) => {
                                game.reconcile(&snapshot);
                            }
                            Err(e) => println!("{}", e),
                        },
                        None => println!("Unknown cell '{}'. {}", input, help),
                    },
                }
            }
            Some(update) = update_rx.recv() => match update {
                RoomUpdate::PlayerJoined { opponent_name } => {
                    println!("{} joined the room.", opponent_name);
                }
                RoomUpdate::PlayerLeft => println!("Your opponent left. Waiting for someone new..."),
                RoomUpdate::StateUpdate { snapshot, .. } => {
                    game.reconcile(&snapshot);
                }
                RoomUpdate::Error(e) => {
                    println!("The room is gone ({}).", e);
                    room_open = false;
                    break;
                }
            },
        }
    }

    if room_open && let Err(e) = service.leave_room(&room_id) {
        warn!(room_id = %room_id, error = %e, "Failed to leave room");
    }
    drop(game);
    renderer.abort();
    Ok(())
}

/// Local mirror of a room. A guest starts from the board it was seated on,
/// since the moves written before it joined are older than its poll cursor.
fn room_game(
    room_id: &str,
    mark: Mark,
    seated: Option<&RoomSnapshot>,
    observer: mpsc::UnboundedSender<GameSnapshot>,
) -> GameStateMachine {
    let mut game = GameStateMachine::new();
    game.set_observer(observer);
    game.init(
        GameMode::SharedRoom,
        GameOptions::default()
            .with_local_mark(mark)
            .with_room(room_id),
    );
    if let Some(snapshot) = seated {
        game.reconcile(snapshot);
    }
    game
}

/// Prints every published snapshot until the sender is dropped.
async fn render_snapshots(mut snapshots: mpsc::UnboundedReceiver<GameSnapshot>) {
    while let Some(snapshot) = snapshots.recv().await {
        println!("\n{}\n{}", snapshot.board(), status_line(&snapshot));
    }
}

fn status_line(snapshot: &GameSnapshot) -> String {
    match snapshot.outcome() {
        Some(Outcome::Tie) => "Tie game.".to_string(),
        Some(Outcome::Winner(mark)) if mark == snapshot.local_mark() => {
            match snapshot.winning_triple() {
                Some(triple) => format!("You win with {:?}!", triple.map(|i| i + 1)),
                None => "You win!".to_string(),
            }
        }
        Some(Outcome::Winner(mark)) => format!("{} wins.", mark),
        None if *snapshot.is_local_turn() => {
            format!("Your move ({}).", snapshot.active_mark())
        }
        None if *snapshot.mode() == Some(GameMode::VsComputer) => {
            "Computer is thinking...".to_string()
        }
        None => "Waiting for your opponent...".to_string(),
    }
}

fn lock(game: &SharedGame) -> MutexGuard<'_, GameStateMachine> {
    game.lock().unwrap_or_else(PoisonError::into_inner)
}
