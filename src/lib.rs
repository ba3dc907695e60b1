//! Neon tic-tac-toe.
//!
//! Play against the computer, or against a friend through a room record kept
//! in a shared store and kept in sync by polling.
//!
//! # Architecture
//!
//! - **Rules and computer opponent**: the [`neon_tictactoe`] crate
//! - **Game**: [`GameStateMachine`], one player's local view of a game
//! - **Rooms**: [`RoomSyncService`], create/join/move/restart/leave plus polling
//! - **Store**: [`RoomStore`] with in-memory and file-backed implementations
//!
//! # Example
//!
//! ```no_run
//! use neon_ttt::{GameMode, GameOptions, GameStateMachine, MoveResult};
//!
//! let mut game = GameStateMachine::new();
//! game.init(GameMode::VsComputer, GameOptions::default());
//! if let MoveResult::OpponentDue(token) = game.apply_move(4) {
//!     game.play_computer_reply(token);
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod game;
mod rooms;
mod store;

pub use config::{ConfigError, NeonConfig};
pub use error::ErrorLocation;

pub use game::{
    DEFAULT_COMPUTER_DELAY, GameMode, GameOptions, GameSnapshot, GameStateMachine, GameStatus,
    MoveResult, ReplyToken, SharedGame, schedule_computer_reply,
};

pub use rooms::{
    DEFAULT_GUEST_NAME, DEFAULT_HOST_NAME, DEFAULT_POLL_INTERVAL, JoinInfo, PollHandle,
    ROOM_ID_ALPHABET, ROOM_ID_LENGTH, ROOM_KEY_PREFIX, Role, RoomError, RoomInfo, RoomRecord,
    RoomSnapshot, RoomSyncService, RoomUpdate, SyncConfig, generate_room_id, is_room_id,
    room_id_from_path, room_key, share_url,
};

pub use store::{FileStore, MemoryStore, RoomStore, StoreError};

pub use neon_tictactoe::{
    Board, Cell, DecisionEngine, Difficulty, Mark, Outcome, Position, Triple, evaluate_outcome,
    winning_triple,
};
