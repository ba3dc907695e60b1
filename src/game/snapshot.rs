//! Read-only views of a local game.

use derive_getters::Getters;
use neon_tictactoe::{Board, Difficulty, Mark, Outcome, Triple};
use serde::{Deserialize, Serialize};

/// Who the local player is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    /// Local game against the computer.
    #[display("local-vs-ai")]
    VsComputer,
    /// Two clients sharing a room.
    #[display("shared-room")]
    SharedRoom,
}

/// Lifecycle of a local game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// No game started yet.
    Idle,
    /// Moves are accepted.
    InProgress,
    /// The game has ended.
    Terminal,
}

/// Settings for a new game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOptions {
    /// Strength of the computer opponent.
    pub difficulty: Difficulty,
    /// Mark played from this client. The computer takes the other one.
    pub local_mark: Mark,
    /// Room the game is mirrored from, in shared-room mode.
    pub room_id: Option<String>,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            local_mark: Mark::FIRST,
            room_id: None,
        }
    }
}

impl GameOptions {
    /// Options with the given difficulty.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Options with the given local mark.
    pub fn with_local_mark(mut self, mark: Mark) -> Self {
        self.local_mark = mark;
        self
    }

    /// Options bound to a room.
    pub fn with_room(mut self, room_id: impl Into<String>) -> Self {
        self.room_id = Some(room_id.into());
        self
    }
}

/// Copy of the local game state handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct GameSnapshot {
    board: Board,
    active_mark: Mark,
    mode: Option<GameMode>,
    difficulty: Difficulty,
    local_mark: Mark,
    computer_mark: Mark,
    room_id: Option<String>,
    is_local_turn: bool,
    is_active: bool,
    outcome: Option<Outcome>,
    winning_triple: Option<Triple>,
    status: GameStatus,
    generation: u64,
}

/// Mutable state behind a [`GameSnapshot`], owned by the state machine.
#[derive(Debug, Clone)]
pub(super) struct GameState {
    pub(super) board: Board,
    pub(super) active_mark: Mark,
    pub(super) mode: Option<GameMode>,
    pub(super) difficulty: Difficulty,
    pub(super) local_mark: Mark,
    pub(super) room_id: Option<String>,
    pub(super) is_local_turn: bool,
    pub(super) is_active: bool,
    pub(super) outcome: Option<Outcome>,
    pub(super) winning_triple: Option<Triple>,
}

impl GameState {
    pub(super) fn idle() -> Self {
        Self {
            board: Board::new(),
            active_mark: Mark::FIRST,
            mode: None,
            difficulty: Difficulty::default(),
            local_mark: Mark::FIRST,
            room_id: None,
            is_local_turn: true,
            is_active: false,
            outcome: None,
            winning_triple: None,
        }
    }

    /// The computer always takes the mark the local player does not.
    pub(super) fn computer_mark(&self) -> Mark {
        self.local_mark.opponent()
    }

    pub(super) fn status(&self) -> GameStatus {
        match (self.mode, self.is_active) {
            (None, _) => GameStatus::Idle,
            (Some(_), true) => GameStatus::InProgress,
            (Some(_), false) => GameStatus::Terminal,
        }
    }

    pub(super) fn snapshot(&self, generation: u64) -> GameSnapshot {
        GameSnapshot {
            board: self.board,
            active_mark: self.active_mark,
            mode: self.mode,
            difficulty: self.difficulty,
            local_mark: self.local_mark,
            computer_mark: self.computer_mark(),
            room_id: self.room_id.clone(),
            is_local_turn: self.is_local_turn,
            is_active: self.is_active,
            outcome: self.outcome,
            winning_triple: self.winning_triple,
            status: self.status(),
            generation,
        }
    }
}
