//! Local game state machine.

use super::snapshot::GameState;
use super::{GameMode, GameOptions, GameSnapshot, GameStatus};
use crate::rooms::RoomSnapshot;
use neon_tictactoe::{Board, DecisionEngine, Mark, Outcome, evaluate_outcome, winning_triple};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, instrument};

/// Permission to play one deferred computer move.
///
/// Bound to the game that issued it: once that game is reset the token goes
/// stale and the move is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReplyToken {
    generation: u64,
}

impl ReplyToken {
    /// Generation of the game that issued the token.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of a move attempt. Rejections are values, never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    /// The move was ignored: inactive game, taken cell, not the local
    /// player's turn, or a stale computer reply. The board is unchanged.
    NoOp,
    /// The mark was placed and the game goes on.
    Placed,
    /// The mark was placed and the computer should reply after its delay.
    OpponentDue(ReplyToken),
    /// The mark was placed and ended the game.
    Ended(Outcome),
}

/// Owns one player's local view of a game.
///
/// Mutated only through [`init`](Self::init), [`apply_move`](Self::apply_move),
/// [`play_computer_reply`](Self::play_computer_reply) and
/// [`reconcile`](Self::reconcile). Every change is pushed to the observer,
/// when one is attached.
#[derive(Debug)]
pub struct GameStateMachine {
    state: GameState,
    engine: DecisionEngine,
    generation: u64,
    observer: Option<UnboundedSender<GameSnapshot>>,
}

impl GameStateMachine {
    /// Creates an idle machine with an OS-seeded computer opponent.
    pub fn new() -> Self {
        Self::with_engine(DecisionEngine::new())
    }

    /// Creates an idle machine around the given engine.
    pub fn with_engine(engine: DecisionEngine) -> Self {
        Self {
            state: GameState::idle(),
            engine,
            generation: 0,
            observer: None,
        }
    }

    /// Sends a snapshot to `observer` after every change.
    pub fn set_observer(&mut self, observer: UnboundedSender<GameSnapshot>) {
        self.observer = Some(observer);
    }

    /// Current state.
    pub fn snapshot(&self) -> GameSnapshot {
        self.state.snapshot(self.generation)
    }

    /// Current lifecycle stage.
    pub fn status(&self) -> GameStatus {
        self.state.status()
    }

    /// Starts a new game, discarding the previous one.
    ///
    /// `X` always opens. Against the computer, if the local player holds `O`
    /// the computer's opening move is played before this returns.
    #[instrument(skip(self))]
    pub fn init(&mut self, mode: GameMode, options: GameOptions) -> GameSnapshot {
        self.generation += 1;
        self.state = GameState {
            board: Board::new(),
            active_mark: Mark::FIRST,
            mode: Some(mode),
            difficulty: options.difficulty,
            local_mark: options.local_mark,
            room_id: options.room_id,
            is_local_turn: options.local_mark == Mark::FIRST,
            is_active: true,
            outcome: None,
            winning_triple: None,
        };
        info!(generation = self.generation, %mode, "Game started");

        if mode == GameMode::VsComputer && !self.state.is_local_turn {
            debug!("Computer opens");
            self.computer_move();
        }

        self.publish();
        self.snapshot()
    }

    /// Plays the active mark at `index` for the local player.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn apply_move(&mut self, index: usize) -> MoveResult {
        if !self.state.is_active || !self.state.board.is_empty(index) {
            debug!("Ignored: game inactive or cell taken");
            return MoveResult::NoOp;
        }
        if self.state.mode == Some(GameMode::VsComputer) && !self.state.is_local_turn {
            debug!("Ignored: computer to move");
            return MoveResult::NoOp;
        }

        let result = self.place_active(index);
        self.publish();
        result
    }

    /// Plays the computer's deferred move if `token` still refers to the
    /// current game and the computer is due.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn play_computer_reply(&mut self, token: ReplyToken) -> MoveResult {
        let due = token.generation == self.generation
            && self.state.mode == Some(GameMode::VsComputer)
            && self.state.is_active
            && !self.state.is_local_turn;
        if !due {
            debug!(token = token.generation, "Discarding stale computer reply");
            return MoveResult::NoOp;
        }

        let result = self.computer_move();
        self.publish();
        result
    }

    /// Copies a remote room state over the local one without re-validating
    /// it. In shared-room mode the local turn flag follows the active mark.
    #[instrument(skip(self, remote), fields(active = %remote.active_mark))]
    pub fn reconcile(&mut self, remote: &RoomSnapshot) -> GameSnapshot {
        self.state.board = remote.board;
        self.state.active_mark = remote.active_mark;
        self.state.outcome = remote.outcome;
        self.state.winning_triple = remote.winning_triple;
        self.state.is_active = remote.is_active;
        if self.state.mode == Some(GameMode::SharedRoom) {
            self.state.is_local_turn = remote.active_mark == self.state.local_mark;
        }
        debug!(is_local_turn = self.state.is_local_turn, "Reconciled with room");

        self.publish();
        self.snapshot()
    }

    fn computer_move(&mut self) -> MoveResult {
        let state = &self.state;
        let Some(index) = self.engine.select_move(
            &state.board,
            state.difficulty,
            state.local_mark,
            state.computer_mark(),
        ) else {
            return MoveResult::NoOp;
        };
        debug!(index, "Computer plays");
        self.place_active(index)
    }

    fn place_active(&mut self, index: usize) -> MoveResult {
        let mark = self.state.active_mark;
        if !self.state.board.place(index, mark) {
            return MoveResult::NoOp;
        }

        if let Some(outcome) = evaluate_outcome(&self.state.board) {
            self.state.is_active = false;
            self.state.outcome = Some(outcome);
            self.state.winning_triple = winning_triple(&self.state.board);
            info!(%outcome, "Game ended");
            return MoveResult::Ended(outcome);
        }

        self.state.active_mark = mark.opponent();
        if self.state.mode == Some(GameMode::VsComputer) {
            self.state.is_local_turn = !self.state.is_local_turn;
            if !self.state.is_local_turn {
                return MoveResult::OpponentDue(ReplyToken {
                    generation: self.generation,
                });
            }
        }
        MoveResult::Placed
    }

    fn publish(&self) {
        if let Some(observer) = &self.observer
            && observer.send(self.snapshot()).is_err()
        {
            debug!("Observer gone");
        }
    }
}

impl Default for GameStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
