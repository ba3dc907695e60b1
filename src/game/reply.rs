//! Deferred computer replies.

use super::{GameStateMachine, MoveResult, ReplyToken};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

/// Delay before the computer answers, so its move does not land instantly.
pub const DEFAULT_COMPUTER_DELAY: Duration = Duration::from_millis(600);

/// Game shared between the input loop and scheduled replies.
pub type SharedGame = Arc<Mutex<GameStateMachine>>;

/// Plays the computer's move after `delay`.
///
/// The task is never cancelled. Whether the move still applies is decided
/// when it fires: a token from a game that has since been reset or left
/// yields [`MoveResult::NoOp`]. Must be called inside a Tokio runtime.
#[instrument(skip(game))]
pub fn schedule_computer_reply(
    game: SharedGame,
    token: ReplyToken,
    delay: Duration,
) -> JoinHandle<MoveResult> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let result = game
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .play_computer_reply(token);
        debug!(?result, "Computer reply fired");
        result
    })
}
