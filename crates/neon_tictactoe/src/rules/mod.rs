//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`]. The outcome is derived from board
//! contents alone; nothing here tracks whose turn it is.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{WINNING_TRIPLES, Triple, check_winner, winning_triple};

use crate::{Board, Outcome};
use tracing::instrument;

/// Evaluates the board.
///
/// Returns the winner if any triple holds three equal marks, `Tie` if the
/// board is full otherwise, and `None` while the game can continue.
#[instrument(level = "trace")]
pub fn evaluate_outcome(board: &Board) -> Option<Outcome> {
    if let Some(mark) = check_winner(board) {
        return Some(Outcome::Winner(mark));
    }
    if is_full(board) {
        return Some(Outcome::Tie);
    }
    None
}
