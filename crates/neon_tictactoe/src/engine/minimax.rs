//! Exhaustive alpha-beta search.
//!
//! Terminal scores are not discounted by depth, so the search does not
//! prefer faster wins. Ties between root moves keep the lowest index.

use crate::{Board, Mark, Outcome, evaluate_outcome};
use tracing::trace;

/// Score of a position the searching side has won.
pub const WIN_SCORE: i32 = 10;
/// Score of a position the opponent has won.
pub const LOSS_SCORE: i32 = -10;
/// Score of a tied position.
pub const TIE_SCORE: i32 = 0;

/// Best index for `own` to play, or `None` on a full board.
pub fn best_move(board: &Board, own: Mark, opponent: Mark) -> Option<usize> {
    let mut scratch = *board;
    let mut best_score = i32::MIN;
    let mut best = None;

    for index in board.empty_cells() {
        scratch.place(index, own);
        let score = minimax(&mut scratch, false, i32::MIN, i32::MAX, own, opponent);
        scratch.clear(index);
        trace!(index, score, "Scored root move");

        if score > best_score {
            best_score = score;
            best = Some(index);
        }
    }

    best
}

fn minimax(
    board: &mut Board,
    maximizing: bool,
    mut alpha: i32,
    mut beta: i32,
    own: Mark,
    opponent: Mark,
) -> i32 {
    match evaluate_outcome(board) {
        Some(Outcome::Winner(mark)) if mark == own => return WIN_SCORE,
        Some(Outcome::Winner(_)) => return LOSS_SCORE,
        Some(Outcome::Tie) => return TIE_SCORE,
        None => {}
    }

    if maximizing {
        let mut best = i32::MIN;
        for index in board.empty_cells() {
            board.place(index, own);
            let score = minimax(board, false, alpha, beta, own, opponent);
            board.clear(index);
            best = best.max(score);
            alpha = alpha.max(best);
            if beta <= alpha {
                break;
            }
        }
        best
    } else {
        let mut best = i32::MAX;
        for index in board.empty_cells() {
            board.place(index, opponent);
            let score = minimax(board, true, alpha, beta, own, opponent);
            board.clear(index);
            best = best.min(score);
            beta = beta.min(best);
            if beta <= alpha {
                break;
            }
        }
        best
    }
}
