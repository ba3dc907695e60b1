//! Pure tic-tac-toe logic.
//!
//! - [`Board`], [`Mark`], [`Cell`] and [`Position`] describe a 3x3 board.
//! - [`evaluate_outcome`] and [`winning_triple`] are the rules.
//! - [`DecisionEngine`] is the computer opponent.
//!
//! Nothing in this crate performs I/O or keeps global state.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod engine;
mod position;
mod rules;
mod types;

pub use engine::{
    DecisionEngine, Difficulty, LOSS_SCORE, MEDIUM_RANDOM_CHANCE, TIE_SCORE, WIN_SCORE, best_move,
    find_winning_move,
};
pub use position::Position;
pub use rules::{WINNING_TRIPLES, Triple, check_winner, evaluate_outcome, is_full, winning_triple};
pub use types::{Board, CELLS, Cell, Mark, Outcome};
