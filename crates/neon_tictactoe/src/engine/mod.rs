//! Computer opponent.
//!
//! Move choice runs in priority order: take an immediate win, block the
//! opponent's immediate win, then a tier-specific strategy. `Easy` plays a
//! random cell, `Medium` mixes random play with the positional heuristic and
//! `Hard` runs an exhaustive alpha-beta search.

mod heuristics;
mod minimax;

pub use heuristics::find_winning_move;
pub use minimax::{LOSS_SCORE, TIE_SCORE, WIN_SCORE, best_move};

use crate::{Board, Mark};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Chance that the medium tier ignores the positional heuristic.
pub const MEDIUM_RANDOM_CHANCE: f64 = 0.3;

/// Strength of the computer opponent.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Random play after the win/block checks.
    Easy,
    /// Mostly positional play with occasional random moves.
    #[default]
    Medium,
    /// Perfect play.
    Hard,
}

/// Chooses moves for the computer player.
///
/// Each engine owns its random source, so independent games never share
/// state. `Hard` never consults it.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    rng: SmallRng,
}

impl DecisionEngine {
    /// Creates an engine seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Creates an engine with a reproducible random sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Picks the index of an empty cell for `own` to play.
    ///
    /// Returns `None` only when the board is full.
    #[instrument(skip(self, board), fields(board = %board))]
    pub fn select_move(
        &mut self,
        board: &Board,
        difficulty: Difficulty,
        opponent: Mark,
        own: Mark,
    ) -> Option<usize> {
        if board.empty_cells().is_empty() {
            debug!("No empty cell left");
            return None;
        }

        if let Some(index) = find_winning_move(board, own) {
            debug!(index, "Taking immediate win");
            return Some(index);
        }

        if let Some(index) = find_winning_move(board, opponent) {
            debug!(index, "Blocking opponent win");
            return Some(index);
        }

        let index = match difficulty {
            Difficulty::Easy => heuristics::random_cell(&mut self.rng, board),
            Difficulty::Medium if self.rng.random_bool(MEDIUM_RANDOM_CHANCE) => {
                heuristics::random_cell(&mut self.rng, board)
            }
            Difficulty::Medium => heuristics::positional(&mut self.rng, board),
            Difficulty::Hard => best_move(board, own, opponent),
        };
        debug!(?index, %difficulty, "Selected move");
        index
    }
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cell, evaluate_outcome};
    use strum::IntoEnumIterator;

    fn board_from(s: &str) -> Board {
        let mut cells = [Cell::Empty; 9];
        for (cell, c) in cells.iter_mut().zip(s.chars()) {
            *cell = match c {
                'X' => Cell::Marked(Mark::X),
                'O' => Cell::Marked(Mark::O),
                _ => Cell::Empty,
            };
        }
        Board::from_cells(cells)
    }

    #[test]
    fn test_difficulty_parses_case_insensitively() {
        assert_eq!("hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!("Easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert!("brutal".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::Medium.to_string(), "medium");
    }

    #[test]
    fn test_full_board_has_no_move() {
        let mut engine = DecisionEngine::seeded(1);
        let board = board_from("XOXOXXOXO");
        for difficulty in Difficulty::iter() {
            assert_eq!(engine.select_move(&board, difficulty, Mark::X, Mark::O), None);
        }
    }

    #[test]
    fn test_own_win_beats_block_at_every_tier() {
        // X threatens 0-1-2, O threatens 3-4-5; O to move.
        let board = board_from("XX.OO....");
        for seed in 0..20 {
            let mut engine = DecisionEngine::seeded(seed);
            for difficulty in Difficulty::iter() {
                assert_eq!(
                    engine.select_move(&board, difficulty, Mark::X, Mark::O),
                    Some(5),
                    "{difficulty}"
                );
            }
        }
    }

    #[test]
    fn test_block_at_every_tier() {
        // X threatens the left column; O has nothing.
        let board = board_from("X..X....O");
        for seed in 0..20 {
            let mut engine = DecisionEngine::seeded(seed);
            for difficulty in Difficulty::iter() {
                assert_eq!(
                    engine.select_move(&board, difficulty, Mark::X, Mark::O),
                    Some(6),
                    "{difficulty}"
                );
            }
        }
    }

    #[test]
    fn test_always_returns_an_empty_cell() {
        let layouts = [".........", "X........", "XO.......", "XOX.O....", "XOXOXO.X."];
        for seed in 0..10 {
            let mut engine = DecisionEngine::seeded(seed);
            for layout in layouts {
                let board = board_from(layout);
                for difficulty in Difficulty::iter() {
                    let index = engine
                        .select_move(&board, difficulty, Mark::X, Mark::O)
                        .expect("board has empty cells");
                    assert!(board.is_empty(index), "{layout} {difficulty} -> {index}");
                }
            }
        }
    }

    #[test]
    fn test_hard_answers_center_with_corner() {
        let board = board_from("....X....");
        let mut engine = DecisionEngine::seeded(7);
        let index = engine
            .select_move(&board, Difficulty::Hard, Mark::X, Mark::O)
            .expect("move");
        assert!([0, 2, 6, 8].contains(&index), "picked {index}");
    }

    #[test]
    fn test_hard_self_play_ties() {
        let mut engine = DecisionEngine::seeded(0);
        let mut board = Board::new();
        let mut to_move = Mark::X;
        while evaluate_outcome(&board).is_none() {
            let index = engine
                .select_move(&board, Difficulty::Hard, to_move.opponent(), to_move)
                .expect("non-terminal board has a move");
            assert!(board.place(index, to_move));
            to_move = to_move.opponent();
        }
        assert_eq!(evaluate_outcome(&board), Some(crate::Outcome::Tie));
    }
}
