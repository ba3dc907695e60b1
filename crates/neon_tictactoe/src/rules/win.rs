//! Win detection logic for tic-tac-toe.

use crate::{Board, Cell, Mark};
use tracing::instrument;

/// Three board indices that win when they hold the same mark.
pub type Triple = [usize; 3];

/// All winning triples: rows, then columns, then diagonals.
pub const WINNING_TRIPLES: [Triple; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// Returns the first satisfied triple in [`WINNING_TRIPLES`] order.
#[instrument(level = "trace")]
pub fn winning_triple(board: &Board) -> Option<Triple> {
    WINNING_TRIPLES.into_iter().find(|&[a, b, c]| {
        let cell = board.get(a);
        matches!(cell, Some(Cell::Marked(_))) && cell == board.get(b) && cell == board.get(c)
    })
}

/// Checks if there is a winner on the board.
///
/// Returns `Some(mark)` if the mark has three in a row, `None` otherwise.
#[instrument(level = "trace")]
pub fn check_winner(board: &Board) -> Option<Mark> {
    winning_triple(board).and_then(|[a, _, _]| board.get(a).and_then(Cell::mark))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_winner_empty_board() {
        let board = Board::new();
        assert_eq!(check_winner(&board), None);
        assert_eq!(winning_triple(&board), None);
    }

    #[test]
    fn test_winner_top_row() {
        let mut board = Board::new();
        board.place(0, Mark::X);
        board.place(1, Mark::X);
        board.place(2, Mark::X);
        assert_eq!(check_winner(&board), Some(Mark::X));
        assert_eq!(winning_triple(&board), Some([0, 1, 2]));
    }

    #[test]
    fn test_winner_anti_diagonal() {
        let mut board = Board::new();
        board.place(2, Mark::O);
        board.place(4, Mark::O);
        board.place(6, Mark::O);
        assert_eq!(check_winner(&board), Some(Mark::O));
        assert_eq!(winning_triple(&board), Some([2, 4, 6]));
    }

    #[test]
    fn test_no_winner_mixed_line() {
        let mut board = Board::new();
        board.place(0, Mark::X);
        board.place(1, Mark::X);
        board.place(2, Mark::O);
        assert_eq!(check_winner(&board), None);
    }
}
