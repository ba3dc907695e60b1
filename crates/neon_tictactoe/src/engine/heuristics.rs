//! Tactical checks and the positional heuristic.

use crate::{Board, Mark, Position, check_winner};
use rand::Rng;
use rand::seq::IndexedRandom;

/// Finds a cell that completes a triple for `mark`, scanning in board order.
///
/// Each empty cell is tried on a scratch copy and evaluated; the first
/// winning cell is returned.
pub fn find_winning_move(board: &Board, mark: Mark) -> Option<usize> {
    let mut scratch = *board;
    for index in board.empty_cells() {
        scratch.place(index, mark);
        let wins = check_winner(&scratch) == Some(mark);
        scratch.clear(index);
        if wins {
            return Some(index);
        }
    }
    None
}

/// Uniformly random empty cell.
pub(super) fn random_cell<R: Rng>(rng: &mut R, board: &Board) -> Option<usize> {
    board.empty_cells().choose(rng).copied()
}

/// Center, else a random free corner, else a random free side.
pub(super) fn positional<R: Rng>(rng: &mut R, board: &Board) -> Option<usize> {
    if board.is_empty(Position::Center.to_index()) {
        return Some(Position::Center.to_index());
    }
    for group in [Position::CORNERS, Position::SIDES] {
        if let Some(pos) = Position::available(board, &group).choose(rng) {
            return Some(pos.to_index());
        }
    }
    random_cell(rng, board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_finds_first_winning_cell() {
        let mut board = Board::new();
        board.place(0, Mark::X);
        board.place(4, Mark::X);
        board.place(2, Mark::X);
        // 8 completes the diagonal, 1 completes the top row; 1 comes first.
        assert_eq!(find_winning_move(&board, Mark::X), Some(1));
        assert_eq!(find_winning_move(&board, Mark::O), None);
    }

    #[test]
    fn test_positional_prefers_center_then_corner() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut board = Board::new();
        assert_eq!(positional(&mut rng, &board), Some(4));

        board.place(4, Mark::X);
        for _ in 0..20 {
            let index = positional(&mut rng, &board).expect("move");
            assert!([0, 2, 6, 8].contains(&index));
        }
    }

    #[test]
    fn test_positional_falls_back_to_sides() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut board = Board::new();
        for index in [0, 2, 4, 6, 8] {
            board.place(index, Mark::O);
        }
        let index = positional(&mut rng, &board).expect("move");
        assert!([1, 3, 5, 7].contains(&index));
    }
}
