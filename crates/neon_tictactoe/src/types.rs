//! Core domain types for tic-tac-toe.

use serde::{Deserialize, Serialize};

/// Mark a player places on the board.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumString,
)]
pub enum Mark {
    /// Mark X (always moves first).
    #[strum(serialize = "X", serialize = "x")]
    X,
    /// Mark O.
    #[strum(serialize = "O", serialize = "o")]
    O,
}

impl Mark {
    /// The mark that opens every game.
    pub const FIRST: Mark = Mark::X;

    /// Returns the other mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A cell on the tic-tac-toe board.
///
/// Serializes as `null`, `"X"` or `"O"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<Mark>", into = "Option<Mark>")]
pub enum Cell {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell holding a mark.
    Marked(Mark),
}

impl Cell {
    /// Returns the mark in this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Marked(mark) => Some(mark),
        }
    }
}

impl From<Option<Mark>> for Cell {
    fn from(mark: Option<Mark>) -> Self {
        mark.map_or(Cell::Empty, Cell::Marked)
    }
}

impl From<Cell> for Option<Mark> {
    fn from(cell: Cell) -> Self {
        cell.mark()
    }
}

/// Number of cells on the board.
pub const CELLS: usize = 9;

/// 3x3 tic-tac-toe board in row-major order (0-8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: [Cell; CELLS],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a board from explicit cells.
    pub fn from_cells(cells: [Cell; CELLS]) -> Self {
        Self { cells }
    }

    /// Gets the cell at the given index, `None` when out of range.
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Places a mark; returns `false` without touching the board if the index
    /// is out of range or the cell is taken.
    pub fn place(&mut self, index: usize, mark: Mark) -> bool {
        match self.cells.get_mut(index) {
            Some(cell @ Cell::Empty) => {
                *cell = Cell::Marked(mark);
                true
            }
            _ => false,
        }
    }

    /// Clears a cell. Used by search code to undo a simulated placement.
    pub fn clear(&mut self, index: usize) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = Cell::Empty;
        }
    }

    /// Checks if a cell is empty. Out-of-range indices are never empty.
    pub fn is_empty(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Cell::Empty))
    }

    /// Indices of all empty cells, ascending.
    pub fn empty_cells(&self) -> Vec<usize> {
        (0..CELLS).filter(|&i| self.is_empty(i)).collect()
    }

    /// Returns all cells.
    pub fn cells(&self) -> &[Cell; CELLS] {
        &self.cells
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..3 {
            for col in 0..3 {
                let index = row * 3 + col;
                match self.cells[index] {
                    Cell::Empty => write!(f, "{}", index + 1)?,
                    Cell::Marked(mark) => write!(f, "{mark}")?,
                }
                if col < 2 {
                    f.write_str("|")?;
                }
            }
            if row < 2 {
                f.write_str("\n-+-+-\n")?;
            }
        }
        Ok(())
    }
}

/// Outcome of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Mark completed a triple.
    Winner(Mark),
    /// Board is full and no triple is complete.
    Tie,
}

impl Outcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Mark> {
        match self {
            Outcome::Winner(mark) => Some(*mark),
            Outcome::Tie => None,
        }
    }

    /// Returns true if the game was a tie.
    pub fn is_tie(&self) -> bool {
        matches!(self, Outcome::Tie)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(mark) => write!(f, "{mark} wins"),
            Outcome::Tie => write!(f, "Tie"),
        }
    }
}
