//! The 5×8 occupancy grid.

use crate::{COLUMNS, Coord, PieceId, ROWS};
use serde::{Deserialize, Serialize};

/// A cell and whatever stands on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Where the tile is.
    pub coord: Coord,
    /// Identity of the occupying piece.
    pub occupant: Option<PieceId>,
}

impl Tile {
    /// Checks if a piece stands on the tile.
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}

/// Occupancy grid: which piece, if any, stands on each cell.
///
/// Indexing with raw `(col, row)` outside the board panics. Use
/// [`Coord`]-based accessors wherever the input can be off-board.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [[Option<PieceId>; ROWS as usize]; COLUMNS as usize],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the occupant of `(col, row)`.
    ///
    /// # Panics
    ///
    /// Panics if `(col, row)` is off the board.
    #[track_caller]
    pub fn get_piece(&self, col: usize, row: usize) -> Option<PieceId> {
        assert_on_board(col, row);
        self.cells[col][row]
    }

    /// Sets or clears the occupant of `(col, row)`.
    ///
    /// # Panics
    ///
    /// Panics if `(col, row)` is off the board.
    #[track_caller]
    pub fn set_piece(&mut self, col: usize, row: usize, piece: Option<PieceId>) {
        assert_on_board(col, row);
        self.cells[col][row] = piece;
    }

    /// Gets the occupant of `at`.
    pub fn get(&self, at: Coord) -> Option<PieceId> {
        self.cells[at.col() as usize][at.row() as usize]
    }

    /// Sets or clears the occupant of `at`.
    pub(crate) fn set(&mut self, at: Coord, piece: Option<PieceId>) {
        self.cells[at.col() as usize][at.row() as usize] = piece;
    }

    /// The tile at `at`.
    pub fn tile(&self, at: Coord) -> Tile {
        Tile {
            coord: at,
            occupant: self.get(at),
        }
    }

    /// Checks if a piece stands on `at`.
    pub fn is_occupied(&self, at: Coord) -> bool {
        self.get(at).is_some()
    }

    /// Empties every cell.
    pub(crate) fn clear(&mut self) {
        *self = Self::new();
    }

    /// All occupied cells with their occupants.
    pub fn occupied(&self) -> impl Iterator<Item = (Coord, PieceId)> + '_ {
        Coord::all().filter_map(|c| self.get(c).map(|id| (c, id)))
    }
}

#[track_caller]
fn assert_on_board(col: usize, row: usize) {
    assert!(
        col < COLUMNS as usize && row < ROWS as usize,
        "board access out of range: ({col}, {row})"
    );
}
