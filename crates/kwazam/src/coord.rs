//! Board coordinates and the fixed 5×8 geometry.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Number of columns on the board (`A`..`E`).
pub const COLUMNS: u8 = 5;

/// Number of rows on the board (`1`..`8`).
pub const ROWS: u8 = 8;

/// Returns `true` iff `0 <= col < 5` and `0 <= row < 8`.
pub fn is_valid_coordinate(col: i32, row: i32) -> bool {
    (0..COLUMNS as i32).contains(&col) && (0..ROWS as i32).contains(&row)
}

/// A cell on the board.
///
/// A `Coord` is always on the board; constructors return `None` for anything
/// outside the 5×8 grid.
///
/// # Examples
///
/// ```
/// use kwazam::Coord;
///
/// let c = Coord::new(0, 6).unwrap();
/// assert_eq!(c.to_string(), "A7");
/// assert_eq!("A7".parse::<Coord>().unwrap(), c);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Coord {
    col: u8,
    row: u8,
}

impl Coord {
    /// Creates a coordinate, or `None` when off the board.
    pub fn new(col: u8, row: u8) -> Option<Self> {
        is_valid_coordinate(col as i32, row as i32).then_some(Self { col, row })
    }

    /// Column index, 0-based.
    pub const fn col(self) -> u8 {
        self.col
    }

    /// Row index, 0-based.
    pub const fn row(self) -> u8 {
        self.row
    }

    /// The coordinate shifted by `(dcol, drow)`, or `None` when that leaves the board.
    pub fn offset(self, dcol: i8, drow: i8) -> Option<Self> {
        let col = self.col as i32 + dcol as i32;
        let row = self.row as i32 + drow as i32;
        is_valid_coordinate(col, row).then(|| Self {
            col: col as u8,
            row: row as u8,
        })
    }

    /// Column letter as written in move history and save files (`'A' + col`).
    pub fn column_letter(self) -> char {
        char::from(b'A' + self.col)
    }

    /// Row number as written in move history and save files (`row + 1`).
    pub fn row_number(self) -> u8 {
        self.row + 1
    }

    /// Inverts [`column_letter`](Self::column_letter) and [`row_number`](Self::row_number).
    pub fn from_notation(letter: char, number: u8) -> Option<Self> {
        let letter = letter.to_ascii_uppercase();
        if !letter.is_ascii_uppercase() || number == 0 {
            return None;
        }
        Self::new(letter as u8 - b'A', number - 1)
    }

    /// The same cell seen from the other side of the board.
    pub fn rotated(self) -> Self {
        Self {
            col: COLUMNS - 1 - self.col,
            row: ROWS - 1 - self.row,
        }
    }

    /// Every cell, column-major (`A1`, `A2`, ..., `E8`).
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..COLUMNS).flat_map(|col| (0..ROWS).map(move |row| Coord { col, row }))
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.column_letter(), self.row_number())
    }
}

/// Error returned when parsing a coordinate such as `"B7"` fails.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("Invalid coordinate {:?} (expected A1..E8)", input)]
pub struct CoordParseError {
    /// The rejected input.
    pub input: String,
}

impl std::error::Error for CoordParseError {}

impl FromStr for Coord {
    type Err = CoordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = || CoordParseError {
            input: trimmed.to_string(),
        };

        let mut chars = trimmed.chars();
        let letter = chars.next().ok_or_else(err)?;
        let number: u8 = chars.as_str().parse().map_err(|_| err())?;
        Self::from_notation(letter, number).ok_or_else(err)
    }
}
