//! Error types for move execution and persistence.

use crate::{Coord, PieceId, PieceKind, Player};
use derive_more::{Display, Error};
use tracing::instrument;

/// Error that can occur when validating or applying a move or capture.
///
/// Every variant is reported before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum MoveError {
    /// No piece with this identity is on the board.
    #[display("No piece {} on the board", _0)]
    UnknownPiece(PieceId),

    /// The game is already over.
    #[display("Game is already over")]
    GameOver,

    /// The piece belongs to the player who is not on turn.
    #[display("It's not {}'s turn", _0)]
    NotYourTurn(Player),

    /// The destination is not among the piece's valid moves.
    #[display("Invalid move: {} cannot reach {}", piece, destination)]
    IllegalDestination {
        /// Kind of the moving piece.
        piece: PieceKind,
        /// Requested destination.
        destination: Coord,
    },

    /// A plain move was requested onto an occupied cell.
    #[display("{} is occupied; use a capture", _0)]
    DestinationOccupied(Coord),

    /// A capture was requested on a cell without an opposing piece.
    #[display("Invalid capture attempt: no opposing piece on {}", _0)]
    NothingToCapture(Coord),
}

impl std::error::Error for MoveError {}

/// Persistence error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Persistence error: {} at {}:{}", message, file, line)]
pub struct PersistenceError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl PersistenceError {
    /// Creates a new persistence error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<std::io::Error> for PersistenceError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("I/O error: {}", err))
    }
}
