//! Move records and the outcome of a ply.

use crate::{Coord, PieceKind, Player};
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Textual description of one ply as kept in the move history.
///
/// Renders as `"Ram A6"` for a move and `"Biz x C1"` for a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct MoveRecord {
    /// Kind of the piece that moved.
    pub piece: PieceKind,
    /// Where it went.
    pub destination: Coord,
    /// Whether the ply captured.
    pub capture: bool,
}

impl std::fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.capture {
            write!(f, "{} x {}", self.piece, self.destination)
        } else {
            write!(f, "{} {}", self.piece, self.destination)
        }
    }
}

/// What happened to the turn after a ply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnOutcome {
    /// Play passes to `next`.
    Continued {
        /// Player now on turn.
        next: Player,
        /// Whether the ply closed a turn that triggered a Tor/Xor swap.
        transformed: bool,
    },
    /// A Sau was captured.
    GameOver {
        /// Owner of the capturing piece.
        winner: Player,
    },
}

/// Full report of an executed ply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ply {
    /// Kind of the piece that moved.
    pub piece: PieceKind,
    /// Its owner.
    pub owner: Player,
    /// Origin cell.
    pub from: Coord,
    /// Destination cell.
    pub to: Coord,
    /// Kind of the captured piece, for a capture.
    pub captured: Option<PieceKind>,
    /// The history entry appended for this ply.
    pub record: MoveRecord,
    /// Turn consequences.
    pub outcome: TurnOutcome,
}

impl Ply {
    /// Checks if this ply ended the game.
    pub fn ended_game(&self) -> bool {
        matches!(self.outcome, TurnOutcome::GameOver { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_formats() {
        let a6 = Coord::new(0, 5).unwrap();
        assert_eq!(MoveRecord::new(PieceKind::Ram, a6, false).to_string(), "Ram A6");
        let c1 = Coord::new(2, 0).unwrap();
        assert_eq!(MoveRecord::new(PieceKind::Biz, c1, true).to_string(), "Biz x C1");
    }
}
