//! Pieces: identity, kind, owner, position and per-kind state.

mod moves;

pub use moves::{Occupancy, BIZ_LEAPS, DIAGONALS, ORTHOGONALS, SAU_STEPS};

use crate::{Coord, Player};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Stable identity of a piece within one game.
///
/// Identities are never reused: a transformed piece gets a fresh id.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    derive_more::Display,
)]
#[display("#{}", _0)]
pub struct PieceId(pub(crate) u32);

/// The five piece kinds.
///
/// `Display`/`FromStr` use the names written to move history and save files.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum PieceKind {
    /// One step forward, turning around at the far edge.
    Ram,
    /// Knight-style leaper; the only piece that jumps.
    Biz,
    /// One step in any direction; losing it loses the game.
    Sau,
    /// Orthogonal slider; becomes a Xor every two turns.
    Tor,
    /// Diagonal slider; becomes a Tor every two turns.
    Xor,
}

impl PieceKind {
    /// The kind a transformation pass turns this one into, if any.
    pub fn transformed(self) -> Option<PieceKind> {
        match self {
            PieceKind::Tor => Some(PieceKind::Xor),
            PieceKind::Xor => Some(PieceKind::Tor),
            PieceKind::Ram | PieceKind::Biz | PieceKind::Sau => None,
        }
    }
}

/// Direction a Ram travels in.
///
/// `Up` is the promotion multiplier `+1` (toward row 0), `Down` is `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    /// Toward row 0.
    Up,
    /// Toward row 7.
    Down,
}

impl Heading {
    /// Initial heading for a Ram owned by `owner`.
    pub fn initial(owner: Player) -> Self {
        match owner {
            Player::P1 => Heading::Up,
            Player::P2 => Heading::Down,
        }
    }

    /// The promotion multiplier: `+1` for `Up`, `-1` for `Down`.
    pub fn multiplier(self) -> i8 {
        match self {
            Heading::Up => 1,
            Heading::Down => -1,
        }
    }

    /// The opposite heading.
    pub fn reversed(self) -> Self {
        match self {
            Heading::Up => Heading::Down,
            Heading::Down => Heading::Up,
        }
    }
}

/// Per-kind movement behaviour, carrying the only mutable per-kind state
/// (the Ram's heading).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    /// See [`PieceKind::Ram`].
    Ram {
        /// Current travel direction.
        heading: Heading,
    },
    /// See [`PieceKind::Biz`].
    Biz,
    /// See [`PieceKind::Sau`].
    Sau,
    /// See [`PieceKind::Tor`].
    Tor,
    /// See [`PieceKind::Xor`].
    Xor,
}

impl Behavior {
    /// Behaviour of a freshly constructed piece of `kind` owned by `owner`.
    pub fn fresh(kind: PieceKind, owner: Player) -> Self {
        match kind {
            PieceKind::Ram => Behavior::Ram {
                heading: Heading::initial(owner),
            },
            PieceKind::Biz => Behavior::Biz,
            PieceKind::Sau => Behavior::Sau,
            PieceKind::Tor => Behavior::Tor,
            PieceKind::Xor => Behavior::Xor,
        }
    }

    /// The kind this behaviour belongs to.
    pub fn kind(&self) -> PieceKind {
        match self {
            Behavior::Ram { .. } => PieceKind::Ram,
            Behavior::Biz => PieceKind::Biz,
            Behavior::Sau => PieceKind::Sau,
            Behavior::Tor => PieceKind::Tor,
            Behavior::Xor => PieceKind::Xor,
        }
    }
}

/// A piece on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    id: PieceId,
    behavior: Behavior,
    position: Coord,
    owner: Player,
}

impl Piece {
    /// Creates a freshly constructed piece.
    pub fn new(id: PieceId, kind: PieceKind, position: Coord, owner: Player) -> Self {
        Self {
            id,
            behavior: Behavior::fresh(kind, owner),
            position,
            owner,
        }
    }

    /// Identity of this piece.
    pub fn id(&self) -> PieceId {
        self.id
    }

    /// Kind of this piece.
    pub fn kind(&self) -> PieceKind {
        self.behavior.kind()
    }

    /// Name as written in history and save files (`"Ram"`, `"Biz"`, ...).
    pub fn name(&self) -> String {
        self.kind().to_string()
    }

    /// Per-kind behaviour.
    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    /// Heading, for a Ram.
    pub fn heading(&self) -> Option<Heading> {
        match self.behavior {
            Behavior::Ram { heading } => Some(heading),
            _ => None,
        }
    }

    /// The cell this piece stands on.
    pub fn position(&self) -> Coord {
        self.position
    }

    /// Column index.
    pub fn col(&self) -> u8 {
        self.position.col()
    }

    /// Row index.
    pub fn row(&self) -> u8 {
        self.position.row()
    }

    /// Owning player.
    pub fn owner(&self) -> Player {
        self.owner
    }

    /// Owner's name.
    pub fn owner_name(&self) -> &'static str {
        self.owner.name()
    }

    pub(crate) fn set_position(&mut self, position: Coord) {
        self.position = position;
    }

    /// Turns a Ram around when it stands on the edge it is heading toward.
    ///
    /// Row 0 with heading `Up` flips to `Down`, row 7 with `Down` flips to
    /// `Up`. The flip is kept on the piece. Other kinds are unaffected.
    #[instrument(skip(self), fields(piece = %self.id, at = %self.position))]
    pub fn orient(&mut self) {
        if let Behavior::Ram { heading } = &mut self.behavior {
            let at_edge = match heading {
                Heading::Up => self.position.row() == 0,
                Heading::Down => self.position.row() == crate::ROWS - 1,
            };
            if at_edge {
                *heading = heading.reversed();
                debug!(heading = ?heading, "Ram turned around");
            }
        }
    }

    /// Candidate destinations for this piece on `board`.
    ///
    /// Orients a Ram first (see [`orient`](Self::orient)), so the flip
    /// persists like any other query side effect.
    pub fn compute_moves(&mut self, board: &impl Occupancy) -> Vec<Coord> {
        self.orient();
        self.destinations(board)
    }

    /// Candidate destinations without reorienting a Ram.
    pub fn destinations(&self, board: &impl Occupancy) -> Vec<Coord> {
        match self.behavior {
            Behavior::Ram { heading } => moves::ram(self.position, heading),
            Behavior::Biz => moves::leaps(self.position, &BIZ_LEAPS),
            Behavior::Sau => moves::steps(self.position, self.owner, board, &SAU_STEPS),
            Behavior::Tor => moves::slides(self.position, self.owner, board, &ORTHOGONALS),
            Behavior::Xor => moves::slides(self.position, self.owner, board, &DIAGONALS),
        }
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.kind(), self.owner, self.position)
    }
}
