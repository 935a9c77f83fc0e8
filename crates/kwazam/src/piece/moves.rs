//! Destination generators shared by the piece kinds.
//!
//! Generators only ever yield on-board coordinates. Occupancy filtering
//! differs per kind: steppers and sliders stop at their own pieces, the Biz
//! leaper and the Ram do not look at occupancy at all.

use crate::{Coord, Heading, Player};

/// Read access to who occupies a cell.
pub trait Occupancy {
    /// Owner of the piece on `at`, if any.
    fn owner_at(&self, at: Coord) -> Option<Player>;
}

/// Orthogonal rays, in generation order.
pub const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (0, -1), (-1, 0), (0, 1)];

/// Diagonal rays, in generation order.
pub const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Unit steps in all eight directions.
pub const SAU_STEPS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Knight-style offsets.
pub const BIZ_LEAPS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

/// One cell along `row - multiplier`.
///
/// Occupancy is not consulted: a Ram may be offered a cell holding any piece.
pub(crate) fn ram(from: Coord, heading: Heading) -> Vec<Coord> {
    from.offset(0, -heading.multiplier()).into_iter().collect()
}

/// Every on-board offset, occupied or not.
pub(crate) fn leaps(from: Coord, offsets: &[(i8, i8)]) -> Vec<Coord> {
    offsets
        .iter()
        .filter_map(|&(dc, dr)| from.offset(dc, dr))
        .collect()
}

/// Single steps onto empty or opponent-held cells.
pub(crate) fn steps(
    from: Coord,
    owner: Player,
    board: &impl Occupancy,
    offsets: &[(i8, i8)],
) -> Vec<Coord> {
    offsets
        .iter()
        .filter_map(|&(dc, dr)| from.offset(dc, dr))
        .filter(|&to| board.owner_at(to) != Some(owner))
        .collect()
}

/// Rays that run over empty cells and end on (and include) the first
/// opponent piece, or end before the first own piece.
pub(crate) fn slides(
    from: Coord,
    owner: Player,
    board: &impl Occupancy,
    rays: &[(i8, i8)],
) -> Vec<Coord> {
    let mut moves = Vec::new();
    for &(dc, dr) in rays {
        let mut cursor = from.offset(dc, dr);
        while let Some(to) = cursor {
            match board.owner_at(to) {
                None => moves.push(to),
                Some(other) => {
                    if other != owner {
                        moves.push(to);
                    }
                    break;
                }
            }
            cursor = to.offset(dc, dr);
        }
    }
    moves
}
