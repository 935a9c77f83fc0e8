//! Starting position.

use crate::{PieceKind, Player};

/// The 20 starting pieces as `(kind, col, row, owner)`, in collection order:
/// P1 Rams, P1 back row, P2 Rams, P2 back row.
pub const INITIAL_LAYOUT: [(PieceKind, u8, u8, Player); 20] = [
    (PieceKind::Ram, 0, 6, Player::P1),
    (PieceKind::Ram, 1, 6, Player::P1),
    (PieceKind::Ram, 2, 6, Player::P1),
    (PieceKind::Ram, 3, 6, Player::P1),
    (PieceKind::Ram, 4, 6, Player::P1),
    (PieceKind::Xor, 0, 7, Player::P1),
    (PieceKind::Biz, 1, 7, Player::P1),
    (PieceKind::Sau, 2, 7, Player::P1),
    (PieceKind::Biz, 3, 7, Player::P1),
    (PieceKind::Tor, 4, 7, Player::P1),
    (PieceKind::Ram, 0, 1, Player::P2),
    (PieceKind::Ram, 1, 1, Player::P2),
    (PieceKind::Ram, 2, 1, Player::P2),
    (PieceKind::Ram, 3, 1, Player::P2),
    (PieceKind::Ram, 4, 1, Player::P2),
    (PieceKind::Tor, 0, 0, Player::P2),
    (PieceKind::Biz, 1, 0, Player::P2),
    (PieceKind::Sau, 2, 0, Player::P2),
    (PieceKind::Biz, 3, 0, Player::P2),
    (PieceKind::Xor, 4, 0, Player::P2),
];
