//! The two sides of a Kwazam game.

use serde::{Deserialize, Serialize};

/// A player, identified by its name.
///
/// `P1` moves first and starts on rows 6–7; `P2` starts on rows 0–1.
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
pub enum Player {
    /// First player (bottom of the board).
    P1,
    /// Second player (top of the board).
    P2,
}

impl Player {
    /// Both players in turn order.
    pub const ALL: [Player; 2] = [Player::P1, Player::P2];

    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::P1 => Player::P2,
            Player::P2 => Player::P1,
        }
    }

    /// The player's unique name as written in save files.
    pub fn name(self) -> &'static str {
        match self {
            Player::P1 => "P1",
            Player::P2 => "P2",
        }
    }

    /// Index of this player in turn order.
    pub fn index(self) -> usize {
        match self {
            Player::P1 => 0,
            Player::P2 => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_through_from_str() {
        for player in Player::ALL {
            assert_eq!(player.name().parse::<Player>(), Ok(player));
            assert_eq!(player.to_string(), player.name());
        }
        assert!("P3".parse::<Player>().is_err());
    }

    #[test]
    fn test_turn_order() {
        assert_eq!(Player::ALL[Player::P2.index()], Player::P2);
        assert_eq!(Player::P1.opponent(), Player::P2);
    }
}
