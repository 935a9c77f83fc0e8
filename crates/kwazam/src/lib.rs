//! Kwazam - rules engine for a two-player chess variant on a 5×8 board.
//!
//! # Architecture
//!
//! - **Coordinates/Board**: [`Coord`], [`Board`], [`Tile`]
//! - **Pieces**: [`Piece`], [`PieceKind`] and per-kind move generation
//! - **State machine**: [`GameState`] executes moves, captures, turn
//!   advancement and the periodic Tor/Xor transformation
//! - **Controller**: [`Game`] adds the click selection protocol, move
//!   validation, listeners and save/load
//! - **Persistence**: the text save format in [`persistence`]
//!
//! # Example
//!
//! ```
//! use kwazam::{Coord, Game, Interaction};
//!
//! let mut game = Game::default();
//! let ram = Coord::new(0, 6).unwrap();
//! assert!(matches!(game.interact(ram), Interaction::Selected(_)));
//! assert!(matches!(game.interact(Coord::new(0, 5).unwrap()), Interaction::Moved(_)));
//! assert_eq!(game.state().history(), ["Ram A6"]);
//! assert_eq!(game.state().current_turn(), 1);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod board;
mod coord;
mod error;
mod events;
mod game;
mod layout;
mod piece;
mod player;
mod record;
mod state;

pub mod persistence;

// Crate-level exports - Geometry
pub use board::{Board, Tile};
pub use coord::{COLUMNS, Coord, CoordParseError, ROWS, is_valid_coordinate};

// Crate-level exports - Pieces and players
pub use layout::INITIAL_LAYOUT;
pub use piece::{
    BIZ_LEAPS, Behavior, DIAGONALS, Heading, ORTHOGONALS, Occupancy, Piece, PieceId, PieceKind,
    SAU_STEPS,
};
pub use player::Player;

// Crate-level exports - State machine
pub use record::{MoveRecord, Ply, TurnOutcome};
pub use state::GameState;

// Crate-level exports - Controller and notification
pub use events::{GameEvent, GameListener, ListenerId, Listeners};
pub use game::{Game, Interaction};

// Crate-level exports - Errors
pub use error::{MoveError, PersistenceError};
pub use persistence::{SaveStore, SavedPiece, Snapshot};
