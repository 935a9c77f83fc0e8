//! Game controller: selection protocol, move validation, notification and
//! save/load on top of [`GameState`].

use crate::persistence::{self, SaveStore};
use crate::{
    Coord, GameEvent, GameListener, GameState, ListenerId, Listeners, MoveError,
    PersistenceError, Piece, PieceId, Player, Ply,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Result of clicking a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// Nothing happened (empty cell with nothing selected, opponent piece
    /// with nothing selected, or the game is over).
    Ignored,
    /// A piece of the player on turn was selected.
    Selected(PieceId),
    /// The selection moved to another piece of the same player.
    Reselected(PieceId),
    /// The selected piece moved.
    Moved(Ply),
    /// The selected piece captured.
    Captured(Ply),
    /// The empty cell was not reachable; nothing changed.
    InvalidMove(MoveError),
    /// The opposing piece was not reachable; nothing changed.
    InvalidCapture(MoveError),
}

/// A Kwazam game session.
///
/// Holds the [`GameState`], the piece selected by the player on turn, the
/// registered listeners and the save directory. Every operation that changes
/// the state notifies listeners exactly once.
#[derive(Debug)]
pub struct Game {
    state: GameState,
    selected: Option<PieceId>,
    listeners: Listeners,
    store: SaveStore,
}

impl Game {
    /// Creates a new game that saves into `store`.
    #[instrument(skip(store), fields(dir = %store.dir().display()))]
    pub fn new(store: SaveStore) -> Self {
        Self {
            state: GameState::new(),
            selected: None,
            listeners: Listeners::new(),
            store,
        }
    }

    /// Returns the current game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Returns the save store.
    pub fn store(&self) -> &SaveStore {
        &self.store
    }

    /// The selected piece, if any.
    pub fn selected(&self) -> Option<&Piece> {
        self.selected.and_then(|id| self.state.piece(id))
    }

    /// Registers a listener.
    pub fn subscribe(&mut self, listener: impl GameListener + 'static) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    /// Removes a listener.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Candidate destinations for `id`.
    pub fn valid_moves_for(&mut self, id: PieceId) -> Result<Vec<Coord>, MoveError> {
        self.state.valid_moves_for(id)
    }

    /// Candidate destinations for the selected piece (empty when nothing is
    /// selected).
    pub fn selected_moves(&mut self) -> Vec<Coord> {
        match self.selected {
            Some(id) => self.state.valid_moves_for(id).unwrap_or_default(),
            None => Vec::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Selection protocol
    // ─────────────────────────────────────────────────────────────

    /// Handles a click on `at`.
    ///
    /// With nothing selected, a click on a piece of the player on turn
    /// selects it. With a selection, a click on an empty cell moves there, a
    /// click on another own piece switches the selection, and a click on an
    /// opposing piece captures it; unreachable cells are reported and change
    /// nothing.
    #[instrument(skip(self))]
    pub fn interact(&mut self, at: Coord) -> Interaction {
        if self.state.is_game_ended() {
            return Interaction::Ignored;
        }

        let clicked = self.state.piece_at(at).map(|p| (p.id(), p.owner()));
        let Some(current) = self.selected() else {
            return match clicked {
                Some((id, owner)) if self.state.is_player_turn(owner) => {
                    self.select(Some(id));
                    Interaction::Selected(id)
                }
                _ => Interaction::Ignored,
            };
        };
        let (current, current_owner) = (current.id(), current.owner());

        match clicked {
            None => match self.move_piece(current, at) {
                Ok(ply) => Interaction::Moved(ply),
                Err(e) => {
                    warn!(error = %e, "Invalid move");
                    Interaction::InvalidMove(e)
                }
            },
            Some((id, owner)) if owner == current_owner => {
                debug!("Same owner, switching selection");
                self.select(Some(id));
                Interaction::Reselected(id)
            }
            Some(_) => match self.capture_piece(current, at) {
                Ok(ply) => Interaction::Captured(ply),
                Err(e) => {
                    warn!(error = %e, "Invalid capture attempt");
                    Interaction::InvalidCapture(e)
                }
            },
        }
    }

    fn select(&mut self, id: Option<PieceId>) {
        self.selected = id;
        self.listeners
            .notify(&GameEvent::SelectionChanged(id), &self.state);
    }

    // ─────────────────────────────────────────────────────────────
    //  Checked transitions
    // ─────────────────────────────────────────────────────────────

    /// Moves `id` to the empty cell `to` after checking it is a legal move
    /// for the player on turn.
    ///
    /// # Errors
    ///
    /// Any [`MoveError`]; the state is unchanged on error.
    #[instrument(skip(self))]
    pub fn move_piece(&mut self, id: PieceId, to: Coord) -> Result<Ply, MoveError> {
        self.check_mover(id)?;
        if self.state.is_occupied(to) {
            return Err(MoveError::DestinationOccupied(to));
        }
        self.check_reachable(id, to)?;

        let ply = self.state.move_piece(id, to)?;
        self.selected = None;
        self.listeners
            .notify(&GameEvent::Moved(ply.clone()), &self.state);
        Ok(ply)
    }

    /// Captures the opposing piece on `to` with `id` after checking it is a
    /// legal move for the player on turn.
    ///
    /// A Sau capture notifies [`GameEvent::GameEnded`] only.
    ///
    /// # Errors
    ///
    /// Any [`MoveError`]; the state is unchanged on error.
    #[instrument(skip(self))]
    pub fn capture_piece(&mut self, id: PieceId, to: Coord) -> Result<Ply, MoveError> {
        let owner = self.check_mover(id)?;
        if self.state.piece_at(to).is_none_or(|p| p.owner() == owner) {
            return Err(MoveError::NothingToCapture(to));
        }
        self.check_reachable(id, to)?;

        let ply = self.state.capture_piece(id, to)?;
        self.selected = None;
        let event = match self.state.winner() {
            Some(winner) if self.state.is_game_ended() => {
                info!(%winner, "Game over");
                GameEvent::GameEnded {
                    ply: ply.clone(),
                    winner,
                }
            }
            _ => GameEvent::Captured(ply.clone()),
        };
        self.listeners.notify(&event, &self.state);
        Ok(ply)
    }

    /// Checks the game is running and `id` belongs to the player on turn.
    fn check_mover(&self, id: PieceId) -> Result<Player, MoveError> {
        if self.state.is_game_ended() {
            return Err(MoveError::GameOver);
        }
        let piece = self.state.piece(id).ok_or(MoveError::UnknownPiece(id))?;
        if !self.state.is_player_turn(piece.owner()) {
            return Err(MoveError::NotYourTurn(piece.owner()));
        }
        Ok(piece.owner())
    }

    fn check_reachable(&mut self, id: PieceId, to: Coord) -> Result<(), MoveError> {
        if self.state.valid_moves_for(id)?.contains(&to) {
            return Ok(());
        }
        let piece = self
            .state
            .piece(id)
            .map(Piece::kind)
            .ok_or(MoveError::UnknownPiece(id))?;
        Err(MoveError::IllegalDestination {
            piece,
            destination: to,
        })
    }

    // ─────────────────────────────────────────────────────────────
    //  Session operations
    // ─────────────────────────────────────────────────────────────

    /// Resets to the starting position and clears the selection.
    #[instrument(skip(self))]
    pub fn restart(&mut self) {
        self.state.restart();
        self.selected = None;
        self.listeners.notify(&GameEvent::Restarted, &self.state);
    }

    /// Saves under `name` in the save store and returns the file path.
    ///
    /// # Errors
    ///
    /// Invalid names and I/O failures; the game is unaffected either way.
    #[instrument(skip(self))]
    pub fn save(&self, name: &str) -> Result<PathBuf, PersistenceError> {
        self.store.save(name, &self.state.snapshot())
    }

    /// Loads the save file at `path`, replacing the current state.
    ///
    /// # Errors
    ///
    /// Missing or unreadable files and malformed turn lines. The current
    /// state is left untouched on error.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
        let path = path.as_ref();
        let snapshot = persistence::read_snapshot(path)?;
        self.state.restore(snapshot);
        self.selected = None;
        info!("Game state loaded");
        self.listeners.notify(
            &GameEvent::Loaded {
                path: path.to_path_buf(),
            },
            &self.state,
        );
        Ok(())
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(SaveStore::default())
    }
}
