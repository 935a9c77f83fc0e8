//! Change notification for front ends.

use crate::{GameState, PieceId, Player, Ply};
use std::path::PathBuf;
use tracing::{instrument, trace};

/// Something that changed in a [`Game`](crate::Game).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// The selected piece changed (or was cleared).
    SelectionChanged(Option<PieceId>),
    /// A piece moved to an empty cell.
    Moved(Ply),
    /// A piece captured another and the game goes on.
    Captured(Ply),
    /// A Sau was captured. Sent instead of [`GameEvent::Captured`].
    GameEnded {
        /// The capturing ply.
        ply: Ply,
        /// Owner of the capturing piece.
        winner: Player,
    },
    /// The game was reset to the starting position.
    Restarted,
    /// A save file replaced the game state.
    Loaded {
        /// File that was read.
        path: PathBuf,
    },
}

/// Receives [`GameEvent`]s after the state has been updated.
///
/// Implemented for every `FnMut(&GameEvent, &GameState)` closure.
pub trait GameListener {
    /// Called once per event, with the state after the change.
    fn on_event(&mut self, event: &GameEvent, state: &GameState);
}

impl<F> GameListener for F
where
    F: FnMut(&GameEvent, &GameState),
{
    fn on_event(&mut self, event: &GameEvent, state: &GameState) {
        self(event, state)
    }
}

/// Handle returned by [`Listeners::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Registered listeners, notified in subscription order.
#[derive(Default)]
pub struct Listeners {
    next: u64,
    entries: Vec<(ListenerId, Box<dyn GameListener>)>,
}

impl Listeners {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener.
    pub fn subscribe(&mut self, listener: impl GameListener + 'static) -> ListenerId {
        let id = ListenerId(self.next);
        self.next += 1;
        self.entries.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Delivers `event` to every listener.
    #[instrument(skip_all)]
    pub fn notify(&mut self, event: &GameEvent, state: &GameState) {
        trace!(?event, listeners = self.entries.len(), "Notifying listeners");
        for (_, listener) in &mut self.entries {
            listener.on_event(event, state);
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}
