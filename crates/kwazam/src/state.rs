//! The game state machine: board, pieces, turns, history and win detection.
//!
//! `GameState` executes plies without checking them against the rules; the
//! caller (usually [`Game`](crate::Game)) is responsible for only asking for
//! destinations returned by [`GameState::valid_moves_for`]. Structural
//! preconditions are still checked, and a failing call leaves the state
//! untouched.

use crate::layout::INITIAL_LAYOUT;
use crate::persistence::{SavedPiece, Snapshot};
use crate::{
    Board, Coord, MoveError, MoveRecord, Occupancy, Piece, PieceId, PieceKind, Player, Ply,
    Tile, TurnOutcome,
};
use tracing::{debug, info, instrument, warn};

/// Complete game state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    players: [Player; 2],
    pieces: Vec<Piece>,
    current_turn: usize,
    turn_count: u32,
    ended: bool,
    winner: Option<Player>,
    history: Vec<String>,
    next_id: u32,
}

impl GameState {
    /// Creates a new game in the starting position.
    #[instrument]
    pub fn new() -> Self {
        let mut state = Self {
            board: Board::new(),
            players: Player::ALL,
            pieces: Vec::with_capacity(INITIAL_LAYOUT.len()),
            current_turn: 0,
            turn_count: 1,
            ended: false,
            winner: None,
            history: Vec::new(),
            next_id: 0,
        };
        state.place_initial_pieces();
        state
    }

    // ─────────────────────────────────────────────────────────────
    //  Queries
    // ─────────────────────────────────────────────────────────────

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the live piece collection, in collection order.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Looks a piece up by identity.
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id() == id)
    }

    /// The piece standing on `at`.
    pub fn piece_at(&self, at: Coord) -> Option<&Piece> {
        self.board.get(at).and_then(|id| self.piece(id))
    }

    /// The piece standing on `(col, row)`.
    ///
    /// # Panics
    ///
    /// Panics if `(col, row)` is off the board.
    #[track_caller]
    pub fn get_piece(&self, col: usize, row: usize) -> Option<&Piece> {
        self.board
            .get_piece(col, row)
            .and_then(|id| self.piece(id))
    }

    /// The tile at `at`.
    pub fn tile(&self, at: Coord) -> Tile {
        self.board.tile(at)
    }

    /// Checks if a piece stands on `at`.
    pub fn is_occupied(&self, at: Coord) -> bool {
        self.board.is_occupied(at)
    }

    /// Index of the player on turn (0 or 1).
    pub fn current_turn(&self) -> usize {
        self.current_turn
    }

    /// The player on turn.
    pub fn player_turn(&self) -> Player {
        self.players[self.current_turn]
    }

    /// Checks if it is `player`'s turn.
    pub fn is_player_turn(&self, player: Player) -> bool {
        self.player_turn() == player
    }

    /// Looks a player up by name.
    pub fn player(&self, name: &str) -> Option<Player> {
        self.players.iter().copied().find(|p| p.name() == name)
    }

    /// Both players, in turn order.
    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    /// Number of the turn in progress, starting at 1.
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// The move history.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Checks if a Sau has been captured.
    pub fn is_game_ended(&self) -> bool {
        self.ended
    }

    /// The winner, once the game has ended.
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    /// Candidate destinations for the piece `id` on the live board.
    ///
    /// Querying a Ram on the edge it was heading for turns it around, and
    /// the new heading is kept.
    #[instrument(skip(self))]
    pub fn valid_moves_for(&mut self, id: PieceId) -> Result<Vec<Coord>, MoveError> {
        let index = self.index_of(id)?;
        let mut piece = self.pieces[index].clone();
        let moves = piece.compute_moves(&*self);
        self.pieces[index] = piece;
        debug!(count = moves.len(), "Computed valid moves");
        Ok(moves)
    }

    // ─────────────────────────────────────────────────────────────
    //  Transitions
    // ─────────────────────────────────────────────────────────────

    /// Moves `id` to the empty cell `to` and passes the turn.
    ///
    /// Appends `"<Piece> <Cell>"` to the history. When both players have
    /// moved the turn counter increments, and every new odd turn triggers
    /// a Tor/Xor [transformation pass](Self::transform_pass).
    ///
    /// # Errors
    ///
    /// `GameOver`, `UnknownPiece` or `DestinationOccupied`, all before any
    /// mutation.
    #[instrument(skip(self))]
    pub fn move_piece(&mut self, id: PieceId, to: Coord) -> Result<Ply, MoveError> {
        self.ensure_running()?;
        let index = self.index_of(id)?;
        if self.board.is_occupied(to) {
            return Err(MoveError::DestinationOccupied(to));
        }

        let (piece, owner, from) = self.relocate(index, to);
        let record = MoveRecord::new(piece, to, false);
        self.history.push(record.to_string());
        let outcome = self.advance_turn();

        info!(%record, player = %owner, "Piece moved");
        Ok(Ply {
            piece,
            owner,
            from,
            to,
            captured: None,
            record,
            outcome,
        })
    }

    /// Moves `id` onto the opposing piece at `to`, removing it.
    ///
    /// Appends `"<Piece> x <Cell>"` to the history. Capturing a Sau ends the
    /// game with the capturer's owner as winner; the turn is then not
    /// advanced. Otherwise the turn advances as for [`move_piece`](Self::move_piece).
    ///
    /// # Errors
    ///
    /// `GameOver`, `UnknownPiece` or `NothingToCapture`, all before any
    /// mutation.
    #[instrument(skip(self))]
    pub fn capture_piece(&mut self, id: PieceId, to: Coord) -> Result<Ply, MoveError> {
        self.ensure_running()?;
        let index = self.index_of(id)?;
        let attacker = self.pieces[index].owner();
        let victim = match self.piece_at(to) {
            Some(victim) if victim.owner() != attacker => victim.id(),
            _ => return Err(MoveError::NothingToCapture(to)),
        };

        let victim_index = self.index_of(victim)?;
        let captured = self.pieces.remove(victim_index);
        self.board.set(to, None);

        let index = self.index_of(id)?;
        let (piece, owner, from) = self.relocate(index, to);
        let record = MoveRecord::new(piece, to, true);
        self.history.push(record.to_string());

        let outcome = if captured.kind() == PieceKind::Sau {
            self.ended = true;
            self.winner = Some(owner);
            info!(%record, winner = %owner, "Sau captured, game over");
            TurnOutcome::GameOver { winner: owner }
        } else {
            info!(%record, captured = %captured.kind(), player = %owner, "Piece captured");
            self.advance_turn()
        };

        Ok(Ply {
            piece,
            owner,
            from,
            to,
            captured: Some(captured.kind()),
            record,
            outcome,
        })
    }

    /// Replaces every Tor with a new Xor and every Xor with a new Tor.
    ///
    /// Decisions are taken on the collection as it was before the pass.
    /// Replacements get fresh identities and are appended to the end of the
    /// collection. Returns the number of pieces replaced.
    #[instrument(skip(self))]
    pub fn transform_pass(&mut self) -> usize {
        let mut swaps = Vec::new();
        let mut kept = Vec::with_capacity(self.pieces.len());
        for piece in std::mem::take(&mut self.pieces) {
            match piece.kind().transformed() {
                Some(kind) => swaps.push((kind, piece.position(), piece.owner())),
                None => kept.push(piece),
            }
        }
        self.pieces = kept;

        let count = swaps.len();
        for (kind, at, owner) in swaps {
            self.spawn(kind, at, owner);
        }
        info!(count, turn = self.turn_count, "Transformed Tor and Xor pieces");
        count
    }

    /// Resets to the starting position, turn 1, P1 to move, empty history.
    #[instrument(skip(self))]
    pub fn restart(&mut self) {
        *self = Self::new();
        info!("Game restarted");
    }

    // ─────────────────────────────────────────────────────────────
    //  Persistence
    // ─────────────────────────────────────────────────────────────

    /// Captures everything the save format stores.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pieces: self
                .pieces
                .iter()
                .map(|p| SavedPiece {
                    kind: p.kind(),
                    owner: p.owner(),
                    position: p.position(),
                })
                .collect(),
            turn_count: self.turn_count,
            current_turn: self.current_turn,
            history: self.history.clone(),
        }
    }

    /// Replaces pieces, board, turn index, turn counter and history with a
    /// loaded snapshot. Ended flag and winner are cleared.
    ///
    /// Pieces are rebuilt fresh, so Rams take their owner's initial heading.
    ///
    /// This is the only place that enforces one piece per cell for loaded
    /// data: a second piece on an already occupied cell is skipped with a
    /// warning. [`decode`](crate::persistence::decode) passes such lines
    /// through unchanged.
    #[instrument(skip(self, snapshot), fields(pieces = snapshot.pieces.len()))]
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.pieces.clear();
        self.board.clear();
        for saved in snapshot.pieces {
            if self.board.is_occupied(saved.position) {
                warn!(cell = %saved.position, kind = %saved.kind, "Skipping piece on occupied cell");
                continue;
            }
            self.spawn(saved.kind, saved.position, saved.owner);
        }
        self.turn_count = snapshot.turn_count;
        self.current_turn = snapshot.current_turn % self.players.len();
        self.history = snapshot.history;
        self.ended = false;
        self.winner = None;
        debug!(turn_count = self.turn_count, current_turn = self.current_turn, "State restored");
    }

    // ─────────────────────────────────────────────────────────────
    //  Internals
    // ─────────────────────────────────────────────────────────────

    fn place_initial_pieces(&mut self) {
        for (kind, col, row, owner) in INITIAL_LAYOUT {
            if let Some(at) = Coord::new(col, row) {
                self.spawn(kind, at, owner);
            }
        }
    }

    /// Creates a fresh piece, registers it and puts it on the board.
    fn spawn(&mut self, kind: PieceKind, at: Coord, owner: Player) -> PieceId {
        let id = PieceId(self.next_id);
        self.next_id += 1;
        self.pieces.push(Piece::new(id, kind, at, owner));
        self.board.set(at, Some(id));
        id
    }

    /// Moves the piece at `index` to `to`, keeping board and piece in sync.
    fn relocate(&mut self, index: usize, to: Coord) -> (PieceKind, Player, Coord) {
        let piece = &mut self.pieces[index];
        let from = piece.position();
        self.board.set(from, None);
        self.board.set(to, Some(piece.id()));
        piece.set_position(to);
        (piece.kind(), piece.owner(), from)
    }

    /// Passes the turn; closes a full turn when play returns to P1.
    fn advance_turn(&mut self) -> TurnOutcome {
        self.current_turn = (self.current_turn + 1) % self.players.len();
        let mut transformed = false;
        if self.current_turn == 0 {
            match self.turn_count.checked_add(1) {
                Some(count) => {
                    self.turn_count = count;
                    debug!(turn_count = count, "Turn completed");
                    if count % 2 == 1 {
                        self.transform_pass();
                        transformed = true;
                    }
                }
                None => warn!(turn_count = self.turn_count, "Turn counter at its limit"),
            }
        }
        TurnOutcome::Continued {
            next: self.player_turn(),
            transformed,
        }
    }

    fn ensure_running(&self) -> Result<(), MoveError> {
        if self.ended {
            return Err(MoveError::GameOver);
        }
        Ok(())
    }

    fn index_of(&self, id: PieceId) -> Result<usize, MoveError> {
        self.pieces
            .iter()
            .position(|p| p.id() == id)
            .ok_or(MoveError::UnknownPiece(id))
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl Occupancy for GameState {
    fn owner_at(&self, at: Coord) -> Option<Player> {
        self.piece_at(at).map(Piece::owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(col: u8, row: u8) -> Coord {
        Coord::new(col, row).unwrap()
    }

    fn id_at(state: &GameState, col: u8, row: u8) -> PieceId {
        state.piece_at(at(col, row)).expect("piece expected").id()
    }

    #[test]
    fn test_board_and_pieces_agree() {
        let state = GameState::new();
        assert_eq!(state.pieces().len(), 20);
        for piece in state.pieces() {
            assert_eq!(state.board().get(piece.position()), Some(piece.id()));
        }
        assert_eq!(state.board().occupied().count(), 20);
    }

    #[test]
    fn test_move_to_occupied_cell_is_rejected_without_mutation() {
        let mut state = GameState::new();
        let before = state.clone();
        let ram = id_at(&state, 0, 6);
        let result = state.move_piece(ram, at(0, 7));
        assert_eq!(result, Err(MoveError::DestinationOccupied(at(0, 7))));
        assert_eq!(state, before);
    }

    #[test]
    fn test_capture_of_own_piece_is_rejected() {
        let mut state = GameState::new();
        let biz = id_at(&state, 1, 7);
        assert_eq!(
            state.capture_piece(biz, at(0, 6)),
            Err(MoveError::NothingToCapture(at(0, 6)))
        );
    }

    #[test]
    fn test_unknown_piece() {
        let mut state = GameState::new();
        let missing = PieceId(999);
        assert_eq!(state.valid_moves_for(missing), Err(MoveError::UnknownPiece(missing)));
    }

    #[test]
    fn test_transform_pass_appends_fresh_pieces() {
        let mut state = GameState::new();
        let old_ids: Vec<_> = state.pieces().iter().map(Piece::id).collect();
        assert_eq!(state.transform_pass(), 4);

        let tail: Vec<_> = state.pieces()[16..].iter().map(Piece::kind).collect();
        assert_eq!(
            tail,
            vec![PieceKind::Tor, PieceKind::Xor, PieceKind::Xor, PieceKind::Tor]
        );
        for piece in &state.pieces()[16..] {
            assert!(!old_ids.contains(&piece.id()));
            assert_eq!(state.board().get(piece.position()), Some(piece.id()));
        }
    }

    fn snapshot_of(pieces: &[(PieceKind, Player, Coord)], turn_count: u32) -> Snapshot {
        Snapshot {
            pieces: pieces
                .iter()
                .map(|&(kind, owner, position)| SavedPiece {
                    kind,
                    owner,
                    position,
                })
                .collect(),
            turn_count,
            current_turn: 0,
            history: Vec::new(),
        }
    }

    #[test]
    fn test_restore_keeps_first_piece_on_shared_cell() {
        let mut state = GameState::new();
        state.restore(snapshot_of(
            &[
                (PieceKind::Tor, Player::P2, at(1, 1)),
                (PieceKind::Xor, Player::P1, at(1, 1)),
                (PieceKind::Sau, Player::P1, at(2, 7)),
            ],
            2,
        ));
        assert_eq!(state.pieces().len(), 2);
        let kept = state.piece_at(at(1, 1)).unwrap();
        assert_eq!((kept.kind(), kept.owner()), (PieceKind::Tor, Player::P2));
        for piece in state.pieces() {
            assert_eq!(state.board().get(piece.position()), Some(piece.id()));
        }
    }

    #[test]
    fn test_turn_counter_stops_at_limit() {
        let mut state = GameState::new();
        state.restore(snapshot_of(
            &[
                (PieceKind::Ram, Player::P1, at(0, 6)),
                (PieceKind::Ram, Player::P2, at(4, 1)),
                (PieceKind::Tor, Player::P1, at(4, 7)),
            ],
            u32::MAX,
        ));
        let p1 = id_at(&state, 0, 6);
        let p2 = id_at(&state, 4, 1);
        state.move_piece(p1, at(0, 5)).unwrap();
        let ply = state.move_piece(p2, at(4, 2)).unwrap();

        assert_eq!(state.turn_count(), u32::MAX);
        assert_eq!(state.current_turn(), 0);
        assert_eq!(
            ply.outcome,
            TurnOutcome::Continued {
                next: Player::P1,
                transformed: false
            }
        );
        assert_eq!(state.piece_at(at(4, 7)).unwrap().kind(), PieceKind::Tor);
    }

    #[test]
    fn test_player_lookup() {
        let state = GameState::new();
        assert_eq!(state.player("P2"), Some(Player::P2));
        assert_eq!(state.player("P9"), None);
        assert!(state.is_player_turn(Player::P1));
    }
}
