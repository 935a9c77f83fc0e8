//! Text rendering of the board and game status.

use kwazam::{COLUMNS, Coord, GameState, Piece, PieceKind, Player, ROWS};

/// What to draw on top of the pieces.
#[derive(Debug, Clone, Default)]
pub struct View {
    /// Cell of the selected piece.
    pub selected: Option<Coord>,
    /// Destinations to highlight.
    pub highlights: Vec<Coord>,
    /// Draw the board as seen by P2 (row 8 at the top).
    pub flipped: bool,
}

/// Two-character symbol for a piece: kind letter and player number.
pub fn piece_symbol(piece: &Piece) -> String {
    let letter = match piece.kind() {
        PieceKind::Ram => 'R',
        PieceKind::Biz => 'B',
        PieceKind::Sau => 'S',
        PieceKind::Tor => 'T',
        PieceKind::Xor => 'X',
    };
    let number = match piece.owner() {
        Player::P1 => '1',
        Player::P2 => '2',
    };
    format!("{}{}", letter, number)
}

/// The cell drawn at screen position `(col, row)`.
fn cell_at(col: u8, row: u8, flipped: bool) -> Option<Coord> {
    let shown = Coord::new(col, row)?;
    Some(if flipped { shown.rotated() } else { shown })
}

/// Formats the board as a human-readable string.
///
/// Empty cells are `..`, highlighted destinations `**` (or `*` next to a
/// capturable piece), and the selected piece is bracketed.
pub fn board(state: &GameState, view: &View) -> String {
    let mut header = String::from("  ");
    for col in 0..COLUMNS {
        if let Some(cell) = cell_at(col, 0, view.flipped) {
            header.push_str(&format!("  {} ", cell.column_letter()));
        }
    }

    let mut result = header.clone();
    result.push('\n');
    for row in 0..ROWS {
        let mut label = None;
        let mut line = String::new();
        for col in 0..COLUMNS {
            let Some(cell) = cell_at(col, row, view.flipped) else {
                continue;
            };
            label.get_or_insert(cell.row_number());

            let highlighted = view.highlights.contains(&cell);
            let symbol = match state.piece_at(cell) {
                Some(piece) if view.selected == Some(cell) => format!("[{}]", piece_symbol(piece)),
                Some(piece) if highlighted => format!("*{} ", piece_symbol(piece)),
                Some(piece) => format!(" {} ", piece_symbol(piece)),
                None if highlighted => " ** ".to_string(),
                None => " .. ".to_string(),
            };
            line.push_str(&symbol);
        }
        let label = label.map(|n| n.to_string()).unwrap_or_default();
        result.push_str(&format!("{:>2}{} {}\n", label, line, label));
    }
    result.push_str(&header);
    result.push('\n');
    result
}

/// One-line status: whose turn it is, or who won.
pub fn status(state: &GameState) -> String {
    match state.winner() {
        Some(winner) if state.is_game_ended() => {
            format!("Game over: {} wins. Type `restart` to play again.", winner)
        }
        _ => format!(
            "Turn {}: {} to move.",
            state.turn_count(),
            state.player_turn()
        ),
    }
}

/// The move history, one numbered line per ply.
pub fn history(state: &GameState) -> String {
    if state.history().is_empty() {
        return "No moves yet.\n".to_string();
    }
    state
        .history()
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("{:>3}. {}\n", i + 1, entry))
        .collect()
}
