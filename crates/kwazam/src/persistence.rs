//! Save-file codec and storage.
//!
//! The format is line oriented and meant to be readable:
//!
//! ```text
//! Current Board Pieces
//! ---------------------
//! Ram P1 A 7
//! ...
//!
//! Turn Count: 1
//! Current Turn: 0
//!
//! Move History
//! ------------
//! Ram A6
//! ```
//!
//! Decoding is lenient about piece lines: a line with the wrong number of
//! fields, an unknown kind or owner, or an off-board cell is skipped. The
//! turn lines are required.

use crate::{Coord, PersistenceError, PieceKind, Player};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

const PIECES_HEADER: &str = "Current Board Pieces";
const PIECES_RULE: &str = "---------------------";
const TURN_COUNT_PREFIX: &str = "Turn Count:";
const CURRENT_TURN_PREFIX: &str = "Current Turn:";
const HISTORY_HEADER: &str = "Move History";
const HISTORY_RULE: &str = "------------";

/// Extension appended to save names.
pub const SAVE_EXTENSION: &str = "txt";

/// One piece as stored in a save file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPiece {
    /// Piece kind.
    pub kind: PieceKind,
    /// Owning player.
    pub owner: Player,
    /// Cell it stands on.
    pub position: Coord,
}

/// Everything a save file holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Pieces in collection order.
    pub pieces: Vec<SavedPiece>,
    /// Turn counter.
    pub turn_count: u32,
    /// Index of the player on turn.
    pub current_turn: usize,
    /// Move history entries.
    pub history: Vec<String>,
}

/// Serializes a snapshot to the save-file text.
#[instrument(skip(snapshot), fields(pieces = snapshot.pieces.len()))]
pub fn encode(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    out.push_str(PIECES_HEADER);
    out.push('\n');
    out.push_str(PIECES_RULE);
    out.push('\n');
    for piece in &snapshot.pieces {
        out.push_str(&format!(
            "{} {} {} {}\n",
            piece.kind,
            piece.owner,
            piece.position.column_letter(),
            piece.position.row_number()
        ));
    }
    out.push_str(&format!("\n{} {}\n", TURN_COUNT_PREFIX, snapshot.turn_count));
    out.push_str(&format!("{} {}\n", CURRENT_TURN_PREFIX, snapshot.current_turn));
    out.push_str(&format!("\n{}\n{}\n", HISTORY_HEADER, HISTORY_RULE));
    for entry in &snapshot.history {
        out.push_str(entry);
        out.push('\n');
    }
    out
}

/// Parses save-file text.
///
/// # Errors
///
/// Fails when the `Turn Count:` or `Current Turn:` line is missing or does
/// not hold a number, when the turn count is 0 or `u32::MAX`, or when the
/// current turn is not 0 or 1.
///
/// Pieces sharing a cell are passed through as written; [`GameState::restore`]
/// keeps the first one.
///
/// [`GameState::restore`]: crate::GameState::restore
#[instrument(skip(text), fields(bytes = text.len()))]
pub fn decode(text: &str) -> Result<Snapshot, PersistenceError> {
    let mut lines = text.lines();

    // Header and rule line.
    lines.next();
    lines.next();

    let mut pieces = Vec::new();
    let turn_line = loop {
        let Some(line) = lines.next() else {
            return Err(PersistenceError::new("Missing \"Turn Count:\" line"));
        };
        if line.starts_with(TURN_COUNT_PREFIX) {
            break line;
        }
        match parse_piece_line(line) {
            Some(piece) => pieces.push(piece),
            None if line.trim().is_empty() => {}
            None => warn!(line, "Skipping malformed piece line"),
        }
    };

    let turn_count: u32 = parse_field(turn_line, TURN_COUNT_PREFIX)?;
    if !(1..u32::MAX).contains(&turn_count) {
        return Err(PersistenceError::new(format!(
            "Turn count {} out of range",
            turn_count
        )));
    }
    let current_line = lines
        .next()
        .ok_or_else(|| PersistenceError::new("Missing \"Current Turn:\" line"))?;
    let current_turn: usize = parse_field(current_line, CURRENT_TURN_PREFIX)?;
    if current_turn >= Player::ALL.len() {
        return Err(PersistenceError::new(format!(
            "Current turn {} out of range (expected 0 or 1)",
            current_turn
        )));
    }

    // Blank line, history header, rule line.
    lines.next();
    lines.next();
    lines.next();
    let history: Vec<String> = lines.map(str::to_string).collect();

    debug!(
        pieces = pieces.len(),
        turn_count,
        current_turn,
        history = history.len(),
        "Decoded save"
    );
    Ok(Snapshot {
        pieces,
        turn_count,
        current_turn,
        history,
    })
}

/// Parses `<Kind> <Owner> <ColLetter> <RowNumber>`.
fn parse_piece_line(line: &str) -> Option<SavedPiece> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [kind, owner, col, row] = fields.as_slice() else {
        return None;
    };

    let kind: PieceKind = kind.parse().ok()?;
    let owner: Player = owner.parse().ok()?;
    let mut letters = col.chars();
    let letter = letters.next()?;
    if letters.next().is_some() {
        return None;
    }
    let number: u8 = row.parse().ok()?;
    let position = Coord::from_notation(letter, number)?;
    Some(SavedPiece {
        kind,
        owner,
        position,
    })
}

#[track_caller]
fn parse_field<T: std::str::FromStr>(line: &str, prefix: &str) -> Result<T, PersistenceError> {
    line.strip_prefix(prefix)
        .map(str::trim)
        .and_then(|value| value.parse().ok())
        .ok_or_else(|| PersistenceError::new(format!("Malformed line {:?}", line)))
}

/// Writes `contents` to `path` through a temporary sibling file and a rename,
/// creating the parent directory if needed.
#[instrument(skip(contents), fields(path = %path.display()))]
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), PersistenceError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    debug!("Wrote file");
    Ok(())
}

/// Reads and decodes the save file at `path`.
#[instrument(fields(path = %path.display()))]
pub fn read_snapshot(path: &Path) -> Result<Snapshot, PersistenceError> {
    if !path.exists() {
        return Err(PersistenceError::new(format!(
            "File not found: {}",
            path.display()
        )));
    }
    let text = fs::read_to_string(path)?;
    decode(&text)
}

/// Directory of named save files (`<dir>/<name>.txt`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveStore {
    dir: PathBuf,
}

impl SaveStore {
    /// Default directory, relative to the working directory.
    pub const DEFAULT_DIR: &'static str = "savefiles";

    /// Creates a store rooted at `dir`. Nothing is created on disk until the
    /// first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the store writes to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a save called `name` is written to.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, SAVE_EXTENSION))
    }

    /// Writes `snapshot` under `name`, returning the file path.
    ///
    /// # Errors
    ///
    /// Rejects empty names and names containing path separators, and
    /// reports any I/O failure.
    #[instrument(skip(self, snapshot), fields(dir = %self.dir.display()))]
    pub fn save(&self, name: &str, snapshot: &Snapshot) -> Result<PathBuf, PersistenceError> {
        let name = name.trim();
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(PersistenceError::new(format!("Invalid save name {:?}", name)));
        }
        let path = self.path_for(name);
        write_atomic(&path, &encode(snapshot))?;
        info!(path = %path.display(), "Game state saved");
        Ok(path)
    }
}

impl Default for SaveStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(col: u8, row: u8) -> Coord {
        Coord::new(col, row).unwrap()
    }

    fn sample() -> Snapshot {
        Snapshot {
            pieces: vec![
                SavedPiece {
                    kind: PieceKind::Ram,
                    owner: Player::P1,
                    position: at(0, 5),
                },
                SavedPiece {
                    kind: PieceKind::Sau,
                    owner: Player::P2,
                    position: at(2, 0),
                },
            ],
            turn_count: 3,
            current_turn: 1,
            history: vec!["Ram A6".to_string(), "Biz x C1".to_string()],
        }
    }

    #[test]
    fn test_encode_layout() {
        let text = encode(&sample());
        let expected = "Current Board Pieces\n\
                        ---------------------\n\
                        Ram P1 A 6\n\
                        Sau P2 C 1\n\
                        \n\
                        Turn Count: 3\n\
                        Current Turn: 1\n\
                        \n\
                        Move History\n\
                        ------------\n\
                        Ram A6\n\
                        Biz x C1\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_decode_inverts_encode() {
        let snapshot = sample();
        assert_eq!(decode(&encode(&snapshot)).unwrap(), snapshot);
    }

    #[test]
    fn test_decode_skips_bad_piece_lines() {
        let text = "Current Board Pieces\n\
                    ---------------------\n\
                    Ram P1 A6\n\
                    Queen P1 A 6\n\
                    Ram P3 A 6\n\
                    Ram P1 F 6\n\
                    Ram P1 A x\n\
                    Tor P2 B 2\n\
                    Xor P1 B 2\n\
                    \n\
                    Turn Count: 2\n\
                    Current Turn: 0\n\
                    \n\
                    Move History\n\
                    ------------\n";
        let snapshot = decode(text).unwrap();
        assert_eq!(
            snapshot.pieces,
            vec![
                SavedPiece {
                    kind: PieceKind::Tor,
                    owner: Player::P2,
                    position: at(1, 1),
                },
                SavedPiece {
                    kind: PieceKind::Xor,
                    owner: Player::P1,
                    position: at(1, 1),
                },
            ]
        );
        assert_eq!(snapshot.turn_count, 2);
        assert!(snapshot.history.is_empty());
    }

    #[test]
    fn test_decode_requires_turn_lines() {
        assert!(decode("Current Board Pieces\n---\nRam P1 A 7\n").is_err());
        assert!(decode("a\nb\nTurn Count: x\nCurrent Turn: 0\n").is_err());
        assert!(decode("a\nb\nTurn Count: 1\n").is_err());
        assert!(decode("a\nb\nTurn Count: 1\nCurrent Turn: 2\n").is_err());
        assert!(decode("a\nb\nTurn Count: 0\nCurrent Turn: 0\n").is_err());
        assert!(decode("a\nb\nTurn Count: 4294967295\nCurrent Turn: 0\n").is_err());
        assert!(decode("a\nb\nTurn Count: 4294967294\nCurrent Turn: 0\n").is_ok());
    }

    #[test]
    fn test_snapshot_json_fields() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["turn_count"], 3);
        assert_eq!(value["current_turn"], 1);
        assert_eq!(value["pieces"][0]["kind"], "Ram");
        assert_eq!(value["pieces"][1]["owner"], "P2");
        assert_eq!(value["history"][1], "Biz x C1");
    }

    #[test]
    fn test_save_store_paths() {
        let store = SaveStore::new("saves");
        assert_eq!(store.path_for("game1"), PathBuf::from("saves/game1.txt"));
        assert!(store.save("", &sample()).is_err());
        assert!(store.save("../escape", &sample()).is_err());
    }
}
