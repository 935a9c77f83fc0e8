//! Tests for saving and loading games through the file system.

use kwazam::{Coord, Game, Interaction, PieceKind, Player, SaveStore};
use std::fs;
use tempfile::TempDir;

fn at(col: u8, row: u8) -> Coord {
    Coord::new(col, row).unwrap()
}

fn play(game: &mut Game, from: Coord, to: Coord) {
    assert!(matches!(game.interact(from), Interaction::Selected(_)));
    assert!(matches!(
        game.interact(to),
        Interaction::Moved(_) | Interaction::Captured(_)
    ));
}

fn game_in(dir: &TempDir) -> Game {
    Game::new(SaveStore::new(dir.path().join("saves")))
}

#[test]
fn test_save_then_load_restores_position() {
    let dir = TempDir::new().unwrap();
    let mut game = game_in(&dir);
    play(&mut game, at(4, 6), at(4, 5));
    play(&mut game, at(0, 1), at(0, 2));
    play(&mut game, at(4, 5), at(4, 4));
    play(&mut game, at(0, 2), at(0, 3));
    play(&mut game, at(1, 7), at(2, 5));

    let path = game.save("midgame").unwrap();
    assert_eq!(path, dir.path().join("saves").join("midgame.txt"));
    assert!(path.exists());

    let mut other = game_in(&dir);
    other.load(&path).unwrap();
    assert_eq!(other.state().snapshot(), game.state().snapshot());
    assert_eq!(other.state().turn_count(), 3);
    assert_eq!(other.state().player_turn(), Player::P2);
    assert_eq!(other.state().history(), game.state().history());
    assert_eq!(other.state().piece_at(at(0, 7)).unwrap().kind(), PieceKind::Tor);
}

#[test]
fn test_saved_text_for_new_game() {
    let dir = TempDir::new().unwrap();
    let game = game_in(&dir);
    let path = game.save("fresh").unwrap();
    let text = fs::read_to_string(path).unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Current Board Pieces");
    assert_eq!(lines[2], "Ram P1 A 7");
    assert_eq!(lines[7], "Xor P1 A 8");
    assert_eq!(lines[9], "Sau P1 C 8");
    assert_eq!(lines[21], "Xor P2 E 1");
    assert!(text.contains("\nTurn Count: 1\nCurrent Turn: 0\n"));
    assert!(text.ends_with("Move History\n------------\n"));
}

#[test]
fn test_save_creates_directory_and_rejects_bad_names() {
    let dir = TempDir::new().unwrap();
    let store = SaveStore::new(dir.path().join("a").join("b"));
    let game = Game::new(store);
    assert!(game.save("nested").unwrap().exists());
    assert!(game.save("").is_err());
    assert!(game.save("x/y").is_err());
}

#[test]
fn test_load_skips_short_piece_lines() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("short.txt");
    fs::write(
        &path,
        "Current Board Pieces\n\
         ---------------------\n\
         Ram P1 A7\n\
         Sau P1 C 8\n\
         Sau P2 C 1\n\
         \n\
         Turn Count: 5\n\
         Current Turn: 1\n\
         \n\
         Move History\n\
         ------------\n\
         Ram A6\n",
    )
    .unwrap();

    let mut game = game_in(&dir);
    game.load(&path).unwrap();
    let state = game.state();
    assert_eq!(state.pieces().len(), 2);
    assert!(state.piece_at(at(0, 6)).is_none());
    assert_eq!(state.turn_count(), 5);
    assert_eq!(state.player_turn(), Player::P2);
    assert_eq!(state.history(), ["Ram A6"]);
}

#[test]
fn test_failed_load_leaves_state_unchanged() {
    let dir = TempDir::new().unwrap();
    let mut game = game_in(&dir);
    play(&mut game, at(0, 6), at(0, 5));
    let before = game.state().clone();

    assert!(game.load(dir.path().join("missing.txt")).is_err());
    assert_eq!(game.state(), &before);

    let broken = dir.path().join("broken.txt");
    fs::write(&broken, "Current Board Pieces\n---\nRam P1 A 7\nTurn Count: many\n").unwrap();
    assert!(game.load(&broken).is_err());
    assert_eq!(game.state(), &before);
}

#[test]
fn test_load_resumes_finished_game() {
    let dir = TempDir::new().unwrap();
    let mut game = game_in(&dir);
    play(&mut game, at(1, 7), at(2, 5));
    play(&mut game, at(4, 1), at(4, 2));
    play(&mut game, at(2, 5), at(3, 3));
    play(&mut game, at(4, 2), at(4, 3));
    play(&mut game, at(3, 3), at(1, 2));
    play(&mut game, at(4, 3), at(4, 4));
    play(&mut game, at(1, 2), at(2, 0));
    assert!(game.state().is_game_ended());

    let path = game.save("over").unwrap();
    let mut other = game_in(&dir);
    other.load(&path).unwrap();
    // Saves do not record the end of the game.
    assert!(!other.state().is_game_ended());
    assert_eq!(other.state().winner(), None);
    assert_eq!(other.state().pieces().len(), 19);
    assert_eq!(other.state().history().last().unwrap(), "Biz x C1");
}

#[test]
fn test_turn_count_without_room_to_advance_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut game = game_in(&dir);
    let text = fs::read_to_string(game.save("fresh").unwrap()).unwrap();

    let at_limit = dir.path().join("at_limit.txt");
    fs::write(&at_limit, text.replace("Turn Count: 1", "Turn Count: 4294967295")).unwrap();
    let before = game.state().clone();
    let err = game.load(&at_limit).unwrap_err();
    assert!(err.message.contains("out of range"));
    assert_eq!(game.state(), &before);

    let near_limit = dir.path().join("near_limit.txt");
    fs::write(&near_limit, text.replace("Turn Count: 1", "Turn Count: 4294967294")).unwrap();
    game.load(&near_limit).unwrap();
    play(&mut game, at(0, 6), at(0, 5));
    play(&mut game, at(4, 1), at(4, 2));
    play(&mut game, at(0, 5), at(0, 4));
    play(&mut game, at(4, 2), at(4, 3));
    assert_eq!(game.state().turn_count(), u32::MAX);
    assert_eq!(game.state().player_turn(), Player::P1);
}

// Saves have no field for a Ram's heading, so a Ram that already turned
// around heads back toward its starting edge after a reload.
#[test]
fn test_ram_heading_resets_after_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("turned.txt");
    fs::write(
        &path,
        "Current Board Pieces\n\
         ---------------------\n\
         Ram P1 A 1\n\
         Sau P1 C 8\n\
         Sau P2 C 1\n\
         Ram P2 E 2\n\
         \n\
         Turn Count: 1\n\
         Current Turn: 0\n\
         \n\
         Move History\n\
         ------------\n",
    )
    .unwrap();

    let mut game = game_in(&dir);
    game.load(&path).unwrap();
    play(&mut game, at(0, 0), at(0, 1));
    play(&mut game, at(4, 1), at(4, 2));

    let ram = game.state().piece_at(at(0, 1)).unwrap().id();
    assert_eq!(game.valid_moves_for(ram).unwrap(), vec![at(0, 2)]);

    let saved = game.save("turned_again").unwrap();
    let mut reloaded = game_in(&dir);
    reloaded.load(&saved).unwrap();
    let ram = reloaded.state().piece_at(at(0, 1)).unwrap().id();
    assert_eq!(reloaded.valid_moves_for(ram).unwrap(), vec![at(0, 0)]);
}
