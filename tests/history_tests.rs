//! Save slot tests.
//!
//! These tests verify that a game survives being saved and loaded:
//! - Every format through a directory on disk
//! - Listing order and the item metadata
//! - Tampered files are rejected on load

use std::fs;

use rust_memory::core::{Difficulty, GameConfig, GameError, GameMode, TimerRestore};
use rust_memory::history::{
    DirectoryStore, HistoryError, HistoryStore, MemoryStore, SaveFormat,
};
use rust_memory::session::GameSession;

/// A session partway through a game, with a mismatch still showing.
fn midgame(mode: GameMode) -> GameSession {
    let config = GameConfig::default().with_mode(mode).with_seed(99);
    let mut session = GameSession::new(config, Difficulty::Medium).unwrap();

    let state = session.state();
    let first = state.cards[0].clone();
    let partner = state.cards.iter().find(|c| c.value == -first.value).unwrap().id;
    let stranger = state
        .cards
        .iter()
        .find(|c| c.id != first.id && c.id != partner)
        .unwrap()
        .clone();
    let stranger_partner = state.cards.iter().find(|c| c.value == -stranger.value).unwrap().id;

    session.tick(30);
    session.flip_card(first.id).unwrap();
    session.flip_card(partner).unwrap();
    session.flip_card(stranger.id).unwrap();
    let other = session
        .state()
        .cards
        .iter()
        .find(|c| !c.is_face_up && c.id != stranger_partner)
        .unwrap()
        .id;
    session.flip_card(other).unwrap();
    session
}

#[test]
fn test_directory_roundtrip_every_format() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = DirectoryStore::open(dir.path()).unwrap();

    for mode in [GameMode::SinglePlayer, GameMode::Multiplayer { is_host: true }] {
        let session = midgame(mode);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.pending().len(), 2);

        for format in SaveFormat::ALL {
            store.save("slot", format, &snapshot).unwrap();
            let item = store.load("slot", format).unwrap();
            assert_eq!(item.state, snapshot, "{} {:?}", format, mode);
            assert_eq!(item.format, format);

            let mut fresh = GameSession::new(GameConfig::default().with_mode(mode), Difficulty::Easy)
                .unwrap();
            fresh.install_snapshot(item.state).unwrap();
            assert_eq!(fresh.state(), &snapshot);
        }
    }
}

#[test]
fn test_loaded_game_is_playable() {
    let mut store = MemoryStore::new();
    let session = midgame(GameMode::SinglePlayer);
    store.save("resume", SaveFormat::Txt, session.state()).unwrap();

    let mut resumed = GameSession::new(GameConfig::default(), Difficulty::Easy).unwrap();
    resumed
        .install_snapshot(store.load("resume", SaveFormat::Txt).unwrap().state)
        .unwrap();

    resumed.resolve_mismatch().unwrap();
    assert!(resumed.state().pending().is_empty());
    assert_eq!(resumed.state().elapsed_time_in_seconds, 30);
    assert_eq!(resumed.state().matched_pairs, 1);
    assert!(!resumed.legal_flips().is_empty());
}

#[test]
fn test_paused_restore_policy() {
    let mut store = MemoryStore::new();
    store
        .save("p", SaveFormat::Json, midgame(GameMode::SinglePlayer).state())
        .unwrap();
    let saved = store.load("p", SaveFormat::Json).unwrap().state;
    assert!(saved.is_timer_running);

    let config = GameConfig::default().with_timer_restore(TimerRestore::Paused);
    let mut session = GameSession::new(config, Difficulty::Easy).unwrap();
    session.install_snapshot(saved).unwrap();
    assert!(!session.state().is_timer_running);
}

#[test]
fn test_list_reports_every_format() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = DirectoryStore::open(dir.path()).unwrap();
    let state = midgame(GameMode::SinglePlayer).snapshot();

    store.save("a", SaveFormat::Json, &state).unwrap();
    store.save("b", SaveFormat::Xml, &state).unwrap();
    store.save("b", SaveFormat::Txt, &state).unwrap();

    let items = store.list().unwrap();
    assert_eq!(items.len(), 3);
    assert!(items.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));

    let mut filenames: Vec<&str> = items.iter().map(|i| i.filename.as_str()).collect();
    filenames.sort_unstable();
    assert_eq!(filenames, ["a.json", "b.txt", "b.xml"]);
    assert_eq!(store.names().unwrap(), ["a", "b"]);
}

#[test]
fn test_tampered_save_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = DirectoryStore::open(dir.path()).unwrap();
    let session = midgame(GameMode::SinglePlayer);
    store.save("t", SaveFormat::Txt, session.state()).unwrap();

    // Claim an extra pair without matching any cards
    let path = store.path("t", SaveFormat::Txt).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    fs::write(&path, text.replace("matchedPairs=1", "matchedPairs=2")).unwrap();

    let err = store.load("t", SaveFormat::Txt).unwrap_err();
    assert!(matches!(err, HistoryError::Game(GameError::CorruptSnapshot(_))));
    assert!(err.to_string().contains("matchedPairs"));

    // Unreadable saves drop out of the listing
    assert!(store.list().unwrap().is_empty());
    assert_eq!(store.names().unwrap(), ["t"]);
}

#[test]
fn test_json_snapshot_shape() {
    let session = midgame(GameMode::Multiplayer { is_host: true });
    let json = SaveFormat::Json.encode(session.state()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["difficulty"], "MEDIUM");
    assert_eq!(value["cards"].as_array().unwrap().len(), 24);
    assert_eq!(value["isHost"], true);
    assert_eq!(value["isMyTurn"], false);
    assert_eq!(value["elapsedTimeInSeconds"], 30);
    assert!(value["moveHistory"][0]["card1Id"].is_u64());
    assert!(value["cards"][0]["value"].is_i64());
}
