//! Sanctum progress across sessions, backed by the file store.

use std::fs;

use bracket_random::prelude::RandomNumberGenerator;
use sanctum_crawler::sanctum::storage::{FileStore, KeyValueStore};
use sanctum_crawler::sanctum::{STORAGE_KEY, Sanctum, SanctumState};
use sanctum_crawler::{GameConfig, GameSession};
use tempfile::TempDir;

fn file_sanctum(dir: &TempDir) -> Sanctum {
    Sanctum::load(Box::new(FileStore::new(dir.path()).unwrap()))
}

#[test]
fn upgrades_survive_a_restart() {
    let dir = TempDir::new().unwrap();
    {
        let mut sanctum = file_sanctum(&dir);
        assert!(sanctum.upgrade_room("library"));
        sanctum.add_material("ancient_bone", 3);
    }

    let sanctum = file_sanctum(&dir);
    assert_eq!(sanctum.room("library").map(|room| room.level), Some(2));
    assert_eq!(sanctum.material("ancient_bone"), 3);
    assert_eq!(sanctum.material("stone"), 5);
}

#[test]
fn stored_layout_uses_materials_and_rooms() {
    let dir = TempDir::new().unwrap();
    let mut sanctum = file_sanctum(&dir);
    sanctum.add_material("wood", 1);

    let raw = fs::read_to_string(dir.path().join(format!("{STORAGE_KEY}.json"))).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["materials"]["wood"], 6);
    assert_eq!(json["rooms"]["vault"]["level"], 1);
    assert_eq!(
        json["rooms"]["workshop"]["description"],
        "Craft better equipment and artifacts"
    );
}

#[test]
fn unreadable_storage_starts_fresh() {
    let dir = TempDir::new().unwrap();
    let mut store = FileStore::new(dir.path()).unwrap();
    store.save(STORAGE_KEY, "[1, 2, 3]").unwrap();

    let sanctum = file_sanctum(&dir);
    assert_eq!(sanctum.state(), &SanctumState::default());
}

#[test]
fn failed_upgrades_do_not_touch_storage() {
    let dir = TempDir::new().unwrap();
    let mut sanctum = file_sanctum(&dir);
    assert!(sanctum.upgrade_room("vault"));
    let saved = fs::read_to_string(dir.path().join(format!("{STORAGE_KEY}.json"))).unwrap();

    assert!(!sanctum.upgrade_room("vault"));
    assert!(!sanctum.upgrade_room("observatory"));
    let after = fs::read_to_string(dir.path().join(format!("{STORAGE_KEY}.json"))).unwrap();
    assert_eq!(saved, after);
}

#[test]
fn session_deposits_materials_and_keeps_them_after_a_reset() {
    let dir = TempDir::new().unwrap();
    let mut session = GameSession::with_rng(
        GameConfig::default(),
        Box::new(FileStore::new(dir.path()).unwrap()),
        RandomNumberGenerator::seeded(11),
    );

    assert!(session.use_item("magic-shard-1").is_some());
    session.start_run();
    session.reset_run();
    assert_eq!(session.sanctum().material("magic_shard"), 1);

    let reloaded = file_sanctum(&dir);
    assert_eq!(reloaded.material("magic_shard"), 1);
}
