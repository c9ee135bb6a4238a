use codequest::runtime::clock::ManualClock;
use codequest::runtime::storage::{load_config, write_config};
use codequest::runtime::{Session, SessionConfig, command_speed_delay};
use codequest::world::World;
use tempfile::TempDir;

#[test]
fn saved_settings_drive_a_new_session() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("profile");

    let config = SessionConfig {
        action_delay_ms: command_speed_delay(8),
        move_speed: 16,
        default_wait_ms: 250,
        ..SessionConfig::default()
    };
    write_config(&root, &config).unwrap();

    let loaded = load_config(&root).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.action_delay_ms, 150);

    let session = Session::from_map_text(
        loaded,
        "0 0 0\n0 0 0\n0 0 0\n",
        (1, 1),
        Box::new(ManualClock::new(0)),
    )
    .unwrap();
    assert_eq!(session.scheduler().move_speed(), 16);
    assert_eq!(session.scheduler().timing().action_delay_ms, 150);
}

#[test]
fn partial_settings_fill_in_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("settings.json"), br#"{ "move_speed": 8 }"#).unwrap();

    let loaded = load_config(dir.path()).unwrap();
    assert_eq!(loaded.move_speed, 8);
    assert_eq!(loaded.tile_size, 64);
    assert_eq!(loaded.default_wait_ms, 1000);
}

#[test]
fn invalid_settings_are_rejected() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("settings.json"), br#"{ "tile_size": 0 }"#).unwrap();
    assert!(load_config(dir.path()).is_err());

    let config = SessionConfig {
        max_health: 0,
        ..SessionConfig::default()
    };
    assert!(write_config(dir.path(), &config).is_err());

    let config = SessionConfig {
        max_repeat: 0,
        ..SessionConfig::default()
    };
    assert!(write_config(dir.path(), &config).is_err());
}

#[test]
fn zero_tile_size_cannot_start_a_session() {
    let config = SessionConfig {
        tile_size: 0,
        ..SessionConfig::default()
    };
    let world = World::new(
        codequest::world::TileMap::open(2, 2, 64),
        Default::default(),
        &SessionConfig::default(),
    );
    assert!(Session::with_clock(config, world, Box::new(ManualClock::new(0))).is_err());
}
