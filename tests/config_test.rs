//! Tests for configuration loading.

use neon_ttt::{Difficulty, NeonConfig};
use std::time::Duration;
use tempfile::NamedTempFile;

#[test]
fn test_missing_file_uses_defaults() {
    let config = NeonConfig::load_or_default("does/not/exist.toml").expect("defaults");
    assert_eq!(config, NeonConfig::default());
    assert_eq!(config.computer_delay(), Duration::from_millis(600));
    assert_eq!(*config.sync_config().poll_interval(), Duration::from_millis(500));
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let file = NamedTempFile::new().expect("temp file");
    std::fs::write(
        file.path(),
        "player_name = \"Ann\"\ndifficulty = \"hard\"\npoll_interval_ms = 250\n",
    )
    .expect("write");

    let config = NeonConfig::from_file(file.path()).expect("load");
    assert_eq!(config.player_name(), "Ann");
    assert_eq!(*config.difficulty(), Difficulty::Hard);
    assert_eq!(*config.sync_config().poll_interval(), Duration::from_millis(250));
    assert_eq!(config.store_dir(), NeonConfig::default().store_dir());
}

#[test]
fn test_malformed_file_is_an_error() {
    let file = NamedTempFile::new().expect("temp file");
    std::fs::write(file.path(), "difficulty = \"impossible\"").expect("write");

    let err = NeonConfig::from_file(file.path()).expect_err("bad difficulty");
    assert!(err.message.contains("Failed to parse config"));
    assert!(err.location.file.ends_with("config.rs"));
}
