//! Tests for loading and writing omok configuration.

use omok::{GameMode, LlmProvider, OmokConfig, Rules};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_defaults() {
    let config = OmokConfig::default();
    assert_eq!(config.rules(), Rules::new(15, 5));
    assert_eq!(*config.game().mode(), GameMode::OracleAssisted);
    assert_eq!(*config.oracle().provider(), LlmProvider::Gemini);
    assert_eq!(*config.oracle().think_delay_ms(), 800);
    assert_eq!(*config.oracle().max_retries(), 1);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_file_fills_defaults() {
    let file = write_config(
        r#"
[game]
mode = "local"

[oracle]
provider = "anthropic"
model = "claude-3-5-haiku-20241022"
"#,
    );

    let config = OmokConfig::from_file(file.path()).unwrap();
    assert_eq!(*config.game().mode(), GameMode::LocalTwoPlayer);
    assert_eq!(*config.game().board_size(), 15);
    assert_eq!(*config.oracle().provider(), LlmProvider::Anthropic);
    assert_eq!(config.oracle().model(), "claude-3-5-haiku-20241022");
    assert_eq!(*config.oracle().timeout_secs(), 60);
}

#[test]
fn test_empty_file_is_default() {
    let file = write_config("");
    let config = OmokConfig::from_file(file.path()).unwrap();
    assert_eq!(config, OmokConfig::default());
}

#[test]
fn test_win_length_longer_than_board_rejected() {
    let file = write_config("[game]\nboard_size = 4\nwin_length = 5\n");
    let err = OmokConfig::from_file(file.path()).unwrap_err();
    assert!(err.message.contains("win_length"));
}

#[test]
fn test_zero_board_rejected() {
    let file = write_config("[game]\nboard_size = 0\nwin_length = 2\n");
    assert!(OmokConfig::from_file(file.path()).is_err());
}

#[test]
fn test_unknown_mode_rejected() {
    let file = write_config("[game]\nmode = \"solo\"\n");
    let err = OmokConfig::from_file(file.path()).unwrap_err();
    assert!(err.message.contains("parse"));
}

#[test]
fn test_write_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("omok.toml");

    let config = OmokConfig::default().with_mode(GameMode::LocalTwoPlayer);
    config.write(&path).unwrap();

    let loaded = OmokConfig::from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = OmokConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, OmokConfig::default());
}

#[test]
fn test_with_mode_overrides_file() {
    let file = write_config("[game]\nmode = \"oracle\"\n");
    let config = OmokConfig::load_or_default(file.path())
        .unwrap()
        .with_mode(GameMode::LocalTwoPlayer);
    assert_eq!(*config.game().mode(), GameMode::LocalTwoPlayer);
}
