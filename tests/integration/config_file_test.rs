//! Loading configuration from TOML files

use marketsync::client::Config;
use marketsync::shared::{AppConfig, ConfigError};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn test_partial_file_keeps_defaults() {
    let file = write_config("message_poll_ms = 2500\n");

    let config = AppConfig::load(file.path()).unwrap();
    assert_eq!(config.message_poll_ms, 2_500);
    assert_eq!(config.conversation_poll_ms, 10_000);
    assert!(config.request_timeout_ms.is_none());
}

#[test]
fn test_full_file() {
    let file = write_config(
        r#"
server_url = "https://books.example.com/"
conversation_poll_ms = 15000
message_poll_ms = 3000
request_timeout_ms = 8000
"#,
    );

    let config = Config::from_app(AppConfig::load(file.path()).unwrap());
    assert_eq!(config.conversation_poll_interval(), Duration::from_secs(15));
    assert_eq!(config.message_poll_interval(), Duration::from_secs(3));
    assert_eq!(config.request_timeout(), Some(Duration::from_secs(8)));
    if std::env::var("MARKETSYNC_API_URL").is_err() {
        assert_eq!(
            config.api_url("/api/wishlist"),
            "https://books.example.com/api/wishlist"
        );
    }
}

#[test]
fn test_unknown_key_is_rejected() {
    let file = write_config("poll_everything = true\n");
    assert!(matches!(
        AppConfig::load(file.path()),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_zero_interval_is_rejected() {
    let file = write_config("conversation_poll_ms = 0\n");
    assert_eq!(
        AppConfig::load(file.path()),
        Err(ConfigError::InvalidValue("conversation_poll_ms"))
    );
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    assert!(matches!(
        AppConfig::load(&missing),
        Err(ConfigError::Io { .. })
    ));
}
