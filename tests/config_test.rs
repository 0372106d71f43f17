//! Integration tests for configuration loading

use mock_feature_service::infra::{Config, SimError};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_config_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();

    let config_content = r#"
[simulation]
tracked_assets = 1200
page_size = 300
dist_step = 0.25
seed = 99

[input]
paths_file = "fixtures/roads.json"

[server]
bind_address = "127.0.0.1"
port = 9091
"#;

    temp_file.write_all(config_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();

    assert_eq!(config.tracked_assets(), 1200);
    assert_eq!(config.page_size(), 300);
    assert_eq!(config.dist_step(), 0.25);
    assert_eq!(config.seed(), Some(99));
    assert_eq!(config.paths_file(), "fixtures/roads.json");
    assert_eq!(config.bind_address(), "127.0.0.1");
    assert_eq!(config.port(), 9091);
    // Sections left out fall back to defaults
    assert_eq!(config.metrics_interval_secs(), 10);
    assert_eq!(config.egress_file(), "pages.jsonl");
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_simulation_section() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[simulation]\npage_size = 0\n").unwrap();
    temp_file.flush().unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();
    assert_eq!(config.tracked_assets(), 50_000);
    assert_eq!(config.page_size(), 0);
    assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));
}

#[test]
fn test_invalid_toml_is_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[simulation\npage_size = ").unwrap();
    temp_file.flush().unwrap();

    assert!(Config::from_file(temp_file.path()).is_err());
}

#[test]
fn test_load_from_path_fallback() {
    let config = Config::load_from_path("/nonexistent/config.toml");
    assert_eq!(config.tracked_assets(), 50_000);
    assert_eq!(config.page_size(), 10_000);
    assert_eq!(config.dist_step(), 0.1);
    assert_eq!(config.config_file(), "default");
}
