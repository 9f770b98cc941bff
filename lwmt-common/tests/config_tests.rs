//! Unit tests for configuration and graceful degradation
//!
//! - Missing or broken TOML files never stop startup
//! - Data folder priority: CLI > ENV > TOML > compiled default
//! - API keys: ENV > TOML, blank values ignored
//!
//! Tests that touch environment variables are #[serial].

use lwmt_common::config::{
    get_default_root_folder, is_valid_key, resolve_api_key, resolve_root_folder,
    RootFolderInitializer, TomlConfig, DEFAULT_CLIENT_IDLE_SECS, DEFAULT_CLIENT_SWEEP_SECS,
    DEFAULT_LATITUDE, DEFAULT_LOG_FILTER, DEFAULT_PLACES_RADIUS_M, DEFAULT_RECIPE_RESULT_CAP,
};
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};

const TEST_ROOT_ENV: &str = "LWMT_TEST_ROOT_FOLDER";
const TEST_KEY_ENV: &str = "LWMT_TEST_API_KEY";

#[test]
fn test_empty_toml_gives_defaults() {
    let config = TomlConfig::from_toml_str("").unwrap();
    assert_eq!(config, TomlConfig::default());
    assert_eq!(config.logging.level, DEFAULT_LOG_FILTER);
    assert_eq!(config.recipes.result_cap, DEFAULT_RECIPE_RESULT_CAP);
    assert_eq!(config.places.radius_m, DEFAULT_PLACES_RADIUS_M);
    assert_eq!(config.places.default_latitude, DEFAULT_LATITUDE);
    assert_eq!(config.clients.idle_timeout_secs, DEFAULT_CLIENT_IDLE_SECS);
    assert_eq!(config.clients.sweep_interval_secs, DEFAULT_CLIENT_SWEEP_SECS);
}

#[test]
fn test_full_toml_parses() {
    let config = TomlConfig::from_toml_str(
        r#"
        root_folder = "/srv/lwmt"
        spoonacular_api_key = "spoon"
        google_maps_api_key = "maps"

        [logging]
        level = "debug"

        [recipes]
        result_cap = 5

        [places]
        radius_m = 2500

        [clients]
        idle_timeout_secs = 600
        "#,
    )
    .unwrap();

    assert_eq!(config.root_folder.as_deref(), Some("/srv/lwmt"));
    assert_eq!(config.spoonacular_api_key.as_deref(), Some("spoon"));
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.recipes.result_cap, 5);
    assert_eq!(config.places.radius_m, 2500);
    // Unspecified fields of a present section keep their defaults
    assert_eq!(config.places.default_latitude, DEFAULT_LATITUDE);
    assert_eq!(config.clients.idle_timeout_secs, 600);
    assert_eq!(config.clients.sweep_interval_secs, DEFAULT_CLIENT_SWEEP_SECS);
}

#[test]
fn test_malformed_toml_is_config_error() {
    assert!(TomlConfig::from_toml_str("root_folder = [").is_err());
}

#[test]
fn test_load_missing_file_degrades_to_defaults() {
    let config = TomlConfig::load(Some(Path::new("/nonexistent/lwmt/config.toml")));
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_load_broken_file_degrades_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not toml = = =").unwrap();

    let config = TomlConfig::load(Some(&path));
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_load_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[recipes]\nresult_cap = 3\n").unwrap();

    let config = TomlConfig::load(Some(&path));
    assert_eq!(config.recipes.result_cap, 3);
}

#[test]
#[serial]
fn test_root_folder_cli_wins() {
    env::set_var(TEST_ROOT_ENV, "/tmp/from-env");
    let toml = TomlConfig {
        root_folder: Some("/tmp/from-toml".to_string()),
        ..Default::default()
    };

    let resolved = resolve_root_folder(Some(Path::new("/tmp/from-cli")), TEST_ROOT_ENV, &toml);
    assert_eq!(resolved, PathBuf::from("/tmp/from-cli"));

    env::remove_var(TEST_ROOT_ENV);
}

#[test]
#[serial]
fn test_root_folder_env_beats_toml() {
    env::set_var(TEST_ROOT_ENV, "/tmp/from-env");
    let toml = TomlConfig {
        root_folder: Some("/tmp/from-toml".to_string()),
        ..Default::default()
    };

    assert_eq!(
        resolve_root_folder(None, TEST_ROOT_ENV, &toml),
        PathBuf::from("/tmp/from-env")
    );

    env::remove_var(TEST_ROOT_ENV);
}

#[test]
#[serial]
fn test_root_folder_falls_back_to_toml_then_default() {
    env::remove_var(TEST_ROOT_ENV);

    let toml = TomlConfig {
        root_folder: Some("/tmp/from-toml".to_string()),
        ..Default::default()
    };
    assert_eq!(
        resolve_root_folder(None, TEST_ROOT_ENV, &toml),
        PathBuf::from("/tmp/from-toml")
    );

    assert_eq!(
        resolve_root_folder(None, TEST_ROOT_ENV, &TomlConfig::default()),
        get_default_root_folder()
    );
}

#[test]
fn test_initializer_creates_layout() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("data");
    let initializer = RootFolderInitializer::new(root.clone());

    initializer.ensure_directory_exists().unwrap();

    assert!(root.is_dir());
    assert!(initializer.local_store_dir().is_dir());
    assert_eq!(initializer.database_path(), root.join("lwmt.db"));
}

#[test]
fn test_is_valid_key() {
    assert!(is_valid_key("abc"));
    assert!(!is_valid_key(""));
    assert!(!is_valid_key("   "));
}

#[test]
#[serial]
fn test_api_key_env_beats_toml() {
    env::set_var(TEST_KEY_ENV, "env-key");
    assert_eq!(
        resolve_api_key("Test", TEST_KEY_ENV, Some("toml-key")).as_deref(),
        Some("env-key")
    );
    env::remove_var(TEST_KEY_ENV);
}

#[test]
#[serial]
fn test_api_key_blank_env_falls_back_to_toml() {
    env::set_var(TEST_KEY_ENV, "  ");
    assert_eq!(
        resolve_api_key("Test", TEST_KEY_ENV, Some("toml-key")).as_deref(),
        Some("toml-key")
    );
    env::remove_var(TEST_KEY_ENV);
}

#[test]
#[serial]
fn test_api_key_missing_everywhere_is_none() {
    env::remove_var(TEST_KEY_ENV);
    assert!(resolve_api_key("Test", TEST_KEY_ENV, None).is_none());
    assert!(resolve_api_key("Test", TEST_KEY_ENV, Some("")).is_none());
}
