use intake_config::{default_base_dir, AddressLookupMode, Config, ConfigError, ConfigManager};
use std::fs;
use tempfile::tempdir;

#[test]
fn default_config_matches_shell_defaults() {
    let cfg = Config::default();

    assert_eq!(cfg.guest_login_delay_ms, 500);
    assert_eq!(cfg.log_filter, "move_intake=info");
    assert_eq!(cfg.address_lookup, AddressLookupMode::Static);
    assert!(cfg.data_dir.is_none());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let mut cfg = Config::default();
    cfg.address_lookup = AddressLookupMode::Manual;
    cfg.data_dir = Some(dir.path().join("elsewhere"));
    cfg.guest_login_delay_ms = 0;

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert_eq!(loaded.resolve_data_dir(dir.path()), dir.path().join("elsewhere"));
    assert_eq!(
        Config::default().resolve_data_dir(dir.path()),
        dir.path().join("data")
    );
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("absent.json"));
    assert_eq!(manager.load().expect("load"), Config::default());
}

#[test]
fn partial_file_fills_in_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"address_lookup":"OFF","ui_color_enabled":false}"#).expect("seed");

    let loaded = ConfigManager::new(path).load().expect("load");
    assert_eq!(loaded.address_lookup, AddressLookupMode::Manual);
    assert!(!loaded.ui_color_enabled);
    assert_eq!(loaded.locale, "en-AU");
}

#[test]
fn default_base_dir_is_named_for_the_app() {
    assert!(default_base_dir().ends_with("move-intake"));
}

#[test]
fn first_run_writes_a_default_file() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    assert!(!manager.config_path().exists());

    let cfg = manager.load_or_init().expect("init");
    assert_eq!(cfg, Config::default());
    assert!(manager.config_path().exists());
    assert!(!manager.config_path().with_extension("json.tmp").exists());
}

#[test]
fn malformed_file_names_its_path() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, "{ not json").expect("seed");

    let err = ConfigManager::new(path.clone()).load().unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains(&path.display().to_string()));
}

#[test]
fn reset_removes_the_file() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));
    let mut cfg = Config::default();
    cfg.locale = "en-NZ".into();
    manager.save(&cfg).expect("save");

    assert_eq!(manager.reset().expect("reset"), Config::default());
    assert!(!manager.config_path().exists());
    assert_eq!(manager.load().expect("load"), Config::default());
}
