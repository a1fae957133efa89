use std::{path::PathBuf, sync::Mutex};

use intake_config::{Config, ConfigManager};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated `MOVE_INTAKE_HOME` with instant guest login and plain output.
pub fn setup_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let manager = ConfigManager::with_base_dir(base.clone()).expect("create config manager");
    let config = Config {
        guest_login_delay_ms: 0,
        ui_color_enabled: false,
        ..Config::default()
    };
    manager.save(&config).expect("write test config");
    base
}
