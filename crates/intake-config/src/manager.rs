use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{Config, ConfigError};

const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";

/// Reads and writes [`Config`] as pretty JSON at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Uses `<base>/config/config.json`, creating the directory.
    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        let dir = base.join(CONFIG_DIR);
        fs::create_dir_all(&dir).map_err(ConfigError::io(&dir))?;
        Ok(Self::new(dir.join(CONFIG_FILE)))
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Missing file means defaults. Keys absent from the file take their
    /// default values.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.config_path)
            .map_err(ConfigError::io(&self.config_path))?;
        serde_json::from_str(&data).map_err(|err| ConfigError::Parse {
            path: self.config_path.clone(),
            message: err.to_string(),
        })
    }

    /// Like [`load`](Self::load), but writes the defaults out on first run so
    /// there is a file to edit.
    pub fn load_or_init(&self) -> Result<Config, ConfigError> {
        if self.config_path.exists() {
            return self.load();
        }
        let config = Config::default();
        self.save(&config)?;
        Ok(config)
    }

    /// Replaces the file through a sibling temp file so a crash never leaves
    /// half a config behind.
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let json =
            serde_json::to_string_pretty(config).map_err(|err| ConfigError::Encode(err.to_string()))?;
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::io(parent))?;
        }
        let staged = self.config_path.with_extension("json.tmp");
        fs::write(&staged, json).map_err(ConfigError::io(&staged))?;
        fs::rename(&staged, &self.config_path).map_err(ConfigError::io(&self.config_path))
    }

    /// Deletes the file; the next load yields defaults.
    pub fn reset(&self) -> Result<Config, ConfigError> {
        if self.config_path.exists() {
            fs::remove_file(&self.config_path).map_err(ConfigError::io(&self.config_path))?;
        }
        Ok(Config::default())
    }
}
