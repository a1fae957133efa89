use serde::{de::Deserializer, Deserialize, Serialize};
use std::{
    fmt,
    path::{Path, PathBuf},
};

pub const DEFAULT_LOG_FILTER: &str = "move_intake=info";
const DATA_DIR_NAME: &str = "move-intake";

/// Preferences read at shell start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default = "Config::default_log_filter")]
    pub log_filter: String,
    #[serde(default = "Config::default_guest_login_delay_ms")]
    pub guest_login_delay_ms: u64,
    #[serde(default)]
    pub address_lookup: AddressLookupMode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Where the draft store lives. Defaults to `<base>/data`.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Self::default_locale(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            log_filter: Self::default_log_filter(),
            guest_login_delay_ms: Self::default_guest_login_delay_ms(),
            address_lookup: AddressLookupMode::default(),
            data_dir: None,
        }
    }
}

impl Config {
    pub fn default_locale() -> String {
        "en-AU".into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_log_filter() -> String {
        DEFAULT_LOG_FILTER.into()
    }

    pub fn default_guest_login_delay_ms() -> u64 {
        500
    }

    /// Directory holding the draft store, relative to `base` unless set.
    pub fn resolve_data_dir(&self, base: &Path) -> PathBuf {
        match &self.data_dir {
            Some(path) => path.clone(),
            None => base.join("data"),
        }
    }
}

/// Platform default for the shell's base directory.
pub fn default_base_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    base.join(DATA_DIR_NAME)
}

/// Which address provider the shell wires into the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AddressLookupMode {
    #[default]
    Static,
    Manual,
}

impl AddressLookupMode {
    pub fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "manual" | "off" | "none" => AddressLookupMode::Manual,
            _ => AddressLookupMode::Static,
        }
    }
}

impl fmt::Display for AddressLookupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AddressLookupMode::Static => "static",
            AddressLookupMode::Manual => "manual",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for AddressLookupMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .map(|v| AddressLookupMode::from_str(&v))
            .unwrap_or_default())
    }
}
