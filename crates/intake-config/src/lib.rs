//! intake-config
//!
//! User preferences for the intake shell and their JSON persistence.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{default_base_dir, AddressLookupMode, Config, DEFAULT_LOG_FILTER};
