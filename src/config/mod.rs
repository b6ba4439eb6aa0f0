//! Configuration loading
//!
//! Precedence is CLI > environment (`JIRAMAP_*`) > config file > defaults.

pub mod loader;

pub use loader::{discover_config, load_config, save_username, user_config_path, LoadedConfig};
