//! Blockscape Settings Crate
//!
//! Loads, validates and saves the application configuration and turns it
//! into the runtime configuration of the scene, the operation manager and
//! the event bus.

pub mod config;
pub mod error;

pub use config::{default_config_path, Config, EventSettings, HistorySettings, SceneSettings};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
