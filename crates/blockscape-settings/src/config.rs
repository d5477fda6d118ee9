//! Configuration and settings management for Blockscape
//!
//! Supports JSON and TOML files; the format follows the file extension.
//!
//! Configuration is organized into sections:
//! - Scene settings (canvas, hit testing, default catchment)
//! - History settings (undo depth)
//! - Event settings (bus capacity and history)

use blockscape_core::EventBusConfig;
use blockscape_operations::OperationManagerConfig;
use blockscape_scene::SceneConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

/// Scene settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Canvas width; catchment radii scale with it
    pub canvas_width: f64,
    /// Canvas height
    pub canvas_height: f64,
    /// Pointer hit radius in canvas units
    pub hit_radius: f64,
    /// Catchment area for new modifiers, as a fraction of the canvas width
    pub default_catchment_area: f64,
}

impl Default for SceneSettings {
    fn default() -> Self {
        let scene = SceneConfig::default();
        Self {
            canvas_width: scene.canvas_width,
            canvas_height: scene.canvas_height,
            hit_radius: scene.hit_radius,
            default_catchment_area: scene.default_catchment_area,
        }
    }
}

impl From<&SceneSettings> for SceneConfig {
    fn from(settings: &SceneSettings) -> Self {
        SceneConfig {
            canvas_width: settings.canvas_width,
            canvas_height: settings.canvas_height,
            hit_radius: settings.hit_radius,
            default_catchment_area: settings.default_catchment_area,
        }
    }
}

/// Undo history settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Undo entries kept before the oldest is disposed. Zero keeps everything.
    pub max_depth: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_depth: OperationManagerConfig::default().max_depth,
        }
    }
}

impl From<&HistorySettings> for OperationManagerConfig {
    fn from(settings: &HistorySettings) -> Self {
        OperationManagerConfig {
            max_depth: settings.max_depth,
        }
    }
}

/// Event bus settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventSettings {
    /// Broadcast channel capacity
    pub channel_capacity: usize,
    /// Keep published events for inspection
    pub enable_history: bool,
    /// Maximum number of events kept
    pub max_history_size: usize,
    /// How long events are kept, in seconds
    pub history_retention_secs: u64,
}

impl Default for EventSettings {
    fn default() -> Self {
        let bus = EventBusConfig::default();
        Self {
            channel_capacity: bus.channel_capacity,
            enable_history: bus.enable_history,
            max_history_size: bus.max_history_size,
            history_retention_secs: bus.history_retention.as_secs(),
        }
    }
}

impl From<&EventSettings> for EventBusConfig {
    fn from(settings: &EventSettings) -> Self {
        EventBusConfig {
            channel_capacity: settings.channel_capacity,
            enable_history: settings.enable_history,
            max_history_size: settings.max_history_size,
            history_retention: Duration::from_secs(settings.history_retention_secs),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub scene: SceneSettings,
    pub history: HistorySettings,
    pub events: EventSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::of(path)?;
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::LoadError {
            path: path.display().to_string(),
            source,
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load config from `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::SaveError {
                path: parent.display().to_string(),
                source,
            })?;
        }
        std::fs::write(path, content).map_err(|source| SettingsError::SaveError {
            path: path.display().to_string(),
            source,
        })?;

        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let scene = &self.scene;
        for (key, value) in [
            ("scene.canvas_width", scene.canvas_width),
            ("scene.canvas_height", scene.canvas_height),
            ("scene.hit_radius", scene.hit_radius),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::out_of_range(key, value));
            }
        }

        // Catchment is a fraction of the canvas width
        let area = scene.default_catchment_area;
        if !(area > 0.0 && area <= 1.0) {
            return Err(ConfigError::out_of_range("scene.default_catchment_area", area));
        }

        if self.events.channel_capacity == 0 {
            return Err(ConfigError::out_of_range("events.channel_capacity", 0));
        }

        Ok(())
    }

    pub fn scene_config(&self) -> SceneConfig {
        SceneConfig::from(&self.scene)
    }

    pub fn operation_manager_config(&self) -> OperationManagerConfig {
        OperationManagerConfig::from(&self.history)
    }

    pub fn event_bus_config(&self) -> EventBusConfig {
        EventBusConfig::from(&self.events)
    }
}

/// Platform config file location, e.g. `~/.config/blockscape/config.toml`.
pub fn default_config_path() -> SettingsResult<PathBuf> {
    let dir = dirs::config_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| SettingsError::ConfigDirectory("no config or home directory".to_string()))?;
    Ok(dir.join("blockscape").join("config.toml"))
}
