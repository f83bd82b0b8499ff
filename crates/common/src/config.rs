//! Application configuration.
//!
//! Only the caller-facing knobs live here. The gaze geometry ratios are
//! part of the widget's visual contract and are constants in the crates
//! that use them.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{PeeperError, PeeperResult};

/// Diameter used when a host mounts the widget without choosing a size.
pub const DEFAULT_WIDGET_SIZE: f64 = 35.0;

/// Global application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Widget defaults.
    pub widget: WidgetDefaults,

    /// Blink cadence.
    pub blink: BlinkConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default widget parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetDefaults {
    /// Logical diameter of the widget in pixels.
    pub size: f64,
}

/// Blink timing. Intervals are drawn uniformly from
/// `[min_interval_ms, max_interval_ms)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkConfig {
    pub min_interval_ms: u64,
    pub max_interval_ms: u64,
    /// How long the eyes stay closed.
    pub duration_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "peeper=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for WidgetDefaults {
    fn default() -> Self {
        Self {
            size: DEFAULT_WIDGET_SIZE,
        }
    }
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 2000,
            max_interval_ms: 4000,
            duration_ms: 150,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(path = ?config_path, error = %e, "Ignoring unusable config");
                }
            }
        }
        Self::default()
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: &std::path::Path) -> PeeperResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> PeeperResult<PathBuf> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, json)?;
        Ok(config_path)
    }

    /// Reject values the widget cannot run with.
    pub fn validate(&self) -> PeeperResult<()> {
        if !self.widget.size.is_finite() || self.widget.size <= 0.0 {
            return Err(PeeperError::config(format!(
                "widget.size must be a positive number, got {}",
                self.widget.size
            )));
        }
        self.blink.validate()
    }
}

impl BlinkConfig {
    pub fn validate(&self) -> PeeperResult<()> {
        if self.min_interval_ms >= self.max_interval_ms {
            return Err(PeeperError::config(format!(
                "blink interval range [{}, {}) is empty",
                self.min_interval_ms, self.max_interval_ms
            )));
        }
        if self.duration_ms == 0 {
            return Err(PeeperError::config("blink.duration_ms must be non-zero"));
        }
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("peeper").join("config.json")
}
