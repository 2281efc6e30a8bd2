//! Configuration loading for the practice helper.
//!
//! All user-tunable settings are centralized here and loaded from
//! `conf/config.toml` if present. Any missing or invalid entries fall back to
//! sensible defaults so the UI can still launch.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// High-level app configuration; deserializable from TOML.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub theme: ThemeMode,
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
    /// Raster resolution of an uncropped page; the effective DPI is scaled so
    /// the cropped page fills the viewport height.
    #[serde(default = "default_base_dpi")]
    pub base_dpi: f32,
    /// Delay between opening the sheet and starting the backing track, giving
    /// the musician time to pick up the instrument.
    #[serde(default = "default_audio_wait_secs")]
    pub audio_wait_secs: f32,
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            theme: ThemeMode::Day,
            window_width: default_window_width(),
            window_height: default_window_height(),
            base_dpi: default_base_dpi(),
            audio_wait_secs: default_audio_wait_secs(),
            log_level: default_log_level(),
        }
    }
}

/// Theme mode.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeMode {
    Day,
    Night,
}

impl Default for ThemeMode {
    fn default() -> Self {
        ThemeMode::Day
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ThemeMode::Day => "Day",
            ThemeMode::Night => "Night",
        };
        write!(f, "{}", label)
    }
}

/// Load configuration from the given path, falling back to defaults on error.
pub fn load_config(path: &Path) -> AppConfig {
    let contents = match fs::read_to_string(path) {
        Ok(data) => {
            info!(path = %path.display(), "Loaded base config");
            data
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                "Falling back to default config: {err}"
            );
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&contents) {
        Ok(cfg) => {
            debug!("Parsed configuration from disk");
            cfg
        }
        Err(err) => {
            warn!(path = %path.display(), "Invalid config TOML: {err}");
            AppConfig::default()
        }
    }
}

fn default_window_width() -> f32 {
    1600.0
}

fn default_window_height() -> f32 {
    900.0
}

fn default_base_dpi() -> f32 {
    72.0
}

fn default_audio_wait_secs() -> f32 {
    3.0
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: AppConfig = toml::from_str("theme = \"night\"").expect("parse");
        assert_eq!(cfg.theme, ThemeMode::Night);
        assert_eq!(cfg.window_width, default_window_width());
        assert_eq!(cfg.log_level, LogLevel::Info);
    }

    #[test]
    fn empty_config_is_default() {
        let cfg: AppConfig = toml::from_str("").expect("parse");
        assert_eq!(cfg.audio_wait_secs, 3.0);
        assert_eq!(cfg.base_dpi, 72.0);
    }
}
