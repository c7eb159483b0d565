//! Configuration Module
//!
//! Handles kiosk configuration loading, validation, and saving.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::locale;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote analysis service
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Camera capture program
    #[serde(default)]
    pub camera: CameraConfig,

    /// Visual theme
    #[serde(default)]
    pub theme: ThemeConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Full URL of the analyze endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Message shown when a failed response carries no `error` field
    #[serde(default = "default_fallback_error")]
    pub fallback_error: String,
}

fn default_endpoint() -> String {
    "http://localhost:5000/analyze".to_string()
}

fn default_fallback_error() -> String {
    locale::ANALYSIS_FAILED.to_string()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            fallback_error: default_fallback_error(),
        }
    }
}

/// External program that prints one JPEG frame to stdout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_program")]
    pub program: String,

    #[serde(default = "default_camera_args")]
    pub args: Vec<String>,

    /// A capture that runs longer than this is killed and reported as failed
    #[serde(default = "default_camera_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_camera_timeout_secs() -> u64 {
    10
}

fn default_camera_program() -> String {
    "ffmpeg".to_string()
}

fn default_camera_args() -> Vec<String> {
    [
        "-loglevel",
        "error",
        "-f",
        "v4l2",
        "-i",
        "/dev/video0",
        "-frames:v",
        "1",
        "-f",
        "image2pipe",
        "-vcodec",
        "mjpeg",
        "-",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            program: default_camera_program(),
            args: default_camera_args(),
            timeout_secs: default_camera_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// One of `clinic`, `paper`, `midnight`
    #[serde(default = "default_theme")]
    pub name: String,
}

fn default_theme() -> String {
    "clinic".to_string()
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: default_theme(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log directory override for debug mode
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. Default values
    /// 2. System config: ~/.config/moodrx/config.toml
    /// 3. Local config: ./moodrx.toml
    /// 4. Environment variables
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        for path in Self::layer_paths() {
            config = Self::from_file(&path)?;
        }

        config.apply_env_overrides();
        Ok(config)
    }

    /// Existing config files `load` reads, lowest priority first
    pub fn layer_paths() -> Vec<PathBuf> {
        Self::system_config_path()
            .into_iter()
            .chain(std::iter::once(Self::local_config_path()))
            .filter(|path| path.exists())
            .collect()
    }

    /// Load configuration from a specific file path, then apply env overrides
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {:?}", path);
        }

        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// ~/.config/moodrx/config.toml
    pub fn system_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("moodrx").join("config.toml"))
    }

    /// ./moodrx.toml
    pub fn local_config_path() -> PathBuf {
        PathBuf::from("./moodrx.toml")
    }

    /// A file replaces the layer below it wholesale; unset sections fall
    /// back to defaults through serde.
    fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(endpoint) = std::env::var("MOODRX_ENDPOINT") {
            self.analysis.endpoint = endpoint;
        }

        if let Ok(theme) = std::env::var("MOODRX_THEME") {
            self.theme.name = theme;
        }

        if let Ok(level) = std::env::var("MOODRX_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Ok(program) = std::env::var("MOODRX_CAMERA_PROGRAM") {
            self.camera.program = program;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            anyhow::bail!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            );
        }

        let endpoint = self.analysis.endpoint.trim();
        if endpoint.is_empty() {
            anyhow::bail!("analysis.endpoint is empty");
        }
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            anyhow::bail!("analysis.endpoint must be an http(s) URL: {}", endpoint);
        }

        if self.camera.program.trim().is_empty() {
            anyhow::bail!("camera.program is empty");
        }
        if self.camera.timeout_secs == 0 {
            anyhow::bail!("camera.timeout_secs must be at least 1");
        }

        Ok(())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        fs::write(path, toml_string)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        tracing::info!("Configuration saved to: {:?}", path);
        Ok(())
    }
}
