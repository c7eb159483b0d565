//! Logging Setup
//!
//! The kiosk owns the terminal, so anything it logs goes to a daily-rotated
//! file under `.moodrx/logs/`. One-shot commands log warnings to stderr.
//! Debug runs (`-d`) always log to the file, at debug level.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_PREFIX: &str = "moodrx";
const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub debug_mode: bool,
    /// Set while a full-screen UI holds the terminal; stderr would draw over it
    pub terminal_owned: bool,
    pub log_dir: PathBuf,
    /// Level used when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self {
            debug_mode: false,
            terminal_owned: false,
            log_dir: default_log_dir(),
            level: "warn".to_string(),
        }
    }

    pub fn with_debug_mode(mut self, debug: bool) -> Self {
        self.debug_mode = debug;
        if debug {
            self.level = "debug".to_string();
        }
        self
    }

    pub fn with_terminal_owned(mut self, owned: bool) -> Self {
        self.terminal_owned = owned;
        self
    }

    /// File output for debug runs and for anything that owns the terminal
    pub fn writes_to_file(&self) -> bool {
        self.debug_mode || self.terminal_owned
    }

    pub fn with_log_dir(mut self, dir: PathBuf) -> Self {
        self.log_dir = dir;
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }
}

/// `./.moodrx/logs`
pub fn default_log_dir() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".moodrx")
        .join("logs")
}

/// Debug log directory: `DEBUG_LOGS_LOCATION`, then the configured
/// directory, then [`default_log_dir`]
pub fn resolve_log_dir(configured: Option<&std::path::Path>) -> PathBuf {
    if let Ok(dir) = std::env::var("DEBUG_LOGS_LOCATION") {
        return PathBuf::from(dir);
    }
    configured
        .map(std::path::Path::to_path_buf)
        .unwrap_or_else(default_log_dir)
}

/// Install the global subscriber.
///
/// Returns the appender guard when logging to a file; it must be held until
/// exit or buffered lines are lost.
pub fn init_logging(config: LogConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .context("Invalid log filter")?;

    if config.writes_to_file() {
        std::fs::create_dir_all(&config.log_dir).with_context(|| {
            format!("Failed to create log directory: {}", config.log_dir.display())
        })?;

        let appender = tracing_appender::rolling::daily(&config.log_dir, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);

        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(true),
            )
            .try_init()
            .context("Failed to install tracing subscriber")?;

        tracing::debug!("Logging to {}", config.log_dir.display());
        Ok(Some(guard))
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr).compact())
            .try_init()
            .context("Failed to install tracing subscriber")?;
        Ok(None)
    }
}

/// Remove log files older than `max_age_days` from `dir`.
/// Returns how many files were removed.
pub fn cleanup_logs_in(dir: &std::path::Path, max_age_days: u64) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let max_age = Duration::from_secs(max_age_days.saturating_mul(SECS_PER_DAY));
    let now = SystemTime::now();
    let mut removed = 0;

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_log = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(LOG_FILE_PREFIX));
        if !is_log {
            continue;
        }

        let Ok(modified) = entry.metadata().and_then(|m| m.modified()) else {
            continue;
        };
        if now.duration_since(modified).unwrap_or_default() > max_age {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
            removed += 1;
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_builder() {
        let config = LogConfig::new()
            .with_debug_mode(true)
            .with_log_dir(PathBuf::from("/tmp/moodrx-logs"));
        assert!(config.debug_mode);
        assert_eq!(config.level, "debug");
        assert_eq!(config.log_dir, PathBuf::from("/tmp/moodrx-logs"));
    }

    #[test]
    fn test_default_level_is_quiet() {
        let config = LogConfig::default();
        assert!(!config.debug_mode);
        assert_eq!(config.level, "warn");
    }

    #[test]
    fn test_kiosk_logs_never_reach_stderr() {
        let one_shot = LogConfig::new();
        assert!(!one_shot.writes_to_file());

        let kiosk = LogConfig::new().with_terminal_owned(true);
        assert!(kiosk.writes_to_file());
        assert_eq!(kiosk.level, "warn");

        assert!(LogConfig::new().with_debug_mode(true).writes_to_file());
    }

    #[test]
    fn test_resolve_log_dir_prefers_configured() {
        if std::env::var("DEBUG_LOGS_LOCATION").is_ok() {
            return;
        }
        let configured = PathBuf::from("/var/log/moodrx");
        assert_eq!(resolve_log_dir(Some(&configured)), configured);
        assert_eq!(resolve_log_dir(None), default_log_dir());
    }

    #[test]
    fn test_cleanup_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert_eq!(cleanup_logs_in(&missing, 7).unwrap(), 0);
    }

    #[test]
    fn test_cleanup_keeps_fresh_logs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("moodrx.2026-10-18"), "fresh").unwrap();
        std::fs::write(dir.path().join("unrelated.txt"), "keep").unwrap();

        assert_eq!(cleanup_logs_in(dir.path(), 7).unwrap(), 0);
        // Zero-day retention removes every log file but nothing else
        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(cleanup_logs_in(dir.path(), 0).unwrap(), 1);
        assert!(dir.path().join("unrelated.txt").exists());
    }

    #[test]
    fn test_cleanup_huge_retention_keeps_everything() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("moodrx.2026-10-18"), "fresh").unwrap();
        assert_eq!(cleanup_logs_in(dir.path(), u64::MAX).unwrap(), 0);
        assert!(dir.path().join("moodrx.2026-10-18").exists());
    }
}
