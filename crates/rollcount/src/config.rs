//! Configuration file support for rollcount.
//!
//! Loads configuration from `rollcount.toml` in a caller-chosen directory.

use anyhow::{Context, Result};
use rollcount_logging::{LogFormat, WorkerGuard};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The config file name
pub const CONFIG_FILE_NAME: &str = "rollcount.toml";

pub const DEFAULT_COUNTERS_FILE: &str = "statistics.json";
pub const DEFAULT_OVERRIDES_FILE: &str = "override_ids.json";

/// Store configuration loaded from `rollcount.toml`
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Directory holding both JSON files (default: `<data dir>/rollcount`)
    pub data_dir: Option<PathBuf>,
    /// Counter snapshot file name, relative to `data_dir`
    pub counters_file: Option<String>,
    /// Override map file name, relative to `data_dir`
    pub overrides_file: Option<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[logging]` section
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `rollcount_core=debug`
    pub level: Option<String>,
    pub format: Option<LogFormat>,
    /// Also write daily-rotated JSON logs here
    pub log_dir: Option<PathBuf>,
}

impl StoreConfig {
    /// Load configuration from `dir`.
    ///
    /// Returns:
    /// - `Ok(Some(config))` if file exists and parses successfully
    /// - `Ok(None)` if file does not exist
    /// - `Err(...)` if file exists but fails to parse (hard error)
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: StoreConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Ok(Some(config))
    }

    /// Configured data directory, or the platform data dir.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("rollcount")
        })
    }

    pub fn counters_path(&self) -> PathBuf {
        self.data_dir()
            .join(self.counters_file.as_deref().unwrap_or(DEFAULT_COUNTERS_FILE))
    }

    pub fn overrides_path(&self) -> PathBuf {
        self.data_dir()
            .join(self.overrides_file.as_deref().unwrap_or(DEFAULT_OVERRIDES_FILE))
    }
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    pub fn format(&self) -> LogFormat {
        self.format.unwrap_or_default()
    }

    /// Install the tracing subscriber described by this section.
    ///
    /// A guard is returned only when `log_dir` is set and this call installed
    /// the subscriber; keep it alive so the file writer flushes on shutdown.
    /// If a subscriber was already installed nothing changes and `None` is
    /// returned.
    pub fn init(&self) -> Result<Option<WorkerGuard>> {
        match self.log_dir {
            Some(ref dir) => rollcount_logging::init_tracing_with_file(
                self.level(),
                self.format(),
                dir,
            )
            .with_context(|| format!("Failed to open log directory {}", dir.display())),
            None => {
                rollcount_logging::init_tracing(self.level(), self.format());
                Ok(None)
            }
        }
    }
}
