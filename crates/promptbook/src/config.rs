//! Configuration file support for promptbook.
//!
//! Loads `promptbook.toml` from the working directory, falling back to the
//! user config directory (`~/.config/promptbook/promptbook.toml`).

use anyhow::{Context, Result};
use promptbook_db::{Database, SortOrder};
use promptbook_logging::{LogFormat, DEFAULT_LEVEL};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings loaded from `promptbook.toml`
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Path to the SQLite database file
    pub database: Option<PathBuf>,
    /// Default listing order (`newest` or `oldest`)
    pub sort: Option<SortOrder>,
    /// Tracing filter, e.g. `info` or `promptbook_db=debug`
    pub log_level: Option<String>,
    /// Log output format (`pretty`, `json`, `compact`)
    pub log_format: Option<LogFormat>,
}

/// The config file name
pub const CONFIG_FILE_NAME: &str = "promptbook.toml";

impl AppConfig {
    /// Load configuration, trying the working directory first and then the
    /// user config directory.
    ///
    /// Returns:
    /// - `Ok(Some(config))` if a file exists and parses successfully
    /// - `Ok(None)` if no file exists
    /// - `Err(...)` if a file exists but fails to parse (hard error)
    pub fn load(working_dir: &Path) -> Result<Option<Self>> {
        let mut candidates = vec![working_dir.join(CONFIG_FILE_NAME)];
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("promptbook").join(CONFIG_FILE_NAME));
        }

        for path in candidates {
            if let Some(config) = Self::load_from(&path)? {
                return Ok(Some(config));
            }
        }

        Ok(None)
    }

    /// Load a single config file; `Ok(None)` if it does not exist.
    pub fn load_from(config_path: &Path) -> Result<Option<Self>> {
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Ok(Some(config))
    }

    /// Effective database path.
    /// Priority: --db > config `database` > default data dir
    pub fn database_path(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.database.clone())
            .unwrap_or_else(Database::default_path)
    }

    /// Effective listing order.
    /// Priority: --sort > config `sort` > newest first
    pub fn sort_order(&self, flag: Option<SortOrder>) -> SortOrder {
        flag.or(self.sort).unwrap_or_default()
    }

    /// Effective log level.
    /// Priority: --log-level > config `log_level` > warn
    pub fn log_level<'a>(&'a self, flag: Option<&'a str>) -> &'a str {
        flag.or(self.log_level.as_deref()).unwrap_or(DEFAULT_LEVEL)
    }

    /// Effective log format.
    /// Priority: --log-format > config `log_format` > pretty
    pub fn log_format(&self, flag: Option<LogFormat>) -> LogFormat {
        flag.or(self.log_format).unwrap_or_default()
    }
}
