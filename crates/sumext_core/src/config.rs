//! Environment-driven configuration.
//!
//! The extension has no config file; the embedding process opts into file
//! logging by exporting `SUMEXT_LOG_DIR` before the module is imported.

use crate::logging::{default_log_level, init_logging, LogLevel};
use std::path::PathBuf;

/// Absolute directory for rolling log files. Unset or blank disables logging.
pub const LOG_DIR_ENV: &str = "SUMEXT_LOG_DIR";
/// Log level name; unset or blank falls back to [`default_log_level`].
pub const LOG_LEVEL_ENV: &str = "SUMEXT_LOG_LEVEL";

/// Logging settings resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub log_dir: PathBuf,
}

impl LoggingConfig {
    /// Reads the process environment. `Ok(None)` means logging stays off.
    pub fn from_env() -> Result<Option<Self>, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup`, trimming every value.
    ///
    /// # Errors
    /// - `SUMEXT_LOG_LEVEL` names an unknown level while `SUMEXT_LOG_DIR` is set.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, String> {
        let Some(log_dir) = non_blank(lookup(LOG_DIR_ENV)) else {
            return Ok(None);
        };
        let level = match non_blank(lookup(LOG_LEVEL_ENV)) {
            Some(raw) => LogLevel::parse(&raw)?,
            None => default_log_level(),
        };
        Ok(Some(Self {
            level,
            log_dir: PathBuf::from(log_dir),
        }))
    }

    /// Starts file logging with these settings.
    ///
    /// The directory is checked by [`init_logging`] (absolute, creatable).
    pub fn apply(&self) -> Result<(), String> {
        let log_dir = self
            .log_dir
            .to_str()
            .ok_or_else(|| format!("log_dir is not valid UTF-8: `{}`", self.log_dir.display()))?;
        init_logging(self.level.as_str(), log_dir)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}
