//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use dl_core::RetentionSettings;
use dl_core::retention::{DEFAULT_RETENTION_DAYS, MAX_RETENTION_DAYS, MIN_RETENTION_DAYS};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,
    /// History retention applied when a day is closed.
    #[serde(default)]
    pub retention: RetentionConfig,
}

/// The `[retention]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionConfig {
    pub enabled: bool,
    pub days: i64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            days: DEFAULT_RETENTION_DAYS,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_path", &self.database_path)
            .field("retention", &self.retention)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("daylog.db"),
            retention: RetentionConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Later sources win: defaults, the user config file, `config_path`,
    /// then `DAYLOG_*` environment variables (`__` separates nested keys).
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("DAYLOG_").split("__"));

        figment.extract()
    }

    /// Retention settings for the engine, with the window clamped into range.
    pub fn retention_settings(&self) -> RetentionSettings {
        let days = self
            .retention
            .days
            .clamp(MIN_RETENTION_DAYS, MAX_RETENTION_DAYS);
        if days != self.retention.days {
            tracing::warn!(
                configured = self.retention.days,
                used = days,
                "retention.days out of range, clamped"
            );
        }
        RetentionSettings {
            enabled: self.retention.enabled,
            retention_days: Some(days),
        }
    }
}

/// Returns the platform-specific config directory for daylog.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("daylog"))
}

/// Returns the platform-specific data directory for daylog.
///
/// On Linux: `~/.local/share/daylog`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("daylog"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_retention(enabled: bool, days: i64) -> Config {
        Config {
            database_path: PathBuf::from("daylog.db"),
            retention: RetentionConfig { enabled, days },
        }
    }

    #[test]
    fn test_dirs_data_path_ends_with_daylog() {
        let path = dirs_data_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "daylog");
    }

    #[test]
    fn test_default_config_uses_data_dir_for_db() {
        let config = Config::default();
        let data_dir = dirs_data_path().unwrap();
        assert_eq!(config.database_path, data_dir.join("daylog.db"));
        assert_eq!(config.retention, RetentionConfig::default());
    }

    #[test]
    fn test_retention_is_disabled_by_default() {
        let settings = Config::default().retention_settings();
        assert!(!settings.enabled);
        assert_eq!(settings.retention_days, Some(180));
    }

    #[test]
    fn test_retention_days_are_clamped() {
        assert_eq!(with_retention(true, 5).retention_settings().retention_days, Some(30));
        assert_eq!(with_retention(true, 9000).retention_settings().retention_days, Some(3650));
        assert_eq!(with_retention(true, 90).retention_settings().retention_days, Some(90));
    }

    #[test]
    fn test_explicit_config_file_is_loaded() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        let db_path = temp.path().join("custom.db");
        std::fs::write(
            &path,
            format!(
                "database_path = {:?}\n\n[retention]\nenabled = true\ndays = 45\n",
                db_path.display().to_string()
            ),
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.database_path, db_path);
        assert_eq!(
            config.retention,
            RetentionConfig {
                enabled: true,
                days: 45
            }
        );
    }

    #[test]
    fn test_partial_retention_section_keeps_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[retention]\nenabled = true\n").unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert!(config.retention.enabled);
        assert_eq!(config.retention.days, DEFAULT_RETENTION_DAYS);
    }
}
