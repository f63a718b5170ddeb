//! Runtime configuration, read from environment variables at start-up.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::error::ConfigError;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".student-roster";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "students.sqlite";
/// Log file written inside the log directory.
pub const LOG_FILE_NAME: &str = "student-roster.log";

pub const ENV_DB_PATH: &str = "STUDENT_ROSTER_DB";
pub const ENV_RESET_ON_LAUNCH: &str = "STUDENT_ROSTER_RESET_ON_LAUNCH";
pub const ENV_LOG_DIR: &str = "STUDENT_ROSTER_LOG_DIR";

/// What the store does with the `students` table when it is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BootstrapMode {
    /// Drop and recreate the table, then insert the seed rows. Every launch
    /// starts from the same five students.
    ResetOnLaunch,
    /// Create and seed the table only if it does not exist yet. A table that
    /// exists but was emptied by the user stays empty.
    #[default]
    SeedOnCreate,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub bootstrap: BootstrapMode,
}

impl AppConfig {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), default_db_path)
    }

    /// Build the configuration from an arbitrary key lookup. `default_db` is
    /// only consulted when no database path is set, so a missing home
    /// directory does not matter once `STUDENT_ROSTER_DB` is given.
    pub fn from_lookup<F, D>(lookup: F, default_db: D) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
        D: FnOnce() -> Result<PathBuf, ConfigError>,
    {
        let db_path = match lookup(ENV_DB_PATH).filter(|value| !value.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => default_db()?,
        };

        let reset = match lookup(ENV_RESET_ON_LAUNCH) {
            Some(raw) => parse_flag(ENV_RESET_ON_LAUNCH, &raw)?,
            None => false,
        };
        let bootstrap = if reset {
            BootstrapMode::ResetOnLaunch
        } else {
            BootstrapMode::SeedOnCreate
        };

        let log_dir = lookup(ENV_LOG_DIR)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| parent_or_current(&db_path));

        Ok(Self {
            db_path,
            log_dir,
            bootstrap,
        })
    }
}

/// Interpret the usual spellings of a boolean switch. Empty counts as off.
pub fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Resolve the absolute path to the SQLite database inside the user's home.
fn default_db_path() -> Result<PathBuf, ConfigError> {
    let base_dirs = BaseDirs::new().ok_or(ConfigError::MissingHome)?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}

fn parent_or_current(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(
            |key| env.get(key).cloned(),
            || Ok(PathBuf::from("/home/u/.student-roster/students.sqlite")),
        )
    }

    #[test]
    fn defaults_seed_only_on_first_install() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bootstrap, BootstrapMode::SeedOnCreate);
        assert_eq!(
            config.db_path,
            PathBuf::from("/home/u/.student-roster/students.sqlite")
        );
        assert_eq!(config.log_dir, PathBuf::from("/home/u/.student-roster"));
    }

    #[test]
    fn reset_flag_selects_destructive_bootstrap() {
        let config = config_from(&[(ENV_RESET_ON_LAUNCH, "TRUE")]).unwrap();
        assert_eq!(config.bootstrap, BootstrapMode::ResetOnLaunch);

        let config = config_from(&[(ENV_RESET_ON_LAUNCH, "off")]).unwrap();
        assert_eq!(config.bootstrap, BootstrapMode::SeedOnCreate);
    }

    #[test]
    fn unknown_flag_value_is_rejected() {
        let err = config_from(&[(ENV_RESET_ON_LAUNCH, "maybe")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFlag { ref value, .. } if value == "maybe"));
    }

    #[test]
    fn explicit_paths_override_defaults() {
        let config = config_from(&[
            (ENV_DB_PATH, "roster.db"),
            (ENV_LOG_DIR, "/var/log/roster"),
        ])
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("roster.db"));
        assert_eq!(config.log_dir, PathBuf::from("/var/log/roster"));
    }

    #[test]
    fn explicit_db_path_skips_home_lookup() {
        let lookup = |key: &str| (key == ENV_DB_PATH).then(|| "/srv/roster.db".to_string());
        let config = AppConfig::from_lookup(lookup, || Err(ConfigError::MissingHome)).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/srv/roster.db"));
    }

    #[test]
    fn missing_home_without_db_path_is_an_error() {
        let err = AppConfig::from_lookup(|_| None, || Err(ConfigError::MissingHome)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingHome));
    }

    #[test]
    fn bare_file_name_logs_next_to_working_directory() {
        let config = config_from(&[(ENV_DB_PATH, "roster.db")]).unwrap();
        assert_eq!(config.log_dir, PathBuf::from("."));
    }
}
