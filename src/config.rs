use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

/// Catalog path used when `MEDICINE_CATALOG_PATH` is unset.
pub const DEFAULT_CATALOG_PATH: &str = "medicine.csv";
/// Search cap used when `SEARCH_RESULT_LIMIT` is unset.
pub const DEFAULT_SEARCH_RESULT_LIMIT: usize = 20;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the medicine catalog service.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Delimited text file holding the medicine catalog.
    pub catalog_path: PathBuf,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
    /// Maximum number of records returned by `POST /search`.
    pub search_result_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            server_port: None,
            search_result_limit: DEFAULT_SEARCH_RESULT_LIMIT,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let search_result_limit = match optional("SEARCH_RESULT_LIMIT") {
            Some(value) => match value.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => limit,
                _ => return Err(ConfigError::InvalidValue("SEARCH_RESULT_LIMIT".into())),
            },
            None => DEFAULT_SEARCH_RESULT_LIMIT,
        };

        Ok(Self {
            catalog_path: optional("MEDICINE_CATALOG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH)),
            server_port: optional("SERVER_PORT")
                .map(|value| {
                    value
                        .trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
            search_result_limit,
        })
    }
}

static DOTENV: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Load `.env` into the process environment, at most once per process.
///
/// Variables already present in the environment are left untouched. Returns the file that
/// was loaded, if any. Both [`init_config`] and [`crate::logging::init_tracing`] call this so
/// either may run first.
pub fn load_dotenv() -> Option<&'static Path> {
    DOTENV.get_or_init(|| dotenvy::dotenv().ok()).as_deref()
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, falling back to defaults if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}

/// Load configuration from the environment, apply `overrides`, and install it in the global cache.
pub fn init_config(overrides: impl FnOnce(&mut Config)) -> Result<&'static Config, ConfigError> {
    load_dotenv();
    let mut config = Config::from_env()?;
    overrides(&mut config);
    tracing::debug!(
        catalog_path = %config.catalog_path.display(),
        server_port = ?config.server_port,
        search_result_limit = config.search_result_limit,
        "Loaded configuration"
    );
    if CONFIG.set(config).is_err() {
        tracing::warn!("Configuration already initialized; keeping the existing values");
    }
    Ok(get_config())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = from_pairs(&[]).expect("config");
        assert_eq!(config.catalog_path, PathBuf::from("medicine.csv"));
        assert_eq!(config.server_port, None);
        assert_eq!(config.search_result_limit, 20);
    }

    #[test]
    fn reads_overrides() {
        let config = from_pairs(&[
            ("MEDICINE_CATALOG_PATH", "/data/medicine.csv"),
            ("SERVER_PORT", "8080"),
            ("SEARCH_RESULT_LIMIT", "5"),
        ])
        .expect("config");
        assert_eq!(config.catalog_path, PathBuf::from("/data/medicine.csv"));
        assert_eq!(config.server_port, Some(8080));
        assert_eq!(config.search_result_limit, 5);
    }

    #[test]
    fn blank_values_are_treated_as_unset() {
        let config = from_pairs(&[("SERVER_PORT", "  "), ("MEDICINE_CATALOG_PATH", "")])
            .expect("config");
        assert_eq!(config.server_port, None);
        assert_eq!(config.catalog_path, PathBuf::from(DEFAULT_CATALOG_PATH));
    }

    #[test]
    fn env_file_is_loaded_once() {
        let first = load_dotenv();
        let second = load_dotenv();
        assert_eq!(first, second);
        assert!(DOTENV.get().is_some());
    }

    #[test]
    fn rejects_invalid_numbers() {
        assert!(matches!(
            from_pairs(&[("SERVER_PORT", "eighty")]),
            Err(ConfigError::InvalidValue(key)) if key == "SERVER_PORT"
        ));
        assert!(matches!(
            from_pairs(&[("SEARCH_RESULT_LIMIT", "0")]),
            Err(ConfigError::InvalidValue(key)) if key == "SEARCH_RESULT_LIMIT"
        ));
    }
}
