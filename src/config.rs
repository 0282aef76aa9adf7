use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DB_PATH_VAR: &str = "QUOTE_VAULT_DB_PATH";
const AUTO_SEED_VAR: &str = "QUOTE_VAULT_AUTO_SEED";
const LOG_LEVEL_VAR: &str = "QUOTE_VAULT_LOG_LEVEL";
const LOG_FILE_VAR: &str = "QUOTE_VAULT_LOG_FILE";

const DEFAULT_DIR_NAME: &str = ".quote-vault";
const DEFAULT_DB_FILE: &str = "quotes.db";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable {key}: {value}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Offending value.
        value: String,
    },
}

/// Runtime configuration for the Quote Vault server.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file holding the quote collection.
    pub database_path: PathBuf,
    /// Seed the curated quote set when the database is empty.
    pub auto_seed: bool,
    /// Tracing level directive used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Optional file receiving a copy of the log stream.
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset so an exported-but-empty variable falls back to its
    /// default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let load = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_path = match load(DB_PATH_VAR) {
            Some(raw) => expand_home(raw.trim(), home_dir().as_deref()),
            None => default_database_path(home_dir().as_deref()),
        };

        let auto_seed = load(AUTO_SEED_VAR)
            .map(|value| {
                parse_bool(&value).ok_or_else(|| ConfigError::InvalidValue {
                    key: AUTO_SEED_VAR.into(),
                    value,
                })
            })
            .transpose()?
            .unwrap_or(true);

        let log_level = load(LOG_LEVEL_VAR)
            .map(|value| normalize_log_level(&value))
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.into());

        Ok(Self {
            database_path,
            auto_seed,
            log_level,
            log_file: load(LOG_FILE_VAR).map(PathBuf::from),
        })
    }
}

/// Translate conventional level names (`WARNING`, `CRITICAL`) into tracing directives.
pub fn normalize_log_level(value: &str) -> String {
    match value.trim().to_lowercase().as_str() {
        "warning" => "warn".into(),
        "critical" | "fatal" => "error".into(),
        other => other.to_string(),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn default_database_path(home: Option<&Path>) -> PathBuf {
    home.map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
        .join(DEFAULT_DB_FILE)
}

fn expand_home(raw: &str, home: Option<&Path>) -> PathBuf {
    match (raw.strip_prefix('~'), home) {
        (Some(rest), Some(home)) => home.join(rest.trim_start_matches(['/', '\\'])),
        _ => PathBuf::from(raw),
    }
}
