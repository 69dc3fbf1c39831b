//! Store configuration
//!
//! Loaded from a TOML file, with `DOKERB_DB_PATH` and `DOKERB_TOKEN_LENGTH`
//! environment overrides:
//!
//! ```toml
//! db_path = "/var/lib/dokerb/sessions.db"
//! token_length = 32
//! log_filter = "dokerb=debug"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::db::{default_db_path, IN_MEMORY_PATH};
use crate::token::{DEFAULT_TOKEN_LENGTH, MIN_TOKEN_LENGTH};

pub const ENV_DB_PATH: &str = "DOKERB_DB_PATH";
pub const ENV_TOKEN_LENGTH: &str = "DOKERB_TOKEN_LENGTH";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{message}")]
    Invalid { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite file, or `:memory:`
    pub db_path: PathBuf,
    /// Length of issued session tokens
    pub token_length: usize,
    /// Tracing filter directive used when `RUST_LOG` is unset
    pub log_filter: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            token_length: DEFAULT_TOKEN_LENGTH,
            log_filter: None,
        }
    }
}

impl StoreConfig {
    /// Configuration for a throwaway in-memory store
    pub fn in_memory() -> Self {
        Self {
            db_path: PathBuf::from(IN_MEMORY_PATH),
            ..Self::default()
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: StoreConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Apply `DOKERB_*` environment variables
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DB_PATH) {
            self.db_path = PathBuf::from(path);
        }

        if let Some(raw) = lookup(ENV_TOKEN_LENGTH) {
            self.token_length = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                message: format!("{ENV_TOKEN_LENGTH} must be a positive integer, got '{raw}'"),
            })?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Install the global tracing subscriber using `log_filter`.
    /// Returns `false` if one was already set.
    pub fn init_logging(&self) -> bool {
        crate::logging::init_logging(self.log_filter.as_deref())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                message: "db_path cannot be empty".to_string(),
            });
        }

        if self.token_length < MIN_TOKEN_LENGTH {
            return Err(ConfigError::Invalid {
                message: format!(
                    "token_length must be >= {MIN_TOKEN_LENGTH}, got {}",
                    self.token_length
                ),
            });
        }

        if let Some(filter) = &self.log_filter {
            EnvFilter::try_new(filter).map_err(|e| ConfigError::Invalid {
                message: format!("log_filter '{filter}' is not a valid directive: {e}"),
            })?;
        }

        Ok(())
    }
}
