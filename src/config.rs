//! Configuration read from environment variables:
//! - `TASKBUDDY_DATA_FILE` - Optional. Task store file, or `:memory:` to keep nothing on disk.
//!   Defaults to `taskbuddy.json`.
//! - `TASKBUDDY_USER_ID` - Optional. Local user id. Defaults to `local`.
//! - `TASKBUDDY_USER_EMAIL` - Optional. Local user email.
//! - `TASKBUDDY_PHOTO_URL` - Optional. Local user avatar.
//! - `TASKBUDDY_LOG_FILE` - Optional. Log destination. Defaults to `taskbuddy.log`.
//! - `TASKBUDDY_DEFAULT_CATEGORY` - Optional. Category for new tasks. Defaults to `Work`.
//! - `TASKBUDDY_CATEGORY_FILTER` - Optional. Category shown at startup. Defaults to `all`.
//! - `TASKBUDDY_DUE_FILTER` - Optional. `all`, `today`, `week` or `month`. Defaults to `all`.
//! - `RUST_LOG` - Optional. Log filter. Defaults to `taskbuddy=info`.

use crate::backend::User;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_file: PathBuf,
    pub log_file: PathBuf,
    pub user: User,
    pub default_category: String,
    pub category_filter: String,
    pub due_filter: String,
    pub log_filter: String,
}

/// Value of `TASKBUDDY_DATA_FILE` that selects the in-memory store.
pub const IN_MEMORY: &str = ":memory:";

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = |key: &str, default: &str| -> Result<PathBuf, ConfigError> {
            match lookup(key) {
                Some(v) if v.trim().is_empty() => Err(ConfigError::InvalidValue(
                    key.to_string(),
                    "path must not be empty".to_string(),
                )),
                Some(v) => Ok(PathBuf::from(v)),
                None => Ok(PathBuf::from(default)),
            }
        };
        let data_file = path("TASKBUDDY_DATA_FILE", "taskbuddy.json")?;
        let log_file = path("TASKBUDDY_LOG_FILE", "taskbuddy.log")?;

        let user = User {
            uid: lookup("TASKBUDDY_USER_ID")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "local".to_string()),
            email: lookup("TASKBUDDY_USER_EMAIL").filter(|v| !v.is_empty()),
            photo_url: lookup("TASKBUDDY_PHOTO_URL").filter(|v| !v.is_empty()),
        };

        let default_category = lookup("TASKBUDDY_DEFAULT_CATEGORY")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "Work".to_string());

        let category_filter = lookup("TASKBUDDY_CATEGORY_FILTER")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "all".to_string());
        let due_filter = match lookup("TASKBUDDY_DUE_FILTER") {
            None => "all".to_string(),
            Some(v) if ["all", "today", "week", "month"].contains(&v.as_str()) => v,
            Some(v) => {
                return Err(ConfigError::InvalidValue(
                    "TASKBUDDY_DUE_FILTER".to_string(),
                    format!("unknown bucket {:?}", v),
                ))
            }
        };

        let log_filter = lookup("RUST_LOG").unwrap_or_else(|| "taskbuddy=info".to_string());

        Ok(Self {
            data_file,
            log_file,
            user,
            default_category,
            category_filter,
            due_filter,
            log_filter,
        })
    }

    pub fn is_in_memory(&self) -> bool {
        self.data_file.as_os_str() == IN_MEMORY
    }
}
