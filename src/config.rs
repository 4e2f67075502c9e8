// Record store client configuration

use std::collections::HashMap;
use std::env::{self, VarError};
use std::time::Duration;
use thiserror::Error;

pub const ENV_BASE_URL: &str = "RECORD_STORE_URL";
pub const ENV_API_KEY: &str = "RECORD_STORE_API_KEY";
pub const ENV_TIMEOUT_MS: &str = "RECORD_STORE_TIMEOUT_MS";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing configuration value: {0}")]
    Missing(&'static str),

    #[error("Invalid configuration value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            api_key: String::new(),
            timeout_ms: 10_000,
        }
    }
}

impl StoreConfig {
    /// Read the configuration from the process environment.
    ///
    /// Only the store keys are read; other variables are never inspected.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut vars = HashMap::new();
        for key in [ENV_BASE_URL, ENV_API_KEY, ENV_TIMEOUT_MS] {
            match env::var(key) {
                Ok(value) => {
                    vars.insert(key.to_string(), value);
                }
                Err(VarError::NotPresent) => {}
                Err(VarError::NotUnicode(raw)) => {
                    return Err(ConfigError::Invalid {
                        key,
                        value: raw.to_string_lossy().into_owned(),
                    })
                }
            }
        }
        Self::from_vars(vars)
    }

    // Base URL and API key are required; the timeout falls back to the default
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let base_url = vars
            .get(ENV_BASE_URL)
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing(ENV_BASE_URL))?;

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                key: ENV_BASE_URL,
                value: base_url,
            });
        }

        let api_key = vars
            .get(ENV_API_KEY)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing(ENV_API_KEY))?;

        let timeout_ms = match vars.get(ENV_TIMEOUT_MS) {
            None => Self::default().timeout_ms,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => ms,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: ENV_TIMEOUT_MS,
                        value: raw.clone(),
                    })
                }
            },
        };

        Ok(Self {
            base_url,
            api_key,
            timeout_ms,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
