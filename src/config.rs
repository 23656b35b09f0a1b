use serde::Deserialize;
use std::{fs, path::Path, time::Duration};
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://f1-strategy-simulator.onrender.com";

pub const API_BASE_VAR: &str = "STRATEGY_API_BASE";
pub const CONFIG_PATH_VAR: &str = "STRATEGY_CONFIG";
pub const TIMEOUT_VAR: &str = "STRATEGY_TIMEOUT_SECS";
pub const BAR_WIDTH_VAR: &str = "STRATEGY_BAR_WIDTH";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base: String,
    /// Unset means wait for the optimizer indefinitely.
    pub request_timeout_secs: Option<u64>,
    pub bar_width: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout_secs: None,
            bar_width: 60,
        }
    }
}

impl ClientConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// File values first (if `STRATEGY_CONFIG` is set), then env overrides.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = match lookup(CONFIG_PATH_VAR) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        if let Some(base) = lookup(API_BASE_VAR) {
            cfg.api_base = base;
        }
        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key: TIMEOUT_VAR, value: raw.clone() })?;
            cfg.request_timeout_secs = Some(secs);
        }
        if let Some(raw) = lookup(BAR_WIDTH_VAR) {
            cfg.bar_width = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key: BAR_WIDTH_VAR, value: raw.clone() })?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            return Err(ConfigError::InvalidValue { key: "api_base", value: self.api_base.clone() });
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue { key: "request_timeout_secs", value: "0".into() });
        }
        if self.bar_width < 10 {
            return Err(ConfigError::InvalidValue {
                key: "bar_width",
                value: self.bar_width.to_string(),
            });
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
