use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, WineEngineError};
use crate::sources::vivino::DEFAULT_BASE_URL;

/// Engine configuration, built from defaults and environment overrides
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// SQLite score cache; `None` disables caching
    pub db_path: Option<String>,
    pub vivino_base_url: String,
    pub request_timeout_secs: u64,
    /// Pause between two external lookups in batch runs
    pub politeness_delay_ms: u64,
    pub use_cache: bool,
    pub port: u16,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            db_path: Some("wine_scores.db".to_string()),
            vivino_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 10,
            politeness_delay_ms: 2000,
            use_cache: true,
            port: 8090,
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| WineEngineError::Config(format!("invalid value for {}: '{}'", key, raw)))
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(WineEngineError::Config(format!("invalid value for {}: '{}'", key, raw))),
    }
}

impl EngineConfig {
    /// Defaults overridden by `WINE_*`, `VIVINO_BASE_URL` and `PORT` variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`EngineConfig::from_env`] with a custom variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("WINE_DB_PATH") {
            let path = path.trim();
            config.db_path = if path.is_empty() || path.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(path.to_string())
            };
        }
        if let Some(url) = lookup("VIVINO_BASE_URL") {
            config.vivino_base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup("WINE_REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = parse_var("WINE_REQUEST_TIMEOUT_SECS", &raw)?;
        }
        if let Some(raw) = lookup("WINE_POLITENESS_DELAY_MS") {
            config.politeness_delay_ms = parse_var("WINE_POLITENESS_DELAY_MS", &raw)?;
        }
        if let Some(raw) = lookup("WINE_USE_CACHE") {
            config.use_cache = parse_flag("WINE_USE_CACHE", &raw)?;
        }
        if let Some(raw) = lookup("PORT") {
            config.port = parse_var("PORT", &raw)?;
        }

        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }
}
