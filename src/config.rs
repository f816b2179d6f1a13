//! Environment-driven configuration.

use std::env;
use std::time::Duration;

use crate::error::{EnergyError, Result};

pub const DEFAULT_EIA_BASE_URL: &str = "http://api.eia.gov";
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 86_400;
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 4_096;
pub const DEFAULT_FETCH_MAX_RETRIES: usize = 3;
pub const DEFAULT_PORT: u16 = 8080;

/// Deployment environment (`production`, `sandbox`, ...)
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

pub fn get_port() -> Result<u16> {
    parse_var("PORT", DEFAULT_PORT)
}

/// Bounds applied to the series cache. `None` disables the bound.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    pub ttl: Option<Duration>,
    pub max_entries: Option<usize>,
}

impl CacheConfig {
    /// Process-lifetime memoization with no eviction.
    pub fn unbounded() -> Self {
        Self {
            ttl: None,
            max_entries: None,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Some(Duration::from_secs(DEFAULT_CACHE_TTL_SECONDS)),
            max_entries: Some(DEFAULT_CACHE_MAX_ENTRIES),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InsightsConfig {
    pub api_base_url: String,
    pub api_key: String,
    pub fetch_max_retries: usize,
    pub cache: CacheConfig,
}

impl InsightsConfig {
    pub fn new(api_base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            api_key: api_key.into(),
            fetch_max_retries: DEFAULT_FETCH_MAX_RETRIES,
            cache: CacheConfig::default(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let api_key = env::var("EIA_API_KEY")
            .map_err(|_| EnergyError::Config("EIA_API_KEY is not set".to_string()))?;
        let api_base_url =
            env::var("EIA_BASE_URL").unwrap_or_else(|_| DEFAULT_EIA_BASE_URL.to_string());

        let ttl_seconds: u64 = parse_var("CACHE_TTL_SECONDS", DEFAULT_CACHE_TTL_SECONDS)?;
        let max_entries: usize = parse_var("CACHE_MAX_ENTRIES", DEFAULT_CACHE_MAX_ENTRIES)?;

        Ok(Self {
            api_base_url,
            api_key,
            fetch_max_retries: parse_var("FETCH_MAX_RETRIES", DEFAULT_FETCH_MAX_RETRIES)?,
            cache: CacheConfig {
                // 0 turns the bound off
                ttl: (ttl_seconds > 0).then(|| Duration::from_secs(ttl_seconds)),
                max_entries: (max_entries > 0).then_some(max_entries),
            },
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| EnergyError::Config(format!("{name} has invalid value '{raw}'"))),
        Err(_) => Ok(default),
    }
}
