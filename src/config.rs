// src/config.rs
use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::OrdError;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_MAX_COUNTERPARTY_NAME_LEN: usize = 255;

/// ORD backend the configured API key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Vk,
}

impl FromStr for Provider {
    type Err = OrdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vk" => Ok(Provider::Vk),
            other => Err(OrdError::Config(format!(
                "unknown ORD provider: {other}, only VK is supported"
            ))),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Vk => write!(f, "VK"),
        }
    }
}

/// Process-wide configuration, read once at startup and never mutated.
///
/// Handlers receive it through shared state instead of reading the
/// environment on each request.
#[derive(Clone)]
pub struct Config {
    pub provider: Provider,
    pub api_key: String,
    pub port: u16,
    pub log_level: String,
    /// Defensive limit on counterparty names.
    pub max_counterparty_name_len: usize,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// `ORD_PROVIDER` and `ORD_API_KEY` are required; `PORT`, `LOG_LEVEL`
    /// and `MAX_COUNTERPARTY_NAME_LEN` fall back to defaults.
    pub fn from_env() -> Result<Self, OrdError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, OrdError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = lookup("ORD_PROVIDER")
            .ok_or_else(|| OrdError::Config("ORD_PROVIDER is not set".into()))?
            .parse::<Provider>()?;

        let api_key = lookup("ORD_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| OrdError::Config("ORD_API_KEY is not set".into()))?;

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| OrdError::Config(format!("PORT is not a valid port: {raw}")))?,
            None => DEFAULT_PORT,
        };

        let log_level = lookup("LOG_LEVEL")
            .map(|level| level.trim().to_lowercase())
            .filter(|level| !level.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        let max_counterparty_name_len = match lookup("MAX_COUNTERPARTY_NAME_LEN") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                OrdError::Config(format!("MAX_COUNTERPARTY_NAME_LEN is not a number: {raw}"))
            })?,
            None => DEFAULT_MAX_COUNTERPARTY_NAME_LEN,
        };

        Ok(Self {
            provider,
            api_key,
            port,
            log_level,
            max_counterparty_name_len,
        })
    }
}

// The API key must never reach the logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("max_counterparty_name_len", &self.max_counterparty_name_len)
            .finish()
    }
}
