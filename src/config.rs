use std::net::SocketAddr;
use std::time::Duration;

use crate::error::ConfigError;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_MAX_TOKENS: u32 = 200;
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_ADDR: &str = "127.0.0.1:5000";

/// Settings read once at startup. Nothing here changes while serving.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub api_base: String,
    pub timeout: Option<Duration>,
    pub addr: SocketAddr,
}

// Keep the key out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .field("addr", &self.addr)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = match lookup(API_KEY_ENV) {
            Some(value) if !value.trim().is_empty() => value.trim().to_string(),
            _ => return Err(ConfigError::MissingApiKey),
        };

        let model = non_empty(lookup("OPENAI_MODEL")).unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let api_base = non_empty(lookup("OPENAI_API_BASE"))
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let max_tokens = match non_empty(lookup("OPENAI_MAX_TOKENS")) {
            Some(raw) => parse("OPENAI_MAX_TOKENS", raw)?,
            None => DEFAULT_MAX_TOKENS,
        };

        let timeout = match non_empty(lookup("OPENAI_TIMEOUT_SECS")) {
            Some(raw) => Some(Duration::from_secs(parse("OPENAI_TIMEOUT_SECS", raw)?)),
            None => None,
        };

        let addr = match non_empty(lookup("GAP_ANALYSIS_ADDR")) {
            Some(raw) => parse("GAP_ANALYSIS_ADDR", raw)?,
            None => parse("GAP_ANALYSIS_ADDR", DEFAULT_ADDR.to_string())?,
        };

        Ok(Config {
            api_key,
            model,
            max_tokens,
            api_base,
            timeout,
            addr,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse<T: std::str::FromStr>(name: &'static str, raw: String) -> Result<T, ConfigError> {
    raw.parse()
        .map_err(|_| ConfigError::Invalid { name, value: raw })
}
