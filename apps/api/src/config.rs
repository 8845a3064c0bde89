use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_RECOMMENDATION_COUNT: usize = 8;
const MAX_RECOMMENDATION_COUNT: usize = 30;
const DEFAULT_BOARD_IDLE_SECS: u64 = 3600;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    /// Persistence mirror. The in-memory store is used when unset.
    pub redis_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// Candidates requested per generate call.
    pub recommendation_count: usize,
    /// Boards untouched for this long are dropped along with their mirrored keys.
    pub board_idle_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            redis_url: optional_env("REDIS_URL"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            recommendation_count: parse_recommendation_count(optional_env("RECOMMENDATION_COUNT"))?,
            board_idle_ttl: parse_idle_ttl(optional_env("BOARD_IDLE_TTL_SECS"))?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_recommendation_count(raw: Option<String>) -> Result<usize> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_RECOMMENDATION_COUNT);
    };
    let count = raw
        .trim()
        .parse::<usize>()
        .context("RECOMMENDATION_COUNT must be a positive integer")?;
    if !(1..=MAX_RECOMMENDATION_COUNT).contains(&count) {
        bail!("RECOMMENDATION_COUNT must be between 1 and {MAX_RECOMMENDATION_COUNT}, got {count}");
    }
    Ok(count)
}

fn parse_idle_ttl(raw: Option<String>) -> Result<Duration> {
    let secs = match raw {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .context("BOARD_IDLE_TTL_SECS must be a number of seconds")?,
        None => DEFAULT_BOARD_IDLE_SECS,
    };
    if secs == 0 {
        bail!("BOARD_IDLE_TTL_SECS must be greater than zero");
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            anthropic_api_key: "test-key".to_string(),
            redis_url: None,
            port: 0,
            rust_log: "debug".to_string(),
            recommendation_count: DEFAULT_RECOMMENDATION_COUNT,
            board_idle_ttl: Duration::from_secs(DEFAULT_BOARD_IDLE_SECS),
        }
    }
}
