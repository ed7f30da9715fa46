use anyhow::{anyhow, Context, Result};

use crate::document::store::LayoutMode;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Upper bound on simultaneously open documents.
    pub max_sessions: usize,
    /// Layout mode for newly opened sessions.
    pub default_layout_mode: LayoutMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            max_sessions: 1000,
            default_layout_mode: LayoutMode::AutoFlow,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let port = match lookup("PORT") {
            Some(v) => v
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            None => defaults.port,
        };

        let max_sessions = match lookup("MAX_SESSIONS") {
            Some(v) => v
                .parse::<usize>()
                .context("MAX_SESSIONS must be a positive integer")?,
            None => defaults.max_sessions,
        };
        if max_sessions == 0 {
            return Err(anyhow!("MAX_SESSIONS must be at least 1"));
        }

        let default_layout_mode = match lookup("DEFAULT_LAYOUT_MODE") {
            Some(v) => v
                .parse::<LayoutMode>()
                .map_err(|e| anyhow!("DEFAULT_LAYOUT_MODE: {e}"))?,
            None => defaults.default_layout_mode,
        };

        Ok(Config {
            port,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            max_sessions,
            default_layout_mode,
        })
    }
}
