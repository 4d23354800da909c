//! Server configuration loaded from environment variables.
//!
//! The .env file is loaded by `main` via dotenvy before `Config::load` runs.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use engagement::EngagementConfig;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";

pub struct Config {
    /// PostgreSQL connection URL. Unset runs the in-memory store.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub bind_addr: SocketAddr,
    /// CORS allow list
    pub frontend_origins: Vec<String>,
    /// Usernames published at startup when running the in-memory store
    pub seed_profiles: Vec<String>,
    pub dedup_window: Option<Duration>,
    pub cookie_secure: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS is not a number: {raw}"))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .trim()
            .parse()
            .with_context(|| format!("BIND_ADDR is not a socket address: {bind_addr}"))?;

        let dedup_window = match lookup("DEDUP_WINDOW_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("DEDUP_WINDOW_SECS is not a number: {raw}"))?;
                if secs == 0 {
                    anyhow::bail!("DEDUP_WINDOW_SECS must be greater than zero");
                }
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        // Secure cookies unless explicitly disabled for local HTTP
        let cookie_secure = match lookup("COOKIE_SECURE").as_deref().map(str::trim) {
            Some("false") | Some("0") => false,
            _ => true,
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            database_max_connections,
            bind_addr,
            frontend_origins: split_list(
                &lookup("FRONTEND_ORIGINS").unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string()),
            ),
            seed_profiles: split_list(&lookup("SEED_PROFILES").unwrap_or_default()),
            dedup_window,
            cookie_secure,
        })
    }

    pub fn engagement(&self) -> EngagementConfig {
        let config = EngagementConfig {
            cookie_secure: self.cookie_secure,
            ..EngagementConfig::default()
        };
        match self.dedup_window {
            Some(window) => config.with_dedup_window(window),
            None => config,
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
