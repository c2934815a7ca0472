//! Application settings loaded from environment variables.

use std::env;

use super::constants::{DEFAULT_DATABASE_URL, DEFAULT_DB_MAX_CONNECTIONS};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("db_max_connections", &self.db_max_connections)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| {
                tracing::warn!("DATABASE_URL not set, using development default");
                DEFAULT_DATABASE_URL.to_string()
            }),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
        }
    }
}
