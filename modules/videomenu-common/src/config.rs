use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

/// Identifier of the plugin document holding the group order.
pub const DEFAULT_CONFIG_KEY: &str = "tablq_positions_menu";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Postgres
    pub database_url: String,
    pub database_max_connections: u32,

    // Web server
    pub api_host: String,
    pub api_port: u16,

    // Engine
    pub menu_config_key: String,
    pub config_lookup_timeout_ms: u64,
    pub query_timeout_ms: u64,
    pub sample_timeout_ms: u64,

    // Platform auth
    pub jwt_secret: Option<String>,
    pub jwt_issuer: String,

    // CORS
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL is required")?,
            database_max_connections: parsed_env("DATABASE_MAX_CONNECTIONS", 10)?,
            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            api_port: parsed_env("API_PORT", 3000)?,
            menu_config_key: env::var("MENU_CONFIG_KEY")
                .unwrap_or_else(|_| DEFAULT_CONFIG_KEY.to_string()),
            config_lookup_timeout_ms: parsed_env("CONFIG_LOOKUP_TIMEOUT_MS", 3000)?,
            query_timeout_ms: parsed_env("QUERY_TIMEOUT_MS", 5000)?,
            sample_timeout_ms: parsed_env("SAMPLE_TIMEOUT_MS", 6000)?,
            jwt_secret: env::var("JWT_SECRET").ok().filter(|s| !s.is_empty()),
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "videomenu".to_string()),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            config_key: self.menu_config_key.clone(),
            config_lookup_timeout: Duration::from_millis(self.config_lookup_timeout_ms),
            query_timeout: Duration::from_millis(self.query_timeout_ms),
            sample_timeout: Duration::from_millis(self.sample_timeout_ms),
        }
    }
}

/// Knobs consumed by the catalog engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub config_key: String,
    pub config_lookup_timeout: Duration,
    pub query_timeout: Duration,
    pub sample_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            config_key: DEFAULT_CONFIG_KEY.to_string(),
            config_lookup_timeout: Duration::from_secs(3),
            query_timeout: Duration::from_secs(5),
            sample_timeout: Duration::from_secs(6),
        }
    }
}

fn parsed_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a valid number, got {raw:?}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_settings_default_matches_env_defaults() {
        let settings = EngineSettings::default();
        assert_eq!(settings.config_key, "tablq_positions_menu");
        assert_eq!(settings.config_lookup_timeout, Duration::from_millis(3000));
        assert_eq!(settings.query_timeout, Duration::from_millis(5000));
        assert_eq!(settings.sample_timeout, Duration::from_millis(6000));
    }

    #[test]
    fn parsed_env_falls_back_when_unset() {
        let value: u16 = parsed_env("VIDEOMENU_TEST_SURELY_UNSET_PORT", 4242).unwrap();
        assert_eq!(value, 4242);
    }
}
