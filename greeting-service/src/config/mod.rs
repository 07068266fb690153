//! Configuration module for greeting-service.

use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone)]
pub struct GreetingConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    /// `None` runs the service against an in-memory store.
    pub database: Option<DatabaseConfig>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl GreetingConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        Ok(Self {
            common,
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "greeting-service".to_string()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            database: database_from_env(),
        })
    }
}

fn database_from_env() -> Option<DatabaseConfig> {
    let url = env::var("DATABASE_URL").ok().filter(|s| !s.is_empty())?;

    Some(DatabaseConfig {
        url,
        max_connections: parse_or(env::var("DATABASE_MAX_CONNECTIONS").ok(), 10),
        min_connections: parse_or(env::var("DATABASE_MIN_CONNECTIONS").ok(), 2),
    })
}

fn parse_or(value: Option<String>, default: u32) -> u32 {
    value.and_then(|s| s.parse().ok()).unwrap_or(default)
}
