//! Application settings.
//!
//! Every field has a default. An optional TOML file (`CONFIG_PATH`, default
//! `config.toml`) overrides the defaults, and environment variables (including
//! those loaded from `.env`) override the file.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Runtime configuration for the HTTP service
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Name shown in the welcome message
    pub app_name: String,
    /// Version reported by `/` and `/health`
    pub app_version: String,
    /// Enables SQL statement logging
    pub debug: bool,
    /// sea-orm connection string
    pub database_url: String,
    /// Path prefix every resource route is nested under
    pub api_prefix: String,
    /// Origins allowed by CORS
    pub cors_origins: Vec<String>,
    pub basic_auth_username: String,
    pub basic_auth_password: String,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Socket address the server listens on
    pub bind_addr: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "Customer Billing API".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            debug: false,
            database_url: "sqlite://data/billing.sqlite?mode=rwc".to_string(),
            api_prefix: "/api/v1".to_string(),
            cors_origins: vec!["http://localhost:3000".to_string()],
            basic_auth_username: "admin".to_string(),
            basic_auth_password: "secret".to_string(),
            log_level: "info".to_string(),
            bind_addr: "0.0.0.0:8000".to_string(),
        }
    }
}

impl AppConfig {
    /// Overrides fields from variables visible through `lookup`.
    ///
    /// `DATABASE_URL` wins over the `DB_*` parts; the parts are only used when
    /// `DB_USER` is present.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("APP_NAME") {
            self.app_name = value;
        }
        if let Some(value) = lookup("APP_VERSION") {
            self.app_version = value;
        }
        if let Some(value) = lookup("DEBUG") {
            self.debug = parse_bool("DEBUG", &value)?;
        }
        if let Some(value) = lookup("DATABASE_URL") {
            self.database_url = value;
        } else if let Some(user) = lookup("DB_USER") {
            let password = lookup("DB_PASSWORD").unwrap_or_default();
            let host = lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string());
            let port = lookup("DB_PORT").unwrap_or_else(|| "5432".to_string());
            let name = lookup("DB_NAME").unwrap_or_else(|| "billing".to_string());
            self.database_url = format!("postgres://{user}:{password}@{host}:{port}/{name}");
        }
        if let Some(value) = lookup("API_V1_PREFIX") {
            self.api_prefix = value;
        }
        if let Some(value) = lookup("CORS_ORIGINS") {
            self.cors_origins = value
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(ToString::to_string)
                .collect();
        }
        if let Some(value) = lookup("BASIC_AUTH_USERNAME") {
            self.basic_auth_username = value;
        }
        if let Some(value) = lookup("BASIC_AUTH_PASSWORD") {
            self.basic_auth_password = value;
        }
        if let Some(value) = lookup("LOG_LEVEL") {
            self.log_level = value.to_lowercase();
        }
        if let Some(value) = lookup("BIND_ADDR") {
            self.bind_addr = value;
        }
        Ok(())
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(Error::Config {
            message: format!("{name} must be a boolean, got '{other}'"),
        }),
    }
}

/// Loads settings from a TOML file. Missing keys keep their defaults.
///
/// # Errors
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    tracing::debug!("Loading configuration from {:?}", path);
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path.display()),
    })
}

/// Builds the effective configuration: defaults, then the optional config file,
/// then the process environment.
///
/// Call after `dotenvy::dotenv()` so `.env` values are visible.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let mut config = if Path::new(&path).exists() {
        load_config(&path)?
    } else {
        tracing::debug!("No config file at {}, using defaults", path);
        AppConfig::default()
    };
    config.apply_env(|name| std::env::var(name).ok())?;
    Ok(config)
}
