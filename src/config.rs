//! Configuration management
//!
//! Loads configuration from:
//! 1. Default values
//! 2. Configuration file (config/local.toml)
//! 3. Environment variables (override)

use serde::Deserialize;
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub github: GitHubConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Port number (e.g., 3000)
    pub port: u16,
    /// Front-end origin allowed by CORS (e.g., "http://localhost:5173")
    pub frontend_origin: String,
}

/// Database configuration (SQLite only)
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file
    pub path: PathBuf,
}

/// Authentication configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Session token signing secret (32+ bytes)
    pub session_secret: String,
}

/// GitHub OAuth and API configuration
///
/// The base URLs default to the real GitHub hosts; tests point them
/// at a local stub server.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubConfig {
    /// OAuth application client ID
    pub client_id: String,
    /// OAuth application client secret
    pub client_secret: String,
    /// OAuth scope requested on the authorize redirect
    pub scope: String,
    /// Base URL for the OAuth host (authorize + token endpoints)
    pub auth_base_url: String,
    /// Base URL for the REST API host
    pub api_base_url: String,
}

/// Cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Provider credential TTL in seconds (default: 7200)
    pub credential_ttl_secs: u64,
    /// Repository list response TTL in seconds (default: 3600)
    pub repos_ttl_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Log format: "pretty" or "json"
    pub format: String,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// # Loading Order
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/local.toml (if exists)
    /// 4. Environment variables (HUBGATE_*)
    ///
    /// # Errors
    /// Returns error if configuration is invalid
    pub fn load() -> Result<Self, crate::error::AppError> {
        use config::{Config, Environment, File};

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.frontend_origin", "http://localhost:5173")?
            .set_default("github.scope", "user")?
            .set_default("github.auth_base_url", "https://github.com")?
            .set_default("github.api_base_url", "https://api.github.com")?
            .set_default("cache.credential_ttl_secs", 7200)?
            .set_default("cache.repos_ttl_secs", 3600)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // Load from config/default.toml if it exists
            .add_source(File::with_name("config/default").required(false))
            // Load from config/local.toml if it exists (overrides default)
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables (HUBGATE_*)
            .add_source(
                Environment::with_prefix("HUBGATE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;
        app_config.validate()?;
        Ok(app_config)
    }

    fn validate(&self) -> Result<(), crate::error::AppError> {
        const MIN_SESSION_SECRET_BYTES: usize = 32;

        if self.auth.session_secret.as_bytes().len() < MIN_SESSION_SECRET_BYTES {
            return Err(crate::error::AppError::Config(format!(
                "auth.session_secret must be at least {} bytes",
                MIN_SESSION_SECRET_BYTES
            )));
        }

        if self.cache.credential_ttl_secs == 0 {
            return Err(crate::error::AppError::Config(
                "cache.credential_ttl_secs must be greater than 0".to_string(),
            ));
        }

        if self.cache.repos_ttl_secs == 0 {
            return Err(crate::error::AppError::Config(
                "cache.repos_ttl_secs must be greater than 0".to_string(),
            ));
        }

        for (key, value) in [
            ("github.auth_base_url", &self.github.auth_base_url),
            ("github.api_base_url", &self.github.api_base_url),
        ] {
            if url::Url::parse(value).is_err() {
                return Err(crate::error::AppError::Config(format!(
                    "{key} is not a valid URL: {value}"
                )));
            }
        }

        Ok(())
    }
}
