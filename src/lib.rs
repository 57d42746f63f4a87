//! HubGate - A GitHub OAuth relay with signed session tokens
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      API Layer (Axum)                       │
//! │  - OAuth exchange endpoints                                 │
//! │  - Protected resource gateway                               │
//! │  - Metrics (Prometheus)                                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Auth Layer                              │
//! │  - Session token codec (HMAC-signed, 12h expiry)            │
//! │  - Authentication extractor                                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Data Layer                             │
//! │  - SQLite (sqlx) for favorites                              │
//! │  - Credential / response caches (Moka, TTL)                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `api`: HTTP handlers for the protected gateway and metrics
//! - `auth`: GitHub OAuth flow, session tokens, auth extractor
//! - `github`: Upstream GitHub client
//! - `data`: Database and cache layer
//! - `config`: Configuration management
//! - `error`: Error types

pub mod api;
pub mod auth;
pub mod config;
pub mod data;
pub mod error;
pub mod github;
pub mod metrics;

use std::sync::Arc;

/// Application state shared across all handlers
///
/// This struct is cloned for each request and contains shared
/// resources like the database pool, caches, and upstream client.
/// All dependencies are constructed here and injected; there are no
/// module-level connection handles.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::AppConfig>,

    /// Database connection pool (favorites)
    pub db: Arc<data::Database>,

    /// Session token -> provider credential (TTL-bound)
    pub credential_cache: Arc<data::CredentialCache>,

    /// Session token -> serialized repository list (TTL-bound)
    pub response_cache: Arc<data::ResponseCache>,

    /// Upstream GitHub client
    pub github: Arc<github::GitHubClient>,
}

impl AppState {
    /// Initialize application state
    ///
    /// # Steps
    /// 1. Connect to SQLite database
    /// 2. Initialize caches with configured TTLs
    /// 3. Build the upstream GitHub client
    ///
    /// # Errors
    /// Returns error if any initialization step fails
    pub async fn new(config: config::AppConfig) -> Result<Self, error::AppError> {
        use std::time::Duration;

        tracing::info!("Initializing application state...");

        // 1. Connect to SQLite database
        let db = data::Database::connect(&config.database.path).await?;
        tracing::info!("Database connected");

        // 2. Initialize caches
        let credential_cache = data::CredentialCache::new(Duration::from_secs(
            config.cache.credential_ttl_secs,
        ));
        let response_cache =
            data::ResponseCache::new(Duration::from_secs(config.cache.repos_ttl_secs));
        tracing::info!(
            credential_ttl_secs = config.cache.credential_ttl_secs,
            repos_ttl_secs = config.cache.repos_ttl_secs,
            "Caches initialized"
        );

        // 3. Build the upstream GitHub client
        let http_client = reqwest::Client::builder()
            .user_agent("HubGate/0.1.0")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| error::AppError::Internal(e.into()))?;
        let github = github::GitHubClient::new(&config.github, http_client);

        tracing::info!("Application state initialized successfully");

        Ok(Self {
            config: Arc::new(config),
            db: Arc::new(db),
            credential_cache: Arc::new(credential_cache),
            response_cache: Arc::new(response_cache),
            github: Arc::new(github),
        })
    }
}

/// Build the Axum router with all routes.
///
/// This is shared by the binary and integration tests to keep route
/// composition consistent across environments.
pub fn build_router(state: AppState) -> axum::Router {
    use axum::Router;
    use tower_http::{compression::CompressionLayer, trace::TraceLayer};

    let cors_layer = build_cors_layer(&state.config.server);

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(auth::auth_router())
        .merge(api::repos_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
        .merge(api::metrics_router())
}

fn build_cors_layer(server: &config::ServerConfig) -> tower_http::cors::CorsLayer {
    use axum::http::{HeaderValue, Method, header};
    use tower_http::cors::CorsLayer;

    let methods = [Method::GET, Method::POST];
    let headers = [header::AUTHORIZATION, header::CONTENT_TYPE];

    match HeaderValue::from_str(&server.frontend_origin) {
        Ok(origin) => CorsLayer::new()
            .allow_origin([origin])
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(true),
        Err(error) => {
            tracing::error!(
                %error,
                origin = %server.frontend_origin,
                "Failed to parse CORS origin; denying cross-origin requests"
            );
            CorsLayer::new().allow_methods(methods).allow_headers(headers)
        }
    }
}

async fn health_check() -> &'static str {
    "OK"
}
