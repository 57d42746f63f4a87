//! Error types for HubGate
//!
//! All errors in the application are converted to `AppError`,
//! which implements `IntoResponse` for proper HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Application-wide error type
///
/// This enum represents all possible errors that can occur
/// in the application. It implements `IntoResponse` to
/// automatically convert errors to appropriate HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// OAuth callback arrived without an authorization code (400)
    #[error("Authorization code not provided")]
    MissingCode,

    /// Token endpoint returned no access token (400)
    #[error("Failed to obtain access token: {0}")]
    TokenExchangeFailed(String),

    /// Identity fetch after code exchange failed (500)
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// No bearer token on a protected route (401)
    #[error("Token not provided")]
    MissingToken,

    /// Session token not decodable (401)
    #[error("Malformed session token")]
    MalformedToken,

    /// Session token signature mismatch (401)
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Session token past its expiry (401)
    #[error("Session token expired")]
    TokenExpired,

    /// No cached provider credential for this session (401)
    #[error("No provider credential for session, re-authentication required")]
    MissingCredential,

    /// GitHub API call failed (500)
    #[error("Upstream request failed: {0}")]
    Upstream(String),

    /// Validation error (400)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error (500)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl IntoResponse for AppError {
    /// Convert error to HTTP response
    ///
    /// Maps each error variant to appropriate HTTP status code
    /// and JSON error body.
    fn into_response(self) -> Response {
        use axum::Json;

        let (status, error_message, error_type) = match &self {
            AppError::MissingCode => (StatusCode::BAD_REQUEST, self.to_string(), "missing_code"),
            AppError::TokenExchangeFailed(_) => (
                StatusCode::BAD_REQUEST,
                self.to_string(),
                "token_exchange_failed",
            ),
            AppError::Auth(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                self.to_string(),
                "auth_error",
            ),
            AppError::MissingToken => {
                (StatusCode::UNAUTHORIZED, self.to_string(), "missing_token")
            }
            AppError::MalformedToken | AppError::InvalidSignature | AppError::TokenExpired => {
                (StatusCode::UNAUTHORIZED, self.to_string(), "invalid_token")
            }
            AppError::MissingCredential => (
                StatusCode::UNAUTHORIZED,
                self.to_string(),
                "missing_credential",
            ),
            AppError::Upstream(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                msg.clone(),
                "upstream_error",
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), "validation"),
            AppError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
                "database",
            ),
            AppError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone(), "config"),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                "internal",
            ),
        };

        // Record error metric
        use crate::metrics::ERRORS_TOTAL;
        ERRORS_TOTAL.with_label_values(&[error_type]).inc();

        let body = Json(serde_json::json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
