//! Authentication middleware
//!
//! Protects routes that require a valid session and a cached provider
//! credential.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, request::Parts},
};

use super::session::{Session, verify_session_token};
use crate::AppState;
use crate::error::AppError;

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(ToOwned::to_owned)
}

/// Extractor for the current authenticated user
///
/// Performs the full gateway check on every protected route:
/// 1. Bearer token present, else `MissingToken`
/// 2. Session token valid (signature + expiry), else 401
/// 3. Provider credential cached, else `MissingCredential`. The
///    gateway fails closed and never falls back to an unauthenticated
///    upstream call
///
/// # Usage
/// ```ignore
/// async fn handler(user: AuthedUser) -> impl IntoResponse {
///     format!("Hello, {}", user.session.login)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthedUser {
    /// Decoded session claims
    pub session: Session,
    /// The raw session token, used as the cache key
    pub session_token: String,
    /// Provider access credential resolved from the credential cache
    pub credential: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthedUser>().cloned() {
            return Ok(user);
        }

        let app_state = AppState::from_ref(state);

        let session_token =
            extract_bearer_token(&parts.headers).ok_or(AppError::MissingToken)?;

        let session =
            verify_session_token(&session_token, &app_state.config.auth.session_secret)?;

        let credential = app_state
            .credential_cache
            .get(&session_token)
            .await
            .ok_or(AppError::MissingCredential)?;

        let user = AuthedUser {
            session,
            session_token,
            credential,
        };
        parts.extensions.insert(user.clone());

        Ok(user)
    }
}
