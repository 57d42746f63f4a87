//! GitHub OAuth flow
//!
//! Implements the OAuth 2.0 authorization code flow with GitHub.

use axum::{
    Json,
    Router,
    extract::{Query, State},
    response::{IntoResponse, Redirect},
    routing::get,
};
use serde::Deserialize;

use crate::AppState;
use crate::auth::session::{Session, create_session_token};
use crate::error::AppError;

/// Create authentication router
///
/// Routes:
/// - GET /auth/github - Redirect to GitHub
/// - GET /auth/callback - OAuth callback
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/auth/github", get(github_redirect))
        .route("/auth/callback", get(github_callback))
}

// =============================================================================
// GitHub OAuth
// =============================================================================

/// GET /auth/github
///
/// Redirects user to the GitHub authorization page with the configured
/// client ID, scope, and a random `state` parameter.
async fn github_redirect(State(state): State<AppState>) -> impl IntoResponse {
    let authorize_url = state.github.authorize_url(&generate_state_token());
    tracing::debug!(url = %authorize_url, "redirecting to GitHub authorization");
    Redirect::to(&authorize_url)
}

/// Query parameters from GitHub callback
///
/// Both fields are optional so a missing `code` surfaces as the named
/// 400 error instead of a generic extractor rejection.
#[derive(Debug, Deserialize)]
struct CallbackQuery {
    /// Authorization code
    code: Option<String>,
    /// State parameter echoed by GitHub. The flow is stateless between
    /// redirect and callback, so this is not round-tripped against a
    /// stored value.
    #[allow(dead_code)]
    state: Option<String>,
}

/// GET /auth/callback
///
/// Handles the OAuth callback from GitHub. Single pass, no retries.
///
/// # Steps
/// 1. Require the authorization `code` query parameter
/// 2. Exchange code for an access token
/// 3. Fetch the authenticated user from GitHub
/// 4. Mint a signed session token
/// 5. Store (session token -> access token) in the credential cache
/// 6. Reply with JSON `{token, user}`
///
/// The session token is returned to the caller in the response body;
/// this server never redirects to a front-end with `?token=`.
async fn github_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<impl IntoResponse, AppError> {
    let code = query
        .code
        .as_deref()
        .filter(|code| !code.is_empty())
        .ok_or(AppError::MissingCode)?;

    let access_token = state.github.exchange_code(code).await?;

    let user = state.github.fetch_user(&access_token).await?;
    tracing::info!(github_id = user.id, login = %user.login, "GitHub user authenticated");

    let session = Session::issue(user.id, user.login.clone(), user.avatar_url.clone());
    let token = create_session_token(&session, &state.config.auth.session_secret)?;

    state.credential_cache.put(&token, access_token).await;

    Ok(Json(serde_json::json!({
        "token": token,
        "user": user,
    })))
}

// =============================================================================
// Helpers
// =============================================================================

/// Generate a random `state` token for the authorize redirect
fn generate_state_token() -> String {
    use rand::Rng;
    rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}
