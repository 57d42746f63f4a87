//! Protected resource gateway
//!
//! Every route here requires a valid session token and a cached
//! provider credential (the `AuthedUser` extractor enforces both).
//! The repository list is served from the response cache when a fresh
//! entry exists; writes always go straight to GitHub.

use axum::{
    Json,
    Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;

use crate::AppState;
use crate::auth::AuthedUser;
use crate::error::AppError;
use crate::github::CreateRepoRequest;
use crate::metrics::HTTP_REQUESTS_TOTAL;

/// Create the gateway router
///
/// Routes:
/// - GET  /api/protected    - Auth probe, echoes the session claims
/// - GET  /api/repos        - Cached-or-fetched repository list
/// - POST /api/create-repo  - Create a repository upstream
/// - GET  /repos/favorites  - The requesting user's favorites
/// - POST /repos/favorite   - Persist a favorite
pub fn repos_router() -> Router<AppState> {
    Router::new()
        .route("/api/protected", get(protected_probe))
        .route("/api/repos", get(list_repos))
        .route("/api/create-repo", post(create_repo))
        .route("/repos/favorites", get(list_favorites))
        .route("/repos/favorite", post(add_favorite))
}

// =============================================================================
// Auth probe
// =============================================================================

/// GET /api/protected
///
/// Returns the decoded session claims for a valid session.
async fn protected_probe(user: AuthedUser) -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Access granted",
        "user": user.session,
    }))
}

// =============================================================================
// Repositories
// =============================================================================

/// GET /api/repos
///
/// Serves the user's repository list from the response cache when a
/// fresh entry exists; otherwise fetches from GitHub and repopulates
/// the cache. Stale-but-unexpired entries are served as-is.
async fn list_repos(
    State(state): State<AppState>,
    user: AuthedUser,
) -> Result<Json<serde_json::Value>, AppError> {
    if let Some(cached) = state.response_cache.get(&user.session_token).await {
        let repos: serde_json::Value = serde_json::from_str(&cached)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("corrupt cached payload: {e}")))?;

        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/api/repos", "200"])
            .inc();

        return Ok(Json(repos));
    }

    let repos = state.github.list_repos(&user.credential).await?;

    let serialized = serde_json::to_string(&repos)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("serializing repository list: {e}")))?;
    state
        .response_cache
        .put(&user.session_token, serialized)
        .await;

    HTTP_REQUESTS_TOTAL
        .with_label_values(&["GET", "/api/repos", "200"])
        .inc();

    Ok(Json(repos))
}

/// Request body for repository creation
#[derive(Debug, Deserialize)]
struct CreateRepoBody {
    name: Option<String>,
    description: Option<String>,
    private: Option<bool>,
}

/// POST /api/create-repo
///
/// Creates a repository upstream with the cached provider credential.
/// No response cache involvement: the repository list cache is left to
/// expire naturally.
async fn create_repo(
    State(state): State<AppState>,
    user: AuthedUser,
    Json(body): Json<CreateRepoBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let name = body
        .name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| AppError::Validation("name is required".to_string()))?;

    let created = state
        .github
        .create_repo(
            &user.credential,
            &CreateRepoRequest {
                name,
                description: body.description,
                private: body.private,
            },
        )
        .await?;

    tracing::info!(login = %user.session.login, "repository created upstream");

    Ok(Json(created))
}

// =============================================================================
// Favorites
// =============================================================================

/// Request body for adding a favorite
#[derive(Debug, Deserialize)]
struct FavoriteBody {
    repo_name: Option<String>,
}

/// POST /repos/favorite
///
/// Persists a favorite for the requesting user. Append-only: repeated
/// favorites of the same repository each insert a row.
async fn add_favorite(
    State(state): State<AppState>,
    user: AuthedUser,
    Json(body): Json<FavoriteBody>,
) -> Result<impl IntoResponse, AppError> {
    let repo_name = body
        .repo_name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| AppError::Validation("repo_name is required".to_string()))?;

    let inserted = state
        .db
        .insert_favorite(&user.session.github_id.to_string(), &repo_name)
        .await?;

    Ok(Json(inserted))
}

/// GET /repos/favorites
///
/// Returns the requesting user's favorites, newest first. Rows are
/// filtered by the session's GitHub user ID; other users' favorites
/// are never exposed.
async fn list_favorites(
    State(state): State<AppState>,
    user: AuthedUser,
) -> Result<impl IntoResponse, AppError> {
    let favorites = state
        .db
        .get_favorites_for_user(&user.session.github_id.to_string())
        .await?;

    Ok(Json(favorites))
}
