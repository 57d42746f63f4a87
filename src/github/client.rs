//! HTTP client for the GitHub OAuth and REST endpoints
//!
//! Base URLs are injected from configuration so tests can point the
//! client at a local stub server. No retries: every call is a single
//! attempt whose failure surfaces directly to the caller.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::GitHubConfig;
use crate::error::AppError;
use crate::metrics::{UPSTREAM_REQUEST_DURATION_SECONDS, UPSTREAM_REQUESTS_TOTAL};

/// GitHub user profile, as returned by `GET /user`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubUser {
    pub id: u64,
    pub login: String,
    pub avatar_url: String,
    pub name: Option<String>,
}

/// Token endpoint response
///
/// GitHub answers 200 even for rejected codes, with an error body and
/// no `access_token` field, so the field is optional and absence is
/// the failure signal.
#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: Option<String>,
}

/// Body for the token endpoint POST
#[derive(Debug, Serialize)]
struct AccessTokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
}

/// Repository creation payload for `POST /user/repos`
#[derive(Debug, Serialize)]
pub struct CreateRepoRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
}

/// Client for GitHub's OAuth and REST API hosts
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    auth_base_url: String,
    api_base_url: String,
    client_id: String,
    client_secret: String,
    scope: String,
}

impl GitHubClient {
    /// Create a client from configuration
    pub fn new(config: &GitHubConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            auth_base_url: config.auth_base_url.trim_end_matches('/').to_string(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            scope: config.scope.clone(),
        }
    }

    /// Build the authorization URL the client is redirected to
    pub fn authorize_url(&self, state: &str) -> String {
        format!(
            "{}/login/oauth/authorize?client_id={}&scope={}&state={}",
            self.auth_base_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.scope),
            urlencoding::encode(state),
        )
    }

    /// Exchange an authorization code for an access token
    ///
    /// # Errors
    /// `TokenExchangeFailed` if the endpoint answers without an access
    /// token or with a non-success status.
    pub async fn exchange_code(&self, code: &str) -> Result<String, AppError> {
        let started = Instant::now();
        let result = self
            .http
            .post(format!("{}/login/oauth/access_token", self.auth_base_url))
            .header(http::header::ACCEPT, "application/json")
            .json(&AccessTokenRequest {
                client_id: &self.client_id,
                client_secret: &self.client_secret,
                code,
            })
            .send()
            .await;
        observe_upstream("exchange_code", started, result.is_ok());

        let response =
            result.map_err(|e| AppError::TokenExchangeFailed(format!("token request: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::TokenExchangeFailed(format!(
                "token endpoint returned {status}"
            )));
        }

        let token: AccessTokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::TokenExchangeFailed(format!("invalid token response: {e}")))?;

        token
            .access_token
            .ok_or_else(|| AppError::TokenExchangeFailed("no access token in response".into()))
    }

    /// Fetch the authenticated user's profile
    ///
    /// Any failure here is fatal to the OAuth flow and surfaces as an
    /// authentication error.
    pub async fn fetch_user(&self, access_token: &str) -> Result<GitHubUser, AppError> {
        let started = Instant::now();
        let result = self
            .http
            .get(format!("{}/user", self.api_base_url))
            .bearer_auth(access_token)
            .send()
            .await;
        observe_upstream("fetch_user", started, result.is_ok());

        let response = result.map_err(|e| AppError::Auth(format!("identity fetch: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Auth(format!(
                "identity endpoint returned {status}"
            )));
        }

        response
            .json::<GitHubUser>()
            .await
            .map_err(|e| AppError::Auth(format!("invalid identity response: {e}")))
    }

    /// List the authenticated user's repositories
    pub async fn list_repos(&self, access_token: &str) -> Result<serde_json::Value, AppError> {
        let started = Instant::now();
        let result = self
            .http
            .get(format!("{}/user/repos", self.api_base_url))
            .bearer_auth(access_token)
            .send()
            .await;
        observe_upstream("list_repos", started, result.is_ok());

        let response = result.map_err(|e| AppError::Upstream(format!("repository list: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "repository list returned {status}"
            )));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| AppError::Upstream(format!("invalid repository list: {e}")))
    }

    /// Create a repository for the authenticated user
    pub async fn create_repo(
        &self,
        access_token: &str,
        request: &CreateRepoRequest,
    ) -> Result<serde_json::Value, AppError> {
        let started = Instant::now();
        let result = self
            .http
            .post(format!("{}/user/repos", self.api_base_url))
            .bearer_auth(access_token)
            .json(request)
            .send()
            .await;
        observe_upstream("create_repo", started, result.is_ok());

        let response =
            result.map_err(|e| AppError::Upstream(format!("repository create: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "repository create returned {status}"
            )));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| AppError::Upstream(format!("invalid repository response: {e}")))
    }
}

fn observe_upstream(operation: &str, started: Instant, transport_ok: bool) {
    let status = if transport_ok { "sent" } else { "transport_error" };
    UPSTREAM_REQUESTS_TOTAL
        .with_label_values(&[operation, status])
        .inc();
    UPSTREAM_REQUEST_DURATION_SECONDS
        .with_label_values(&[operation])
        .observe(started.elapsed().as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(auth_base: &str, api_base: &str) -> GitHubClient {
        GitHubClient::new(
            &GitHubConfig {
                client_id: "test-client-id".to_string(),
                client_secret: "test-client-secret".to_string(),
                scope: "user".to_string(),
                auth_base_url: auth_base.to_string(),
                api_base_url: api_base.to_string(),
            },
            reqwest::Client::new(),
        )
    }

    #[test]
    fn authorize_url_carries_client_id_scope_and_state() {
        let client = test_client("https://github.com", "https://api.github.com");
        let url = client.authorize_url("abc123");

        assert!(url.starts_with("https://github.com/login/oauth/authorize?"));
        assert!(url.contains("client_id=test-client-id"));
        assert!(url.contains("scope=user"));
        assert!(url.contains("state=abc123"));
    }

    #[test]
    fn base_urls_are_normalized() {
        let client = test_client("https://github.com/", "https://api.github.com/");
        let url = client.authorize_url("s");
        assert!(url.starts_with("https://github.com/login/oauth/authorize?"));
    }

    #[test]
    fn token_response_tolerates_missing_access_token() {
        let parsed: AccessTokenResponse =
            serde_json::from_str(r#"{"error":"bad_verification_code"}"#).unwrap();
        assert!(parsed.access_token.is_none());

        let parsed: AccessTokenResponse =
            serde_json::from_str(r#"{"access_token":"gho_abc","token_type":"bearer"}"#).unwrap();
        assert_eq!(parsed.access_token.as_deref(), Some("gho_abc"));
    }
}
