//! Common test utilities for E2E tests

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use axum::{
    Json,
    Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use hubgate::{AppState, config};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Session secret shared between the test config and token-crafting tests
pub const SESSION_SECRET: &str = "test-secret-key-32-bytes-long!!!";

/// Access token the stub hands out for a successful exchange
pub const STUB_ACCESS_TOKEN: &str = "gho_test_token";

/// Stub GitHub server
///
/// Implements the OAuth token endpoint and the small REST surface the
/// relay uses, counting every upstream call so tests can assert how
/// often the relay actually went upstream.
#[derive(Clone)]
pub struct StubGitHub {
    pub base_url: String,
    pub token_exchanges: Arc<AtomicU64>,
    pub user_fetches: Arc<AtomicU64>,
    pub repo_lists: Arc<AtomicU64>,
    pub repo_creates: Arc<AtomicU64>,
    /// When set, `GET /user/repos` answers 500
    pub fail_repo_list: Arc<AtomicBool>,
}

impl StubGitHub {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let stub = Self {
            base_url: format!("http://{addr}"),
            token_exchanges: Arc::new(AtomicU64::new(0)),
            user_fetches: Arc::new(AtomicU64::new(0)),
            repo_lists: Arc::new(AtomicU64::new(0)),
            repo_creates: Arc::new(AtomicU64::new(0)),
            fail_repo_list: Arc::new(AtomicBool::new(false)),
        };

        let app = Router::new()
            .route("/login/oauth/access_token", post(token_endpoint))
            .route("/user", get(user_endpoint))
            .route("/user/repos", get(list_repos_endpoint).post(create_repo_endpoint))
            .with_state(stub.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        stub
    }
}

/// POST /login/oauth/access_token
///
/// `bad-code` provokes the no-access-token reply GitHub sends for a
/// rejected code; `user-fail` hands out a token the `/user` endpoint
/// will refuse.
async fn token_endpoint(
    State(stub): State<StubGitHub>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    stub.token_exchanges.fetch_add(1, Ordering::SeqCst);

    let code = body["code"].as_str().unwrap_or_default();
    let reply = match code {
        "bad-code" => serde_json::json!({"error": "bad_verification_code"}),
        "user-fail" => serde_json::json!({
            "access_token": "gho_rejected",
            "token_type": "bearer",
            "scope": "user",
        }),
        _ => serde_json::json!({
            "access_token": STUB_ACCESS_TOKEN,
            "token_type": "bearer",
            "scope": "user",
        }),
    };

    Json(reply)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// GET /user
async fn user_endpoint(State(stub): State<StubGitHub>, headers: HeaderMap) -> impl IntoResponse {
    stub.user_fetches.fetch_add(1, Ordering::SeqCst);

    if bearer_token(&headers) != Some(STUB_ACCESS_TOKEN) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"message": "Bad credentials"})),
        );
    }

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "id": 1234,
            "login": "octocat",
            "avatar_url": "https://avatars.example.com/u/1234",
            "name": "The Octocat",
        })),
    )
}

/// GET /user/repos
async fn list_repos_endpoint(
    State(stub): State<StubGitHub>,
    headers: HeaderMap,
) -> impl IntoResponse {
    stub.repo_lists.fetch_add(1, Ordering::SeqCst);

    if stub.fail_repo_list.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"message": "upstream exploded"})),
        );
    }

    if bearer_token(&headers) != Some(STUB_ACCESS_TOKEN) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"message": "Bad credentials"})),
        );
    }

    (
        StatusCode::OK,
        Json(serde_json::json!([
            {"name": "demo-repo", "full_name": "octocat/demo-repo", "private": false},
            {"name": "spoon-knife", "full_name": "octocat/spoon-knife", "private": false},
        ])),
    )
}

/// POST /user/repos
async fn create_repo_endpoint(
    State(stub): State<StubGitHub>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    stub.repo_creates.fetch_add(1, Ordering::SeqCst);

    if bearer_token(&headers) != Some(STUB_ACCESS_TOKEN) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"message": "Bad credentials"})),
        );
    }

    let name = body["name"].as_str().unwrap_or_default().to_string();
    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "name": name,
            "full_name": format!("octocat/{name}"),
            "private": body["private"].as_bool().unwrap_or(false),
        })),
    )
}

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub github: StubGitHub,
    pub client: reqwest::Client,
    pub _temp_dir: TempDir,
}

impl TestServer {
    /// Create a new test server instance backed by a stub GitHub
    pub async fn new() -> Self {
        // Create temporary directory for test database
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let github = StubGitHub::start().await;

        // Create test configuration pointing upstream at the stub
        let config = config::AppConfig {
            server: config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
                frontend_origin: "http://localhost:5173".to_string(),
            },
            database: config::DatabaseConfig { path: db_path },
            auth: config::AuthConfig {
                session_secret: SESSION_SECRET.to_string(),
            },
            github: config::GitHubConfig {
                client_id: "test-client-id".to_string(),
                client_secret: "test-client-secret".to_string(),
                scope: "user".to_string(),
                auth_base_url: github.base_url.clone(),
                api_base_url: github.base_url.clone(),
            },
            cache: config::CacheConfig {
                credential_ttl_secs: 7200,
                repos_ttl_secs: 3600,
            },
            logging: config::LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        };

        let state = AppState::new(config).await.unwrap();
        let app = hubgate::build_router(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr: addr.to_string(),
            github,
            client: reqwest::Client::new(),
            _temp_dir: temp_dir,
        }
    }

    /// Build a full URL for a path
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Run the OAuth callback against the stub and return the session token
    pub async fn login(&self) -> String {
        let response = self
            .client
            .get(self.url("/auth/callback?code=test-code"))
            .send()
            .await
            .expect("callback request succeeds");
        assert_eq!(response.status(), 200, "login callback must succeed");

        let body: serde_json::Value = response.json().await.expect("callback body is JSON");
        body["token"]
            .as_str()
            .expect("callback body contains token")
            .to_string()
    }
}
