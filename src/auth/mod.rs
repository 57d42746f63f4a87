//! GitHub OAuth authentication
//!
//! Handles:
//! - GitHub OAuth flow
//! - Session token issuance and validation
//! - Authentication extractor for protected routes

mod middleware;
mod oauth;
pub mod session;

pub use middleware::AuthedUser;
pub use oauth::auth_router;
pub use session::{Session, create_session_token, verify_session_token};
