//! Data layer module
//!
//! Handles all data persistence and caching:
//! - SQLite database operations (favorites)
//! - Credential cache (volatile)
//! - Response cache (volatile)

mod cache;
mod database;
mod models;

pub use cache::{CredentialCache, ResponseCache};
pub use database::Database;
pub use models::*;
