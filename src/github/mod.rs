//! GitHub upstream client
//!
//! All outbound calls to GitHub go through this module:
//! - OAuth code exchange (authorize + token endpoints)
//! - Authenticated identity fetch
//! - Repository list and creation

mod client;

pub use client::{CreateRepoRequest, GitHubClient, GitHubUser};
