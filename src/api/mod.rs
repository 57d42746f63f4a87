//! API layer
//!
//! HTTP handlers for:
//! - Protected resource gateway (GitHub repos, favorites)
//! - Metrics (Prometheus)

pub mod metrics;
mod repos;

pub use metrics::metrics_router;
pub use repos::repos_router;
