//! In-memory caches
//!
//! These caches are volatile and cleared on restart.
//! Uses Moka for high-performance concurrent caching with native TTL,
//! so entry expiry is enforced by the store itself rather than by
//! timestamp checks in callers. Both caches are keyed by the full
//! session token string.

use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// Credential Cache
// =============================================================================

/// Cache of provider credentials obtained during login
///
/// Maps session token -> GitHub access token. An absent entry means the
/// user must re-authenticate; "never stored" and "expired" are
/// indistinguishable to callers. Writes are last-write-wins overwrites.
pub struct CredentialCache {
    /// Session token -> provider access token
    credentials: Cache<String, String>,
}

impl CredentialCache {
    /// Create a new credential cache
    ///
    /// # Arguments
    /// * `ttl` - Time-to-live for each entry, counted from write
    pub fn new(ttl: Duration) -> Self {
        let credentials = Cache::builder().time_to_live(ttl).build();

        Self { credentials }
    }

    /// Store the provider credential for a session
    ///
    /// Overwrites any existing entry for the same session token and
    /// restarts its TTL.
    pub async fn put(&self, session_token: &str, credential: String) {
        self.credentials
            .insert(session_token.to_string(), credential)
            .await;

        use crate::metrics::CACHE_SIZE;
        CACHE_SIZE
            .with_label_values(&["credential"])
            .set(self.credentials.entry_count() as i64);
    }

    /// Get the provider credential for a session
    pub async fn get(&self, session_token: &str) -> Option<String> {
        let result = self.credentials.get(session_token).await;

        use crate::metrics::{CACHE_HITS_TOTAL, CACHE_MISSES_TOTAL};
        if result.is_some() {
            CACHE_HITS_TOTAL.with_label_values(&["credential"]).inc();
        } else {
            CACHE_MISSES_TOTAL.with_label_values(&["credential"]).inc();
        }

        result
    }
}

// =============================================================================
// Response Cache
// =============================================================================

/// Cache of serialized upstream API responses
///
/// Maps session token -> serialized JSON payload. Pure cache: staleness
/// up to the TTL is acceptable, entries are never explicitly
/// invalidated, and writes are always full replacements with a fresh
/// TTL.
pub struct ResponseCache {
    /// Session token -> serialized payload
    payloads: Cache<String, Arc<String>>,
}

impl ResponseCache {
    /// Create a new response cache
    ///
    /// # Arguments
    /// * `ttl` - Time-to-live for each entry, counted from write
    pub fn new(ttl: Duration) -> Self {
        let payloads = Cache::builder().time_to_live(ttl).build();

        Self { payloads }
    }

    /// Store a serialized payload for a session
    pub async fn put(&self, session_token: &str, payload: String) {
        self.payloads
            .insert(session_token.to_string(), Arc::new(payload))
            .await;

        use crate::metrics::CACHE_SIZE;
        CACHE_SIZE
            .with_label_values(&["response"])
            .set(self.payloads.entry_count() as i64);
    }

    /// Get the cached payload for a session
    pub async fn get(&self, session_token: &str) -> Option<Arc<String>> {
        let result = self.payloads.get(session_token).await;

        use crate::metrics::{CACHE_HITS_TOTAL, CACHE_MISSES_TOTAL};
        if result.is_some() {
            CACHE_HITS_TOTAL.with_label_values(&["response"]).inc();
        } else {
            CACHE_MISSES_TOTAL.with_label_values(&["response"]).inc();
        }

        result
    }
}
