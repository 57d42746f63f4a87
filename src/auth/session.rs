//! Session management
//!
//! Uses HMAC-signed bearer tokens issued after GitHub OAuth.
//! No server-side session storage needed.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Session lifetime: 12 hours from issuance
pub const SESSION_TTL_HOURS: i64 = 12;

/// User session data
///
/// Encoded into the signed token. Contains minimal user info
/// from GitHub OAuth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// GitHub user ID
    pub github_id: u64,
    /// GitHub username
    pub login: String,
    /// Avatar URL from GitHub
    pub avatar_url: String,
    /// When the session was created
    pub issued_at: DateTime<Utc>,
    /// When the session expires
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Issue a new session for an authenticated identity
    ///
    /// Expiry is fixed at [`SESSION_TTL_HOURS`] from now.
    pub fn issue(github_id: u64, login: String, avatar_url: String) -> Self {
        let now = Utc::now();
        Self {
            github_id,
            login,
            avatar_url,
            issued_at: now,
            expires_at: now + Duration::hours(SESSION_TTL_HOURS),
        }
    }

    /// Check if session is expired
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}

/// Create a signed session token
///
/// Token format: base64(payload).base64(hmac_sha256(payload))
///
/// # Arguments
/// * `session` - Session data to encode
/// * `secret` - HMAC secret key
///
/// # Returns
/// Signed token string
pub fn create_session_token(
    session: &Session,
    secret: &str,
) -> Result<String, crate::error::AppError> {
    use base64::{Engine as _, engine::general_purpose};
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    // 1. Serialize session to JSON
    let payload =
        serde_json::to_string(session).map_err(|e| crate::error::AppError::Internal(e.into()))?;

    // 2. Base64 encode the payload
    let payload_b64 = general_purpose::URL_SAFE_NO_PAD.encode(payload.as_bytes());

    // 3. Create HMAC-SHA256 signature
    type HmacSha256 = Hmac<Sha256>;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| crate::error::AppError::Internal(anyhow::anyhow!("HMAC key setup: {e}")))?;
    mac.update(payload_b64.as_bytes());
    let signature = mac.finalize().into_bytes();
    let signature_b64 = general_purpose::URL_SAFE_NO_PAD.encode(signature);

    // 4. Return "{payload}.{signature}"
    Ok(format!("{}.{}", payload_b64, signature_b64))
}

/// Verify and decode a session token
///
/// # Arguments
/// * `token` - Token string to verify
/// * `secret` - HMAC secret key
///
/// # Returns
/// Decoded session if valid
///
/// # Errors
/// * `MalformedToken` - token is not decodable
/// * `InvalidSignature` - signature does not match the payload
/// * `TokenExpired` - session is past its expiry
pub fn verify_session_token(token: &str, secret: &str) -> Result<Session, crate::error::AppError> {
    use base64::{Engine as _, engine::general_purpose};
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    use crate::error::AppError;

    // 1. Split token into payload and signature
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 2 {
        return Err(AppError::MalformedToken);
    }

    let payload_b64 = parts[0];
    let signature_b64 = parts[1];

    // 2. Verify HMAC signature
    type HmacSha256 = Hmac<Sha256>;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC key setup: {e}")))?;
    mac.update(payload_b64.as_bytes());

    let expected_signature = general_purpose::URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| AppError::MalformedToken)?;

    mac.verify_slice(&expected_signature)
        .map_err(|_| AppError::InvalidSignature)?;

    // 3. Decode and deserialize payload
    let payload_bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(payload_b64)
        .map_err(|_| AppError::MalformedToken)?;

    let payload_str = String::from_utf8(payload_bytes).map_err(|_| AppError::MalformedToken)?;

    let session: Session =
        serde_json::from_str(&payload_str).map_err(|_| AppError::MalformedToken)?;

    // 4. Check if session is expired
    if session.is_expired() {
        return Err(AppError::TokenExpired);
    }

    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    const SECRET: &str = "test-secret-key-32-bytes-long!!!";

    fn test_session() -> Session {
        Session::issue(
            1234,
            "octocat".to_string(),
            "https://avatars.example.com/u/1234".to_string(),
        )
    }

    #[test]
    fn issue_sets_twelve_hour_expiry() {
        let session = test_session();
        let lifetime = session.expires_at - session.issued_at;
        assert_eq!(lifetime, Duration::hours(12));
        assert!(!session.is_expired());
    }

    #[test]
    fn round_trip_preserves_identity() {
        let session = test_session();
        let token = create_session_token(&session, SECRET).unwrap();

        let decoded = verify_session_token(&token, SECRET).unwrap();
        assert_eq!(decoded.github_id, 1234);
        assert_eq!(decoded.login, "octocat");
        assert_eq!(decoded.avatar_url, "https://avatars.example.com/u/1234");
    }

    #[test]
    fn expired_session_is_rejected() {
        let mut session = test_session();
        session.issued_at = Utc::now() - Duration::hours(13);
        session.expires_at = Utc::now() - Duration::hours(1);

        let token = create_session_token(&session, SECRET).unwrap();
        let result = verify_session_token(&token, SECRET);
        assert!(matches!(result, Err(AppError::TokenExpired)));
    }

    #[test]
    fn tampered_payload_fails_signature_check() {
        let session = test_session();
        let token = create_session_token(&session, SECRET).unwrap();

        // Flip the payload while keeping the original signature
        let signature = token.split('.').nth(1).unwrap();
        let mut other = test_session();
        other.login = "somebody-else".to_string();
        let forged = create_session_token(&other, SECRET).unwrap();
        let forged_payload = forged.split('.').next().unwrap();

        let tampered = format!("{}.{}", forged_payload, signature);
        let result = verify_session_token(&tampered, SECRET);
        assert!(matches!(result, Err(AppError::InvalidSignature)));
    }

    #[test]
    fn wrong_secret_fails_signature_check() {
        let session = test_session();
        let token = create_session_token(&session, SECRET).unwrap();

        let result = verify_session_token(&token, "another-secret-key-32-bytes!!!!!");
        assert!(matches!(result, Err(AppError::InvalidSignature)));
    }

    #[test]
    fn garbage_token_is_malformed() {
        for token in ["", "not-a-token", "a.b.c", "%%%.###"] {
            let result = verify_session_token(token, SECRET);
            assert!(
                matches!(result, Err(AppError::MalformedToken)),
                "expected MalformedToken for {token:?}"
            );
        }
    }
}
