//! Session Token Value Object
//!
//! A session token is `<id>.<signature>`, both halves base64url without
//! padding:
//! - `id` is 32 bytes from the OS random source and keys the session table
//! - `signature` is HMAC-SHA256(server secret, id)
//!
//! The signature lets forged or mangled cookies be rejected before the
//! session table is consulted.

use platform::crypto::{
    from_base64_url, hmac_sha256, random_bytes, to_base64_url, verify_hmac_sha256,
};
use std::fmt;

/// Entropy of a session id in bytes
pub const SESSION_ID_BYTES: usize = 32;

/// Key of the session table (the unsigned half of the token)
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Enough to correlate log lines, not enough to replay
        let prefix: String = self.0.chars().take(6).collect();
        write!(f, "SessionId({}…)", prefix)
    }
}

/// Signed session token as handed to the client
pub struct SessionToken {
    session_id: SessionId,
    token: String,
}

impl SessionToken {
    /// Generate a fresh random id and sign it
    pub fn generate(secret: &[u8]) -> Self {
        let id = to_base64_url(&random_bytes(SESSION_ID_BYTES));
        let signature = to_base64_url(&hmac_sha256(secret, id.as_bytes()));
        let token = format!("{}.{}", id, signature);

        Self {
            session_id: SessionId(id),
            token,
        }
    }

    /// Check the signature of a client-supplied token
    ///
    /// Returns the session id only if the token is well-formed and signed
    /// with `secret`.
    pub fn verify(token: &str, secret: &[u8]) -> Option<SessionId> {
        let (id, signature) = token.split_once('.')?;

        let id_bytes = from_base64_url(id).ok()?;
        if id_bytes.len() != SESSION_ID_BYTES {
            return None;
        }

        let signature = from_base64_url(signature).ok()?;
        verify_hmac_sha256(secret, id.as_bytes(), &signature)
            .then(|| SessionId(id.to_string()))
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Cookie value
    pub fn as_str(&self) -> &str {
        &self.token
    }

    pub fn into_parts(self) -> (SessionId, String) {
        (self.session_id, self.token)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("session_id", &self.session_id)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: [u8; 32] = [7u8; 32];

    #[test]
    fn test_generated_token_verifies() {
        let token = SessionToken::generate(&SECRET);
        let id = SessionToken::verify(token.as_str(), &SECRET).unwrap();
        assert_eq!(&id, token.session_id());
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = SessionToken::generate(&SECRET);
        let b = SessionToken::generate(&SECRET);
        assert_ne!(a.as_str(), b.as_str());
        assert_ne!(a.session_id(), b.session_id());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = SessionToken::generate(&SECRET);
        assert!(SessionToken::verify(token.as_str(), &[8u8; 32]).is_none());
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let token = SessionToken::generate(&SECRET);
        let (id, signature) = token.as_str().split_once('.').unwrap();

        let other = SessionToken::generate(&SECRET);
        let (other_id, _) = other.as_str().split_once('.').unwrap();

        assert!(SessionToken::verify(&format!("{}.{}", other_id, signature), &SECRET).is_none());
        assert!(SessionToken::verify(id, &SECRET).is_none());
        assert!(SessionToken::verify(&format!("{}.", id), &SECRET).is_none());
        assert!(SessionToken::verify("", &SECRET).is_none());
        assert!(SessionToken::verify("a.b.c", &SECRET).is_none());
    }

    #[test]
    fn test_short_id_is_rejected_even_if_signed() {
        let id = to_base64_url(b"short");
        let signature = to_base64_url(&hmac_sha256(&SECRET, id.as_bytes()));
        assert!(SessionToken::verify(&format!("{}.{}", id, signature), &SECRET).is_none());
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let token = SessionToken::generate(&SECRET);
        let debug = format!("{:?}", token);
        assert!(!debug.contains(token.as_str()));
        assert!(debug.contains("REDACTED"));
    }
}
