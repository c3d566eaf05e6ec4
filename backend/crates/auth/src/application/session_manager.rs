//! Session Manager
//!
//! Issues, validates, and revokes session tokens.
//!
//! ## Lifecycle
//! `issue` → active until `issued_at + TTL` → expired. Expired sessions are
//! removed lazily when presented, and in bulk by `cleanup_expired`.
//! Validation never extends a session.

use chrono::Utc;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::session::Session;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{email::Email, session_token::SessionToken};
use crate::error::{AuthError, AuthResult};

/// Freshly issued session together with its client token
#[derive(Debug)]
pub struct IssuedSession {
    /// Cookie value (`<id>.<signature>`)
    pub token: String,
    pub session: Session,
}

/// Session manager
pub struct SessionManager<S, U>
where
    S: SessionRepository,
    U: UserRepository,
{
    sessions: Arc<S>,
    users: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<S, U> SessionManager<S, U>
where
    S: SessionRepository,
    U: UserRepository,
{
    pub fn new(sessions: Arc<S>, users: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self {
            sessions,
            users,
            config,
        }
    }

    /// Issue a new session for `email`
    ///
    /// A user may hold any number of sessions at once.
    pub async fn issue(&self, email: &Email) -> AuthResult<IssuedSession> {
        let ttl = chrono::Duration::from_std(self.config.session_ttl)
            .map_err(|e| AuthError::Internal(format!("Invalid session TTL: {}", e)))?;

        let (session_id, token) = SessionToken::generate(&self.config.session_secret).into_parts();
        let session = Session::new(session_id, email.clone(), ttl);

        self.sessions.insert(&session).await?;

        tracing::info!(
            email = %email,
            expires_at = %session.expires_at,
            "Session issued"
        );

        Ok(IssuedSession { token, session })
    }

    /// Validate a client token
    ///
    /// ## Errors
    /// `SessionInvalid` if the signature is bad, the session is unknown or
    /// expired, or its identity no longer exists. Storage failures surface
    /// as `Database`.
    pub async fn validate(&self, token: &str) -> AuthResult<Session> {
        let session_id = SessionToken::verify(token, &self.config.session_secret)
            .ok_or(AuthError::SessionInvalid)?;

        let session = self
            .sessions
            .find(&session_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        if session.is_expired() {
            self.sessions.remove(&session_id).await?;
            tracing::debug!(email = %session.email, "Session expired");
            return Err(AuthError::SessionInvalid);
        }

        if !self.users.exists_by_email(&session.email).await? {
            self.sessions.remove(&session_id).await?;
            tracing::warn!(email = %session.email, "Session bound to a missing identity");
            return Err(AuthError::SessionInvalid);
        }

        Ok(session)
    }

    /// Revoke a session
    ///
    /// Unknown, expired, and malformed tokens are a no-op.
    pub async fn revoke(&self, token: &str) -> AuthResult<()> {
        let Some(session_id) = SessionToken::verify(token, &self.config.session_secret) else {
            return Ok(());
        };

        if self.sessions.remove(&session_id).await? {
            tracing::info!(session_id = ?session_id, "Session revoked");
        }

        Ok(())
    }

    /// Remove every expired session; returns how many were removed
    pub async fn cleanup_expired(&self) -> AuthResult<u64> {
        let removed = self.sessions.remove_expired(Utc::now()).await?;

        if removed > 0 {
            tracing::info!(sessions_deleted = removed, "Cleaned up expired sessions");
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::{MemorySessionStore, MemoryUserStore};
    use crate::domain::entity::user::UserIdentity;
    use crate::domain::value_object::{
        person_name::PersonName,
        user_password::{RawPassword, UserPassword},
    };
    use std::time::Duration;

    struct Fixture {
        manager: SessionManager<MemorySessionStore, MemoryUserStore>,
        sessions: Arc<MemorySessionStore>,
        users: MemoryUserStore,
        email: Email,
    }

    async fn fixture(ttl: Duration) -> Fixture {
        let users = MemoryUserStore::new();
        let email = Email::new("grace@example.com").unwrap();
        let raw = RawPassword::new("cobol".to_string()).unwrap();
        users
            .create(&UserIdentity::new(
                email.clone(),
                PersonName::new("Grace", "First name").unwrap(),
                PersonName::new("Hopper", "Last name").unwrap(),
                UserPassword::from_raw(&raw, None).unwrap(),
            ))
            .await
            .unwrap();

        let sessions = Arc::new(MemorySessionStore::new());
        let config = AuthConfig {
            session_ttl: ttl,
            ..AuthConfig::development()
        };
        let manager = SessionManager::new(
            sessions.clone(),
            Arc::new(users.clone()),
            Arc::new(config),
        );

        Fixture {
            manager,
            sessions,
            users,
            email,
        }
    }

    #[tokio::test]
    async fn test_issue_then_validate() {
        let f = fixture(Duration::from_secs(7200)).await;

        let issued = f.manager.issue(&f.email).await.unwrap();
        let session = f.manager.validate(&issued.token).await.unwrap();

        assert_eq!(session.email, f.email);
        assert_eq!(
            session.expires_at - session.issued_at,
            chrono::Duration::hours(2)
        );
    }

    #[tokio::test]
    async fn test_validation_does_not_extend_session() {
        let f = fixture(Duration::from_secs(7200)).await;

        let issued = f.manager.issue(&f.email).await.unwrap();
        let first = f.manager.validate(&issued.token).await.unwrap();
        let second = f.manager.validate(&issued.token).await.unwrap();

        assert_eq!(first.expires_at, second.expires_at);
        assert_eq!(first.expires_at, issued.session.expires_at);
    }

    #[tokio::test]
    async fn test_expired_session_is_invalid_and_removed() {
        let f = fixture(Duration::from_millis(50)).await;

        let issued = f.manager.issue(&f.email).await.unwrap();
        assert!(f.manager.validate(&issued.token).await.is_ok());

        tokio::time::sleep(Duration::from_millis(100)).await;

        let err = f.manager.validate(&issued.token).await.unwrap_err();
        assert!(matches!(err, AuthError::SessionInvalid));
        assert_eq!(f.sessions.len(), 0);
    }

    #[tokio::test]
    async fn test_revoked_session_is_invalid() {
        let f = fixture(Duration::from_secs(7200)).await;

        let issued = f.manager.issue(&f.email).await.unwrap();
        f.manager.revoke(&issued.token).await.unwrap();

        let err = f.manager.validate(&issued.token).await.unwrap_err();
        assert!(matches!(err, AuthError::SessionInvalid));
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let f = fixture(Duration::from_secs(7200)).await;

        let issued = f.manager.issue(&f.email).await.unwrap();
        f.manager.revoke(&issued.token).await.unwrap();
        f.manager.revoke(&issued.token).await.unwrap();
        f.manager.revoke("garbage").await.unwrap();
        f.manager.revoke("").await.unwrap();
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let f = fixture(Duration::from_secs(7200)).await;

        let a = f.manager.issue(&f.email).await.unwrap();
        let b = f.manager.issue(&f.email).await.unwrap();
        assert_ne!(a.token, b.token);

        f.manager.revoke(&a.token).await.unwrap();
        assert!(f.manager.validate(&a.token).await.is_err());
        assert!(f.manager.validate(&b.token).await.is_ok());
    }

    #[tokio::test]
    async fn test_session_of_removed_identity_is_invalid() {
        let f = fixture(Duration::from_secs(7200)).await;

        let issued = f.manager.issue(&f.email).await.unwrap();
        assert!(f.users.remove(&f.email));

        let err = f.manager.validate(&issued.token).await.unwrap_err();
        assert!(matches!(err, AuthError::SessionInvalid));
        assert_eq!(f.sessions.len(), 0);
    }

    #[tokio::test]
    async fn test_forged_tokens_are_invalid() {
        let f = fixture(Duration::from_secs(7200)).await;
        let issued = f.manager.issue(&f.email).await.unwrap();

        let other_secret = SessionToken::generate(&[9u8; 32]);
        for token in ["", "abc", "abc.def", other_secret.as_str()] {
            let err = f.manager.validate(token).await.unwrap_err();
            assert!(matches!(err, AuthError::SessionInvalid));
        }

        // The genuine session is untouched
        assert!(f.manager.validate(&issued.token).await.is_ok());
    }

    #[tokio::test]
    async fn test_cleanup_expired() {
        let f = fixture(Duration::from_millis(50)).await;

        f.manager.issue(&f.email).await.unwrap();
        f.manager.issue(&f.email).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(f.manager.cleanup_expired().await.unwrap(), 2);
        assert_eq!(f.manager.cleanup_expired().await.unwrap(), 0);
        assert_eq!(f.sessions.len(), 0);
    }
}
