//! In-Memory Repository Implementations
//!
//! `MemorySessionStore` is the production session table. `MemoryUserStore`
//! backs tests and database-less runs.
//!
//! Locks are `std::sync` and never held across an `.await`. A poisoned lock
//! is recovered: every critical section leaves the map consistent.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::entity::{session::Session, user::UserIdentity};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{email::Email, session_token::SessionId};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// Users
// ============================================================================

/// In-memory user identity store
///
/// Cheap to clone; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<Email, UserIdentity>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Email, UserIdentity>> {
        self.users.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Email, UserIdentity>> {
        self.users.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Synchronous existence check, for callers already inside a critical section
    pub fn contains(&self, email: &Email) -> bool {
        self.read().contains_key(email)
    }

    /// Delete an identity; the service itself never does this
    pub fn remove(&self, email: &Email) -> bool {
        self.write().remove(email).is_some()
    }

    /// Replace the like counter of `email` with `f(current)` in one critical
    /// section and return the new value, or `None` if there is no identity.
    pub fn update_likes(&self, email: &Email, f: impl FnOnce(i64) -> i64) -> Option<i64> {
        let mut users = self.write();
        let user = users.get_mut(email)?;
        user.likes = f(user.likes);
        Some(user.likes)
    }
}

impl UserRepository for MemoryUserStore {
    async fn create(&self, user: &UserIdentity) -> AuthResult<()> {
        let mut users = self.write();
        if users.contains_key(&user.email) {
            return Err(AuthError::EmailTaken);
        }
        users.insert(user.email.clone(), user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<UserIdentity>> {
        Ok(self.read().get(email).cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        Ok(self.read().contains_key(email))
    }
}

// ============================================================================
// Sessions
// ============================================================================

/// In-memory session table
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<SessionId, Session>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<SessionId, Session>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

impl SessionRepository for MemorySessionStore {
    async fn insert(&self, session: &Session) -> AuthResult<()> {
        self.write()
            .insert(session.session_id.clone(), session.clone());
        Ok(())
    }

    async fn find(&self, session_id: &SessionId) -> AuthResult<Option<Session>> {
        Ok(self.read().get(session_id).cloned())
    }

    async fn remove(&self, session_id: &SessionId) -> AuthResult<bool> {
        Ok(self.write().remove(session_id).is_some())
    }

    async fn remove_expired(&self, now: DateTime<Utc>) -> AuthResult<u64> {
        let mut sessions = self.write();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired_at(now));
        Ok((before - sessions.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{
        person_name::PersonName,
        session_token::SessionToken,
        user_password::{RawPassword, UserPassword},
    };
    use chrono::Duration;

    fn identity(email: &str) -> UserIdentity {
        let raw = RawPassword::new("pw".to_string()).unwrap();
        UserIdentity::new(
            Email::new(email).unwrap(),
            PersonName::new("A", "First name").unwrap(),
            PersonName::new("B", "Last name").unwrap(),
            UserPassword::from_raw(&raw, None).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_create_is_unique_by_email() {
        let store = MemoryUserStore::new();
        store.create(&identity("a@example.com")).await.unwrap();

        let err = store.create(&identity("a@example.com")).await.unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryUserStore::new();
        let clone = store.clone();
        store.create(&identity("a@example.com")).await.unwrap();

        let email = Email::new("a@example.com").unwrap();
        assert!(clone.exists_by_email(&email).await.unwrap());
        assert!(clone.remove(&email));
        assert!(!store.exists_by_email(&email).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_likes() {
        let store = MemoryUserStore::new();
        store.create(&identity("a@example.com")).await.unwrap();
        let email = Email::new("a@example.com").unwrap();

        assert_eq!(store.update_likes(&email, |n| n + 1), Some(1));
        assert_eq!(store.update_likes(&email, |n| n + 1), Some(2));

        let missing = Email::new("b@example.com").unwrap();
        assert_eq!(store.update_likes(&missing, |n| n + 1), None);
    }

    #[tokio::test]
    async fn test_remove_expired_keeps_live_sessions() {
        let store = MemorySessionStore::new();
        let email = Email::new("a@example.com").unwrap();

        let live = Session::new(
            SessionToken::generate(&[0u8; 32]).session_id().clone(),
            email.clone(),
            Duration::hours(2),
        );
        let dead = Session::new(
            SessionToken::generate(&[0u8; 32]).session_id().clone(),
            email,
            Duration::zero(),
        );
        store.insert(&live).await.unwrap();
        store.insert(&dead).await.unwrap();

        assert_eq!(store.remove_expired(Utc::now()).await.unwrap(), 1);
        assert!(store.find(&live.session_id).await.unwrap().is_some());
        assert!(store.find(&dead.session_id).await.unwrap().is_none());
        assert!(!store.remove(&dead.session_id).await.unwrap());
    }
}
