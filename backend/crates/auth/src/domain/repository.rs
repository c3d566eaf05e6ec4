//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in the
//! infrastructure layer (PostgreSQL and in-memory).

use chrono::{DateTime, Utc};

use crate::domain::entity::{session::Session, user::UserIdentity};
use crate::domain::value_object::{email::Email, session_token::SessionId};
use crate::error::AuthResult;

/// User identity repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new identity
    ///
    /// Fails with `AuthError::EmailTaken` when the email already exists. The
    /// check is the store's uniqueness constraint, not a prior read.
    async fn create(&self, user: &UserIdentity) -> AuthResult<()>;

    /// Find identity by email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<UserIdentity>>;

    /// Check if an identity exists
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;
}

/// Session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Store a freshly issued session
    async fn insert(&self, session: &Session) -> AuthResult<()>;

    /// Find session by id (expired sessions included)
    async fn find(&self, session_id: &SessionId) -> AuthResult<Option<Session>>;

    /// Delete a session; returns whether it existed
    async fn remove(&self, session_id: &SessionId) -> AuthResult<bool>;

    /// Delete every session expired at `now`
    async fn remove_expired(&self, now: DateTime<Utc>) -> AuthResult<u64>;
}
