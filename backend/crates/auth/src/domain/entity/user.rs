//! User Identity Entity
//!
//! One row of `users`: the registered account, keyed by email.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    email::Email, person_name::PersonName, user_password::UserPassword,
};

/// User identity
///
/// Created on signup and never deleted by the service. `likes` is owned by
/// the forum's like counter; this crate only reads it.
#[derive(Debug, Clone)]
pub struct UserIdentity {
    /// Unique identity key (trimmed, lowercased)
    pub email: Email,
    pub first_name: PersonName,
    pub last_name: PersonName,
    /// Argon2id PHC string
    pub password_hash: UserPassword,
    /// Like counter, never negative
    pub likes: i64,
    pub created_at: DateTime<Utc>,
}

impl UserIdentity {
    /// Create a new identity with a zero like counter
    pub fn new(
        email: Email,
        first_name: PersonName,
        last_name: PersonName,
        password_hash: UserPassword,
    ) -> Self {
        Self {
            email,
            first_name,
            last_name,
            password_hash,
            likes: 0,
            created_at: Utc::now(),
        }
    }
}
