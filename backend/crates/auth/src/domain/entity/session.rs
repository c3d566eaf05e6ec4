//! Session Entity
//!
//! In-memory only. A session never reaches the durable store and does not
//! survive a restart.

use chrono::{DateTime, Duration, Utc};

use crate::domain::value_object::{email::Email, session_token::SessionId};

/// Active login session
#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: SessionId,
    /// Identity the session is bound to
    pub email: Email,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Create a session starting now
    pub fn new(session_id: SessionId, email: Email, ttl: Duration) -> Self {
        let issued_at = Utc::now();
        Self {
            session_id,
            email,
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    /// Expired once `now` reaches `expires_at`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Expiry as epoch milliseconds (frontend-friendly)
    pub fn expires_at_ms(&self) -> i64 {
        self.expires_at.timestamp_millis()
    }
}
