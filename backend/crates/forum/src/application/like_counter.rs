//! Like Counter
//!
//! Per-user like count. Every operation is one atomic store step, so
//! concurrent likes and unlikes never lose updates and never drive the count
//! below zero.

use auth::models::Email;
use std::sync::Arc;

use crate::domain::repository::LikeRepository;
use crate::error::{ForumError, ForumResult};

/// Like counter
pub struct LikeCounter<R>
where
    R: LikeRepository,
{
    repo: Arc<R>,
}

impl<R> LikeCounter<R>
where
    R: LikeRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Add a like; returns the new count
    pub async fn increment(&self, email: &Email) -> ForumResult<i64> {
        let likes = self
            .repo
            .increment_likes(email)
            .await?
            .ok_or(ForumError::UnknownUser)?;

        tracing::debug!(email = %email, likes, "Like added");
        Ok(likes)
    }

    /// Remove a like; at zero this is a no-op that returns 0
    pub async fn decrement(&self, email: &Email) -> ForumResult<i64> {
        let likes = self
            .repo
            .decrement_likes(email)
            .await?
            .ok_or(ForumError::UnknownUser)?;

        tracing::debug!(email = %email, likes, "Like removed");
        Ok(likes)
    }

    /// Current count
    pub async fn get(&self, email: &Email) -> ForumResult<i64> {
        self.repo
            .get_likes(email)
            .await?
            .ok_or(ForumError::UnknownUser)
    }
}
