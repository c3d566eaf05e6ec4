//! Domain Entities
//!
//! Posts and comments are immutable once stored.

use auth::models::Email;
use chrono::{DateTime, Utc};
use kernel::id::{CommentId, PostId};

use crate::domain::value_objects::{Category, ContentBody, PostTitle};

/// Stored post
#[derive(Debug, Clone)]
pub struct Post {
    pub post_id: PostId,
    pub author: Email,
    pub title: PostTitle,
    pub body: ContentBody,
    pub category: Category,
    /// Assigned by the store; never earlier than any previous post's
    pub created_at: DateTime<Utc>,
}

/// Post about to be stored (id and timestamp not yet assigned)
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author: Email,
    pub title: PostTitle,
    pub body: ContentBody,
    pub category: Category,
}

/// Stored comment
#[derive(Debug, Clone)]
pub struct Comment {
    pub comment_id: CommentId,
    pub post_id: PostId,
    pub author: Email,
    pub body: ContentBody,
    pub created_at: DateTime<Utc>,
}

/// Comment about to be stored
#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: PostId,
    pub author: Email,
    pub body: ContentBody,
}
