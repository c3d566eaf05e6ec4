//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//!
//! Referential integrity (author exists, post exists) is checked by the
//! store as part of the insert, never by a separate read beforehand.

use auth::models::Email;
use kernel::id::PostId;

use crate::domain::entities::{Comment, NewComment, NewPost, Post};
use crate::domain::value_objects::CategoryFilter;
use crate::error::ForumResult;

/// Post repository trait
#[trait_variant::make(PostRepository: Send)]
pub trait LocalPostRepository {
    /// Insert a post, assigning id and creation time
    ///
    /// `ForumError::UnknownAuthor` if the author has no identity.
    async fn insert_post(&self, post: &NewPost) -> ForumResult<Post>;

    /// Posts matching `filter`, newest first (ties broken by id, descending)
    async fn list_posts(&self, filter: &CategoryFilter) -> ForumResult<Vec<Post>>;

    /// Check if a post exists
    async fn post_exists(&self, post_id: PostId) -> ForumResult<bool>;
}

/// Comment repository trait
#[trait_variant::make(CommentRepository: Send)]
pub trait LocalCommentRepository {
    /// Insert a comment, assigning id and creation time
    ///
    /// `ForumError::UnknownPost` / `ForumError::UnknownAuthor` on dangling
    /// references.
    async fn insert_comment(&self, comment: &NewComment) -> ForumResult<Comment>;

    /// Comments of a post, newest first (ties broken by id, descending)
    async fn list_comments(&self, post_id: PostId) -> ForumResult<Vec<Comment>>;
}

/// Like counter repository trait
///
/// Each method is a single atomic step; `None` means the user does not exist.
#[trait_variant::make(LikeRepository: Send)]
pub trait LocalLikeRepository {
    /// Add one like, returning the new count
    async fn increment_likes(&self, email: &Email) -> ForumResult<Option<i64>>;

    /// Remove one like without going below zero, returning the new count
    async fn decrement_likes(&self, email: &Email) -> ForumResult<Option<i64>>;

    /// Current count
    async fn get_likes(&self, email: &Email) -> ForumResult<Option<i64>>;
}
