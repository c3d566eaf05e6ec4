//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Comment, Post};

// ============================================================================
// Posts
// ============================================================================

/// Create post request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub body: String,
    /// Omitted or null files the post under "general"
    #[serde(default)]
    pub category: Option<String>,
}

/// Create post response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostResponse {
    pub id: i64,
    pub created_at: DateTime<Utc>,
}

/// Query string of `GET /posts`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPostsQuery {
    pub category: Option<String>,
}

/// Post list item
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub author_email: String,
    pub body: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.post_id.get(),
            title: post.title.as_str().to_string(),
            author_email: post.author.into_string(),
            body: post.body.as_str().to_string(),
            category: post.category.as_str().to_string(),
            created_at: post.created_at,
        }
    }
}

// ============================================================================
// Comments
// ============================================================================

/// Create comment request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommentRequest {
    pub body: String,
}

/// Create comment response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentResponse {
    pub id: i64,
    pub post_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Comment list item
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i64,
    pub post_id: i64,
    pub author_email: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.comment_id.get(),
            post_id: comment.post_id.get(),
            author_email: comment.author.into_string(),
            body: comment.body.as_str().to_string(),
            created_at: comment.created_at,
        }
    }
}

// ============================================================================
// Likes
// ============================================================================

/// Like counter response
#[derive(Debug, Clone, Serialize)]
pub struct LikesResponse {
    pub email: String,
    pub likes: i64,
}
