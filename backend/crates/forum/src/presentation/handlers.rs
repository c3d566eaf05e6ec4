//! HTTP Handlers

use auth::middleware::AuthenticatedUser;
use auth::models::Email;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use kernel::id::PostId;
use std::sync::Arc;

use crate::application::{ContentStore, CreatePostInput, LikeCounter};
use crate::domain::repository::{CommentRepository, LikeRepository, PostRepository};
use crate::error::{ForumError, ForumResult};
use crate::presentation::dto::{
    CommentResponse, CreateCommentRequest, CreateCommentResponse, CreatePostRequest,
    CreatePostResponse, LikesResponse, ListPostsQuery, PostResponse,
};

/// Shared state for forum handlers
pub struct ForumAppState<R>
where
    R: PostRepository + CommentRepository + LikeRepository + Send + Sync + 'static,
{
    pub content: Arc<ContentStore<R>>,
    pub likes: Arc<LikeCounter<R>>,
}

impl<R> ForumAppState<R>
where
    R: PostRepository + CommentRepository + LikeRepository + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            content: Arc::new(ContentStore::new(repo.clone())),
            likes: Arc::new(LikeCounter::new(repo)),
        }
    }
}

impl<R> Clone for ForumAppState<R>
where
    R: PostRepository + CommentRepository + LikeRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            content: self.content.clone(),
            likes: self.likes.clone(),
        }
    }
}

/// Email from a URL segment; anything that cannot be an email names no user
fn target_email(raw: &str) -> ForumResult<Email> {
    Email::new(raw).map_err(|_| ForumError::UnknownUser)
}

// ============================================================================
// Posts
// ============================================================================

/// POST /api/forum/posts
pub async fn create_post<R>(
    State(state): State<ForumAppState<R>>,
    user: AuthenticatedUser,
    Json(req): Json<CreatePostRequest>,
) -> ForumResult<impl IntoResponse>
where
    R: PostRepository + CommentRepository + LikeRepository + Send + Sync + 'static,
{
    let post = state
        .content
        .create_post(
            &user.email,
            CreatePostInput {
                title: req.title,
                body: req.body,
                category: req.category,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatePostResponse {
            id: post.post_id.get(),
            created_at: post.created_at,
        }),
    ))
}

/// GET /api/forum/posts?category=
pub async fn list_posts<R>(
    State(state): State<ForumAppState<R>>,
    Query(query): Query<ListPostsQuery>,
) -> ForumResult<Json<Vec<PostResponse>>>
where
    R: PostRepository + CommentRepository + LikeRepository + Send + Sync + 'static,
{
    let posts = state.content.list_posts(query.category.as_deref()).await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// GET /api/forum/categories/{category}/posts
pub async fn list_posts_in_category<R>(
    State(state): State<ForumAppState<R>>,
    Path(category): Path<String>,
) -> ForumResult<Json<Vec<PostResponse>>>
where
    R: PostRepository + CommentRepository + LikeRepository + Send + Sync + 'static,
{
    let posts = state.content.list_posts(Some(&category)).await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

// ============================================================================
// Comments
// ============================================================================

/// POST /api/forum/posts/{post_id}/comments
pub async fn create_comment<R>(
    State(state): State<ForumAppState<R>>,
    Path(post_id): Path<i64>,
    user: AuthenticatedUser,
    Json(req): Json<CreateCommentRequest>,
) -> ForumResult<impl IntoResponse>
where
    R: PostRepository + CommentRepository + LikeRepository + Send + Sync + 'static,
{
    let comment = state
        .content
        .create_comment(PostId::new(post_id), &user.email, req.body)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateCommentResponse {
            id: comment.comment_id.get(),
            post_id: comment.post_id.get(),
            created_at: comment.created_at,
        }),
    ))
}

/// GET /api/forum/posts/{post_id}/comments
pub async fn list_comments<R>(
    State(state): State<ForumAppState<R>>,
    Path(post_id): Path<i64>,
) -> ForumResult<Json<Vec<CommentResponse>>>
where
    R: PostRepository + CommentRepository + LikeRepository + Send + Sync + 'static,
{
    let comments = state.content.list_comments(PostId::new(post_id)).await?;
    Ok(Json(comments.into_iter().map(CommentResponse::from).collect()))
}

// ============================================================================
// Likes
// ============================================================================

/// POST /api/forum/users/{email}/like
pub async fn like_user<R>(
    State(state): State<ForumAppState<R>>,
    Path(email): Path<String>,
    user: AuthenticatedUser,
) -> ForumResult<Json<LikesResponse>>
where
    R: PostRepository + CommentRepository + LikeRepository + Send + Sync + 'static,
{
    let target = target_email(&email)?;
    let likes = state.likes.increment(&target).await?;

    tracing::info!(by = %user.email, liked = %target, likes, "User liked");

    Ok(Json(LikesResponse {
        email: target.into_string(),
        likes,
    }))
}

/// POST /api/forum/users/{email}/unlike
pub async fn unlike_user<R>(
    State(state): State<ForumAppState<R>>,
    Path(email): Path<String>,
    user: AuthenticatedUser,
) -> ForumResult<Json<LikesResponse>>
where
    R: PostRepository + CommentRepository + LikeRepository + Send + Sync + 'static,
{
    let target = target_email(&email)?;
    let likes = state.likes.decrement(&target).await?;

    tracing::info!(by = %user.email, unliked = %target, likes, "User unliked");

    Ok(Json(LikesResponse {
        email: target.into_string(),
        likes,
    }))
}

/// GET /api/forum/users/{email}/likes
pub async fn get_likes<R>(
    State(state): State<ForumAppState<R>>,
    Path(email): Path<String>,
) -> ForumResult<Json<LikesResponse>>
where
    R: PostRepository + CommentRepository + LikeRepository + Send + Sync + 'static,
{
    let target = target_email(&email)?;
    let likes = state.likes.get(&target).await?;

    Ok(Json(LikesResponse {
        email: target.into_string(),
        likes,
    }))
}
