//! Content Store
//!
//! Creates and lists posts and comments.

use auth::models::Email;
use kernel::id::PostId;
use std::sync::Arc;

use crate::domain::entities::{Comment, NewComment, NewPost, Post};
use crate::domain::repository::{CommentRepository, PostRepository};
use crate::domain::value_objects::{Category, CategoryFilter, ContentBody, PostTitle};
use crate::error::{ForumError, ForumResult};

/// Post creation input
pub struct CreatePostInput {
    pub title: String,
    pub body: String,
    /// `None` files the post under [`Category::DEFAULT`]
    pub category: Option<String>,
}

/// Content store
pub struct ContentStore<R>
where
    R: PostRepository + CommentRepository,
{
    repo: Arc<R>,
}

impl<R> ContentStore<R>
where
    R: PostRepository + CommentRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Create a post
    ///
    /// ## Errors
    /// - `Validation` if title, body, or category is empty after trimming
    /// - `UnknownAuthor` if `author` has no identity
    pub async fn create_post(&self, author: &Email, input: CreatePostInput) -> ForumResult<Post> {
        let title = PostTitle::new(input.title)?;
        let body = ContentBody::new(input.body)?;
        let category = match input.category {
            Some(category) => Category::new(category)?,
            None => Category::general(),
        };

        let post = self
            .repo
            .insert_post(&NewPost {
                author: author.clone(),
                title,
                body,
                category,
            })
            .await?;

        tracing::info!(
            post_id = %post.post_id,
            author = %post.author,
            category = %post.category,
            "Post created"
        );

        Ok(post)
    }

    /// List posts, newest first
    ///
    /// `None` or `"all"` lists every post; otherwise only posts whose
    /// category matches exactly.
    pub async fn list_posts(&self, category: Option<&str>) -> ForumResult<Vec<Post>> {
        let filter = CategoryFilter::from_query(category);
        self.repo.list_posts(&filter).await
    }

    /// Create a comment
    ///
    /// ## Errors
    /// - `Validation` if the body is empty after trimming
    /// - `UnknownPost` / `UnknownAuthor` on dangling references
    pub async fn create_comment(
        &self,
        post_id: PostId,
        author: &Email,
        body: String,
    ) -> ForumResult<Comment> {
        let body = ContentBody::new(body)?;

        let comment = self
            .repo
            .insert_comment(&NewComment {
                post_id,
                author: author.clone(),
                body,
            })
            .await?;

        tracing::info!(
            comment_id = %comment.comment_id,
            post_id = %comment.post_id,
            author = %comment.author,
            "Comment created"
        );

        Ok(comment)
    }

    /// List comments of a post, newest first
    ///
    /// `UnknownPost` if the post does not exist; an existing post without
    /// comments yields an empty list.
    pub async fn list_comments(&self, post_id: PostId) -> ForumResult<Vec<Comment>> {
        if !self.repo.post_exists(post_id).await? {
            return Err(ForumError::UnknownPost(post_id));
        }

        self.repo.list_comments(post_id).await
    }
}
