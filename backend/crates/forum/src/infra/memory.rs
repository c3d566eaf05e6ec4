//! In-Memory Forum Store
//!
//! Same contract as the PostgreSQL repository, used by tests and
//! database-less runs. Identities (and their like counters) live in the
//! shared `MemoryUserStore`, the way `posts.author_email` references
//! `users.email` in the schema.

use auth::MemoryUserStore;
use auth::domain::repository::UserRepository;
use auth::models::Email;
use kernel::clock::MonotonicClock;
use kernel::id::{CommentId, PostId};
use std::cmp::Reverse;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::entities::{Comment, NewComment, NewPost, Post};
use crate::domain::repository::{CommentRepository, LikeRepository, PostRepository};
use crate::domain::value_objects::CategoryFilter;
use crate::error::{ForumError, ForumResult};

#[derive(Debug, Default)]
struct Content {
    posts: Vec<Post>,
    comments: Vec<Comment>,
    last_post_id: i64,
    last_comment_id: i64,
}

/// In-memory forum store
///
/// Cheap to clone; clones share the same data.
#[derive(Debug, Clone)]
pub struct MemoryForumStore {
    users: MemoryUserStore,
    content: Arc<Mutex<Content>>,
    clock: Arc<MonotonicClock>,
}

impl MemoryForumStore {
    /// Store whose authors and like targets are the identities in `users`
    pub fn new(users: MemoryUserStore) -> Self {
        Self {
            users,
            content: Arc::default(),
            clock: Arc::default(),
        }
    }

    // Id and timestamp are assigned under this lock, so id order and
    // timestamp order agree.
    fn content(&self) -> MutexGuard<'_, Content> {
        self.content.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn post_count(&self) -> usize {
        self.content().posts.len()
    }

    pub fn comment_count(&self) -> usize {
        self.content().comments.len()
    }
}

impl PostRepository for MemoryForumStore {
    async fn insert_post(&self, post: &NewPost) -> ForumResult<Post> {
        let mut content = self.content();

        if !self.users.contains(&post.author) {
            return Err(ForumError::UnknownAuthor);
        }

        content.last_post_id += 1;
        let stored = Post {
            post_id: PostId::new(content.last_post_id),
            author: post.author.clone(),
            title: post.title.clone(),
            body: post.body.clone(),
            category: post.category.clone(),
            created_at: self.clock.now(),
        };
        content.posts.push(stored.clone());

        Ok(stored)
    }

    async fn list_posts(&self, filter: &CategoryFilter) -> ForumResult<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .content()
            .posts
            .iter()
            .filter(|post| filter.matches(&post.category))
            .cloned()
            .collect();

        posts.sort_by_key(|post| Reverse((post.created_at, post.post_id)));
        Ok(posts)
    }

    async fn post_exists(&self, post_id: PostId) -> ForumResult<bool> {
        Ok(self
            .content()
            .posts
            .iter()
            .any(|post| post.post_id == post_id))
    }
}

impl CommentRepository for MemoryForumStore {
    async fn insert_comment(&self, comment: &NewComment) -> ForumResult<Comment> {
        let mut content = self.content();

        if !content.posts.iter().any(|post| post.post_id == comment.post_id) {
            return Err(ForumError::UnknownPost(comment.post_id));
        }
        if !self.users.contains(&comment.author) {
            return Err(ForumError::UnknownAuthor);
        }

        content.last_comment_id += 1;
        let stored = Comment {
            comment_id: CommentId::new(content.last_comment_id),
            post_id: comment.post_id,
            author: comment.author.clone(),
            body: comment.body.clone(),
            created_at: self.clock.now(),
        };
        content.comments.push(stored.clone());

        Ok(stored)
    }

    async fn list_comments(&self, post_id: PostId) -> ForumResult<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .content()
            .comments
            .iter()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect();

        comments.sort_by_key(|comment| Reverse((comment.created_at, comment.comment_id)));
        Ok(comments)
    }
}

impl LikeRepository for MemoryForumStore {
    async fn increment_likes(&self, email: &Email) -> ForumResult<Option<i64>> {
        Ok(self.users.update_likes(email, |likes| likes.saturating_add(1)))
    }

    async fn decrement_likes(&self, email: &Email) -> ForumResult<Option<i64>> {
        Ok(self.users.update_likes(email, |likes| (likes - 1).max(0)))
    }

    async fn get_likes(&self, email: &Email) -> ForumResult<Option<i64>> {
        let user = self.users.find_by_email(email).await?;
        Ok(user.map(|user| user.likes))
    }
}
