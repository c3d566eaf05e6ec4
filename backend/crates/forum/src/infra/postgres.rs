//! PostgreSQL Repository Implementations

use auth::models::Email;
use chrono::{DateTime, Utc};
use kernel::id::{CommentId, PostId};
use sqlx::PgPool;

use crate::domain::entities::{Comment, NewComment, NewPost, Post};
use crate::domain::repository::{CommentRepository, LikeRepository, PostRepository};
use crate::domain::value_objects::{Category, CategoryFilter, ContentBody, PostTitle};
use crate::error::{ForumError, ForumResult};

/// Foreign key constraint names from the schema migration
const POSTS_AUTHOR_FK: &str = "posts_author_fk";
const COMMENTS_POST_FK: &str = "comments_post_fk";
const COMMENTS_AUTHOR_FK: &str = "comments_author_fk";

/// Advisory lock keys serializing inserts per table
const POSTS_INSERT_LOCK: i64 = 0x666f_7275_6d01;
const COMMENTS_INSERT_LOCK: i64 = 0x666f_7275_6d02;

/// PostgreSQL-backed forum repository
///
/// Ids and `created_at` are both assigned by the database while the
/// table's insert lock is held, so id order and timestamp order agree
/// across connections, restarts, and API instances.
#[derive(Clone)]
pub struct PgForumRepository {
    pool: PgPool,
}

impl PgForumRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a failed insert to the typed error for the violated foreign key
fn map_insert_error(err: sqlx::Error, post_id: Option<PostId>) -> ForumError {
    let constraint = match &err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            db.constraint().map(str::to_owned)
        }
        _ => None,
    };

    match (constraint.as_deref(), post_id) {
        (Some(COMMENTS_POST_FK), Some(post_id)) => ForumError::UnknownPost(post_id),
        (Some(POSTS_AUTHOR_FK | COMMENTS_AUTHOR_FK), _) => ForumError::UnknownAuthor,
        _ => ForumError::Database(err),
    }
}

// ============================================================================
// Post Repository Implementation
// ============================================================================

impl PostRepository for PgForumRepository {
    async fn insert_post(&self, post: &NewPost) -> ForumResult<Post> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(POSTS_INSERT_LOCK)
            .execute(&mut *tx)
            .await?;

        let (post_id, created_at): (i64, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO posts (
                author_email,
                title,
                body,
                category,
                created_at
            ) VALUES (
                $1, $2, $3, $4,
                GREATEST(clock_timestamp(), (SELECT max(created_at) FROM posts))
            )
            RETURNING post_id, created_at
            "#,
        )
        .bind(post.author.as_str())
        .bind(post.title.as_str())
        .bind(post.body.as_str())
        .bind(post.category.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_insert_error(e, None))?;

        tx.commit().await?;

        Ok(Post {
            post_id: PostId::new(post_id),
            author: post.author.clone(),
            title: post.title.clone(),
            body: post.body.clone(),
            category: post.category.clone(),
            created_at,
        })
    }

    async fn list_posts(&self, filter: &CategoryFilter) -> ForumResult<Vec<Post>> {
        let rows = match filter {
            CategoryFilter::All => {
                sqlx::query_as::<_, PostRow>(
                    r#"
                    SELECT post_id, author_email, title, body, category, created_at
                    FROM posts
                    ORDER BY created_at DESC, post_id DESC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
            CategoryFilter::Only(category) => {
                sqlx::query_as::<_, PostRow>(
                    r#"
                    SELECT post_id, author_email, title, body, category, created_at
                    FROM posts
                    WHERE category = $1
                    ORDER BY created_at DESC, post_id DESC
                    "#,
                )
                .bind(category)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(PostRow::into_post).collect())
    }

    async fn post_exists(&self, post_id: PostId) -> ForumResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE post_id = $1)")
                .bind(post_id.get())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}

// ============================================================================
// Comment Repository Implementation
// ============================================================================

impl CommentRepository for PgForumRepository {
    async fn insert_comment(&self, comment: &NewComment) -> ForumResult<Comment> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(COMMENTS_INSERT_LOCK)
            .execute(&mut *tx)
            .await?;

        let (comment_id, created_at): (i64, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO comments (
                post_id,
                author_email,
                body,
                created_at
            ) VALUES (
                $1, $2, $3,
                GREATEST(clock_timestamp(), (SELECT max(created_at) FROM comments))
            )
            RETURNING comment_id, created_at
            "#,
        )
        .bind(comment.post_id.get())
        .bind(comment.author.as_str())
        .bind(comment.body.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_insert_error(e, Some(comment.post_id)))?;

        tx.commit().await?;

        Ok(Comment {
            comment_id: CommentId::new(comment_id),
            post_id: comment.post_id,
            author: comment.author.clone(),
            body: comment.body.clone(),
            created_at,
        })
    }

    async fn list_comments(&self, post_id: PostId) -> ForumResult<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT comment_id, post_id, author_email, body, created_at
            FROM comments
            WHERE post_id = $1
            ORDER BY created_at DESC, comment_id DESC
            "#,
        )
        .bind(post_id.get())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CommentRow::into_comment).collect())
    }
}

// ============================================================================
// Like Repository Implementation
// ============================================================================

impl LikeRepository for PgForumRepository {
    async fn increment_likes(&self, email: &Email) -> ForumResult<Option<i64>> {
        let likes = sqlx::query_scalar::<_, i64>(
            "UPDATE users SET likes = likes + 1 WHERE email = $1 RETURNING likes",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(likes)
    }

    async fn decrement_likes(&self, email: &Email) -> ForumResult<Option<i64>> {
        let likes = sqlx::query_scalar::<_, i64>(
            "UPDATE users SET likes = GREATEST(likes - 1, 0) WHERE email = $1 RETURNING likes",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(likes)
    }

    async fn get_likes(&self, email: &Email) -> ForumResult<Option<i64>> {
        let likes = sqlx::query_scalar::<_, i64>("SELECT likes FROM users WHERE email = $1")
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(likes)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct PostRow {
    post_id: i64,
    author_email: String,
    title: String,
    body: String,
    category: String,
    created_at: DateTime<Utc>,
}

impl PostRow {
    fn into_post(self) -> Post {
        Post {
            post_id: PostId::new(self.post_id),
            author: Email::from_db(self.author_email),
            title: PostTitle::from_db(self.title),
            body: ContentBody::from_db(self.body),
            category: Category::from_db(self.category),
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    comment_id: i64,
    post_id: i64,
    author_email: String,
    body: String,
    created_at: DateTime<Utc>,
}

impl CommentRow {
    fn into_comment(self) -> Comment {
        Comment {
            comment_id: CommentId::new(self.comment_id),
            post_id: PostId::new(self.post_id),
            author: Email::from_db(self.author_email),
            body: ContentBody::from_db(self.body),
            created_at: self.created_at,
        }
    }
}
