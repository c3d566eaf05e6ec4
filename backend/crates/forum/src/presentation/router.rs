//! Forum Router

use auth::middleware::{SessionGate, require_session};
use auth::{AuthConfig, Authorizer};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::domain::repository::{CommentRepository, LikeRepository, PostRepository};
use crate::presentation::handlers::{self, ForumAppState};

/// Create the Forum router
///
/// Listing routes are public; every mutating route requires a session
/// accepted by `authorizer`. Mounted under `/api/forum` by the API binary.
pub fn forum_router<R, A>(repo: Arc<R>, authorizer: Arc<A>, auth_config: Arc<AuthConfig>) -> Router
where
    R: PostRepository + CommentRepository + LikeRepository + Send + Sync + 'static,
    A: Authorizer + Send + Sync + 'static,
{
    let state = ForumAppState::new(repo);
    let gate = SessionGate::new(authorizer, auth_config);

    let protected = Router::new()
        .route("/posts", post(handlers::create_post::<R>))
        .route(
            "/posts/{post_id}/comments",
            post(handlers::create_comment::<R>),
        )
        .route("/users/{email}/like", post(handlers::like_user::<R>))
        .route("/users/{email}/unlike", post(handlers::unlike_user::<R>))
        .route_layer(middleware::from_fn_with_state(gate, require_session::<A>));

    Router::new()
        .route("/posts", get(handlers::list_posts::<R>))
        .route(
            "/posts/{post_id}/comments",
            get(handlers::list_comments::<R>),
        )
        .route(
            "/categories/{category}/posts",
            get(handlers::list_posts_in_category::<R>),
        )
        .route("/users/{email}/likes", get(handlers::get_likes::<R>))
        .merge(protected)
        .with_state(state)
}
