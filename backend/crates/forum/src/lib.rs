//! Forum Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Content store and like counter
//! - `infra/` - PostgreSQL and in-memory implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Consistency Model
//! - Posts and comments are immutable; ids and timestamps are store-assigned
//! - Dangling author/post references are rejected by the store at insert time
//! - Like counters change by single atomic statements and never go negative
//! - Mutations require a session accepted by an `auth::Authorizer`

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::{ContentStore, CreatePostInput, LikeCounter};
pub use error::{ForumError, ForumResult};
pub use infra::memory::MemoryForumStore;
pub use infra::postgres::PgForumRepository;
pub use presentation::router::forum_router;

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}
