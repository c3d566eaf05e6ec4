//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entities;
pub mod repository;
pub mod value_objects;

// Re-exports
pub use entities::{Comment, NewComment, NewPost, Post};
pub use repository::{CommentRepository, LikeRepository, PostRepository};
pub use value_objects::{Category, CategoryFilter, ContentBody, PostTitle};
