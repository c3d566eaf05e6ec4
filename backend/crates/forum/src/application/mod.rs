//! Application Layer
//!
//! Content and like services.

pub mod content_store;
pub mod like_counter;

// Re-exports
pub use content_store::{ContentStore, CreatePostInput};
pub use like_counter::LikeCounter;
