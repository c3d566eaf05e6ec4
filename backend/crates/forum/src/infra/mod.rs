//! Infrastructure Layer
//!
//! Database implementations and in-memory stores.

pub mod memory;
pub mod postgres;

pub use memory::MemoryForumStore;
pub use postgres::PgForumRepository;
