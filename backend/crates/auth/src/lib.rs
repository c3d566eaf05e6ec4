//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Credential store, session manager, authorizer
//! - `infra/` - PostgreSQL and in-memory implementations
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Signup/signin with email + password
//! - Server-side sessions with signed cookie tokens (fixed 2 hour lifetime)
//! - `Authorizer` trait for gating other crates' routes
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (m=19 MiB, t=2, p=1)
//! - Session ids are 256 random bits, HMAC-SHA256 signed
//! - Unknown account and wrong password are indistinguishable to clients

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::authorizer::{Authorizer, RequestAuthorizer};
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::memory::{MemorySessionStore, MemoryUserStore};
pub use infra::postgres::PgUserRepository;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::{session::Session, user::UserIdentity};
    pub use crate::domain::value_object::{email::Email, person_name::PersonName};
    pub use crate::presentation::dto::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
