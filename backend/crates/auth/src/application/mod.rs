//! Application Layer
//!
//! Use cases and application services.

pub mod authorizer;
pub mod config;
pub mod credential_store;
pub mod session_manager;

// Re-exports
pub use authorizer::{Authorizer, RequestAuthorizer};
pub use config::AuthConfig;
pub use credential_store::{CredentialStore, Registration};
pub use session_manager::{IssuedSession, SessionManager};
