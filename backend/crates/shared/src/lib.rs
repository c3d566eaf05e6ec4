//! Shared Kernel - Domain-crossing minimal core
//!
//! Vocabulary shared by the `auth` and `forum` crates:
//! - Unified error type ([`error::app_error::AppError`]) and its HTTP classification
//! - Typed integer identifiers for store-assigned keys
//! - A monotonic wall clock for server-assigned timestamps
//!
//! Only things whose meaning is identical across domains belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod clock;
pub mod id;
