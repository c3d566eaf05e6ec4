//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations for the forum backend:
//! - Cryptographic utilities (random tokens, SHA-256, HMAC, Base64)
//! - Password hashing (Argon2id with fixed, documented cost)
//! - Cookie management

pub mod cookie;
pub mod crypto;
pub mod password;
