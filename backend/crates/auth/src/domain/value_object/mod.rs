//! Value Object Module

pub mod email;
pub mod person_name;
pub mod session_token;
pub mod user_password;
