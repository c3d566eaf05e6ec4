//! Email Value Object
//!
//! The email address is the identity key of a forum user: it names the
//! account at sign-in, the author of posts and comments, and the target of
//! likes. It is trimmed and lowercased on the way in, so
//! `Alice@Example.com` and `alice@example.com` name the same account.

use kernel::error::app_error::{AppError, AppResult};
use std::fmt;

/// Longest accepted address (RFC 5321 path limit)
const MAX_LENGTH: usize = 254;

/// Longest accepted local part
const MAX_LOCAL_LENGTH: usize = 64;

/// Normalized email address, the primary key of a user identity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Normalize and validate an address typed by a user
    pub fn new(raw: impl Into<String>) -> AppResult<Self> {
        let email = raw.into().trim().to_lowercase();

        if email.is_empty() {
            return Err(AppError::bad_request("Email cannot be empty"));
        }

        if email.chars().count() > MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Email must be at most {} characters",
                MAX_LENGTH
            )));
        }

        let (local, domain) = email
            .split_once('@')
            .ok_or_else(|| AppError::bad_request("Email must contain '@'"))?;

        if !is_valid_local(local) || !is_valid_domain(domain) {
            return Err(AppError::bad_request("Invalid email format")
                .with_action("Please enter an address like name@example.com"));
        }

        Ok(Self(email))
    }

    /// Wrap a key read back from storage
    ///
    /// Also used for lookups by an address taken from a URL path: a value
    /// that was never valid simply matches no stored identity.
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Owned address for response bodies
    pub fn into_string(self) -> String {
        self.0
    }
}

fn is_valid_local(local: &str) -> bool {
    !local.is_empty()
        && local.len() <= MAX_LOCAL_LENGTH
        && !local
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '@')
}

// Dotted hostname: at least two non-empty labels of ASCII alphanumerics
// and inner hyphens.
fn is_valid_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();

    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_addresses() {
        for raw in [
            "user@example.com",
            "user.name@example.co.jp",
            "user+tag@mail-relay.example.org",
        ] {
            assert!(Email::new(raw).is_ok(), "{raw}");
        }
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        for raw in [
            "userexample.com",
            "user@",
            "@example.com",
            "user@@example.com",
            "user@example",
            "user@.example.com",
            "user@example..com",
            "user@-example.com",
            "us er@example.com",
            "user@exa_mple.com",
        ] {
            assert!(Email::new(raw).is_err(), "{raw}");
        }
    }

    #[test]
    fn test_same_account_regardless_of_case_and_padding() {
        let email = Email::new("  Bob@Example.ORG \n").unwrap();
        assert_eq!(email.as_str(), "bob@example.org");
        assert_eq!(email, Email::new("BOB@example.org").unwrap());
    }

    #[test]
    fn test_whitespace_only_is_rejected() {
        let err = Email::new("   ").unwrap_err();
        assert_eq!(err.message(), "Email cannot be empty");
    }

    #[test]
    fn test_length_limits() {
        let long_local = format!("{}@example.com", "a".repeat(MAX_LOCAL_LENGTH + 1));
        assert!(Email::new(long_local).is_err());

        let long_domain = format!("a@{}.com", "b".repeat(MAX_LENGTH));
        let err = Email::new(long_domain).unwrap_err();
        assert!(err.message().contains("at most"));
    }
}
