//! Credential Store
//!
//! Registers user identities and verifies sign-in credentials.
//!
//! Argon2id runs on tokio's blocking pool so a burst of sign-ins does not
//! stall the request workers.

use std::sync::Arc;
use tokio::task::JoinError;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::UserIdentity;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    person_name::PersonName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Registration input
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Credential store
pub struct CredentialStore<U>
where
    U: UserRepository,
{
    users: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> CredentialStore<U>
where
    U: UserRepository,
{
    pub fn new(users: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { users, config }
    }

    /// Register a new identity
    ///
    /// ## Errors
    /// - `Validation` if any field is empty or malformed
    /// - `EmailTaken` if the email is already registered
    pub async fn register(&self, input: Registration) -> AuthResult<UserIdentity> {
        let first_name = PersonName::new(input.first_name, "First name")?;
        let last_name = PersonName::new(input.last_name, "Last name")?;
        let email = Email::new(input.email)?;
        let raw_password = RawPassword::new(input.password)?;

        let password_hash = self.hash(raw_password).await?;
        let user = UserIdentity::new(email, first_name, last_name, password_hash);

        self.users.create(&user).await?;

        tracing::info!(email = %user.email, "User registered");

        Ok(user)
    }

    /// Verify sign-in credentials
    ///
    /// ## Errors
    /// - `UnknownAccount` if no identity has this email (or it is malformed)
    /// - `WrongPassword` if the password does not match
    ///
    /// Both render as the same 401; an unknown account still pays for one
    /// hash verification.
    pub async fn verify(&self, email: &str, password: String) -> AuthResult<UserIdentity> {
        let candidate = RawPassword::candidate(password);

        let user = match Email::new(email) {
            Ok(email) => self.users.find_by_email(&email).await?,
            Err(_) => None,
        };

        let Some(user) = user else {
            tokio::task::spawn_blocking(move || UserPassword::verify_dummy(&candidate))
                .await
                .map_err(task_failed("Password verification"))?;
            return Err(AuthError::UnknownAccount);
        };

        let password_hash = user.password_hash.clone();
        let pepper = self.config.password_pepper.clone();
        let matches = tokio::task::spawn_blocking(move || {
            password_hash.verify(&candidate, pepper.as_deref())
        })
        .await
        .map_err(task_failed("Password verification"))?;

        if !matches {
            return Err(AuthError::WrongPassword);
        }

        if user.password_hash.needs_rehash() {
            tracing::info!(email = %user.email, "Password hash uses outdated parameters");
        }

        Ok(user)
    }

    async fn hash(&self, raw_password: RawPassword) -> AuthResult<UserPassword> {
        let pepper = self.config.password_pepper.clone();
        let hashed = tokio::task::spawn_blocking(move || {
            UserPassword::from_raw(&raw_password, pepper.as_deref())
        })
        .await
        .map_err(task_failed("Password hashing"))??;

        Ok(hashed)
    }
}

/// Blocking hash work that panicked or was cancelled
fn task_failed(task: &'static str) -> impl FnOnce(JoinError) -> AuthError {
    move |e| AuthError::Internal(format!("{} task failed: {}", task, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::MemoryUserStore;

    fn store() -> (CredentialStore<MemoryUserStore>, MemoryUserStore) {
        let users = MemoryUserStore::new();
        let store = CredentialStore::new(
            Arc::new(users.clone()),
            Arc::new(AuthConfig::development()),
        );
        (store, users)
    }

    fn registration(email: &str, password: &str) -> Registration {
        Registration {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_verify() {
        let (store, _) = store();

        let user = store
            .register(registration("ada@example.com", "engine"))
            .await
            .unwrap();
        assert_eq!(user.likes, 0);
        assert_ne!(user.password_hash.as_phc_string(), "engine");

        let verified = store
            .verify("ada@example.com", "engine".to_string())
            .await
            .unwrap();
        assert_eq!(verified.email, user.email);
    }

    #[tokio::test]
    async fn test_wrong_password_is_rejected() {
        let (store, _) = store();
        store
            .register(registration("ada@example.com", "engine"))
            .await
            .unwrap();

        let err = store
            .verify("ada@example.com", "engines".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::WrongPassword));
        assert!(err.is_invalid_credentials());
    }

    #[tokio::test]
    async fn test_unknown_account_is_rejected() {
        let (store, _) = store();

        let err = store
            .verify("nobody@example.com", "engine".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UnknownAccount));

        let err = store
            .verify("not an email", "engine".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UnknownAccount));
    }

    #[tokio::test]
    async fn test_duplicate_registration_keeps_first_identity() {
        let (store, users) = store();
        store
            .register(registration("ada@example.com", "first"))
            .await
            .unwrap();

        let mut second = registration("ADA@example.com", "second");
        second.first_name = "Impostor".to_string();
        let err = store.register(second).await.unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));

        let email = Email::new("ada@example.com").unwrap();
        let stored = users.find_by_email(&email).await.unwrap().unwrap();
        assert_eq!(stored.first_name.as_str(), "Ada");
        assert!(store.verify("ada@example.com", "first".to_string()).await.is_ok());
        assert!(store.verify("ada@example.com", "second".to_string()).await.is_err());
    }

    #[tokio::test]
    async fn test_empty_fields_are_rejected() {
        let (store, users) = store();

        let mut input = registration("ada@example.com", "engine");
        input.first_name = "  ".to_string();
        assert!(matches!(
            store.register(input).await,
            Err(AuthError::Validation(_))
        ));

        let mut input = registration("ada@example.com", "engine");
        input.last_name = String::new();
        assert!(matches!(
            store.register(input).await,
            Err(AuthError::Validation(_))
        ));

        assert!(matches!(
            store.register(registration("", "engine")).await,
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            store.register(registration("ada@example.com", "")).await,
            Err(AuthError::Validation(_))
        ));

        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_sign_in_email_is_normalized() {
        let (store, _) = store();
        store
            .register(registration("ada@example.com", "engine"))
            .await
            .unwrap();

        assert!(store.verify("  Ada@Example.com ", "engine".to_string()).await.is_ok());
    }

    #[tokio::test]
    async fn test_pepper_must_match() {
        let users = Arc::new(MemoryUserStore::new());
        let peppered = CredentialStore::new(
            users.clone(),
            Arc::new(AuthConfig {
                password_pepper: Some(b"pepper".to_vec()),
                ..AuthConfig::development()
            }),
        );
        peppered
            .register(registration("ada@example.com", "engine"))
            .await
            .unwrap();

        let unpeppered = CredentialStore::new(users, Arc::new(AuthConfig::development()));
        assert!(unpeppered.verify("ada@example.com", "engine".to_string()).await.is_err());
        assert!(peppered.verify("ada@example.com", "engine".to_string()).await.is_ok());
    }

    #[tokio::test]
    async fn test_panicked_hash_task_is_internal_error() {
        let err = tokio::task::spawn_blocking(|| -> bool { panic!("argon2 blew up") })
            .await
            .map_err(task_failed("Password verification"))
            .unwrap_err();

        assert!(matches!(
            err,
            AuthError::Internal(msg) if msg.starts_with("Password verification task failed")
        ));
    }
}
