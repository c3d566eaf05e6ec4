//! Request Authorizer
//!
//! Gate in front of every content-mutating operation. Other crates depend
//! on the [`Authorizer`] trait rather than on the session machinery.

use std::sync::Arc;

use crate::application::session_manager::SessionManager;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

/// Resolve a session token to the email of its user
#[trait_variant::make(Authorizer: Send)]
pub trait LocalAuthorizer {
    /// ## Errors
    /// `AuthError::SessionInvalid` for any token that does not name a live
    /// session of an existing identity.
    async fn authorize(&self, token: &str) -> AuthResult<Email>;
}

/// Session-backed authorizer
pub struct RequestAuthorizer<S, U>
where
    S: SessionRepository,
    U: UserRepository,
{
    sessions: Arc<SessionManager<S, U>>,
}

impl<S, U> RequestAuthorizer<S, U>
where
    S: SessionRepository,
    U: UserRepository,
{
    pub fn new(sessions: Arc<SessionManager<S, U>>) -> Self {
        Self { sessions }
    }
}

impl<S, U> Authorizer for RequestAuthorizer<S, U>
where
    S: SessionRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    async fn authorize(&self, token: &str) -> AuthResult<Email> {
        let session = self.sessions.validate(token).await?;
        Ok(session.email)
    }
}

#[cfg(test)]
mod tests {
    use super::{Authorizer, RequestAuthorizer, SessionManager};
    use crate::application::config::AuthConfig;
    use crate::application::credential_store::{CredentialStore, Registration};
    use crate::error::AuthError;
    use crate::infra::memory::{MemorySessionStore, MemoryUserStore};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_authorize_resolves_email() {
        let config = Arc::new(AuthConfig::development());
        let users = Arc::new(MemoryUserStore::new());
        let credentials = CredentialStore::new(users.clone(), config.clone());
        let sessions = Arc::new(SessionManager::new(
            Arc::new(MemorySessionStore::new()),
            users,
            config,
        ));
        let authorizer = RequestAuthorizer::new(sessions.clone());

        let user = credentials
            .register(Registration {
                first_name: "Alan".to_string(),
                last_name: "Turing".to_string(),
                email: "alan@example.com".to_string(),
                password: "enigma".to_string(),
            })
            .await
            .unwrap();
        let issued = sessions.issue(&user.email).await.unwrap();

        assert_eq!(authorizer.authorize(&issued.token).await.unwrap(), user.email);

        sessions.revoke(&issued.token).await.unwrap();
        assert!(matches!(
            authorizer.authorize(&issued.token).await,
            Err(AuthError::SessionInvalid)
        ));
    }
}
