//! Auth Middleware
//!
//! Middleware for requiring authentication on protected routes.

use axum::body::Body;
use axum::extract::{FromRequestParts, State};
use axum::http::{Request, request::Parts};
use axum::middleware::Next;
use axum::response::Response;
use platform::cookie::extract_cookie;
use std::sync::Arc;

use crate::application::authorizer::Authorizer;
use crate::application::config::AuthConfig;
use crate::domain::value_object::email::Email;
use crate::error::AuthError;

/// Middleware state
pub struct SessionGate<A>
where
    A: Authorizer + Send + Sync + 'static,
{
    pub authorizer: Arc<A>,
    pub config: Arc<AuthConfig>,
}

impl<A> SessionGate<A>
where
    A: Authorizer + Send + Sync + 'static,
{
    pub fn new(authorizer: Arc<A>, config: Arc<AuthConfig>) -> Self {
        Self { authorizer, config }
    }
}

impl<A> Clone for SessionGate<A>
where
    A: Authorizer + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            authorizer: self.authorizer.clone(),
            config: self.config.clone(),
        }
    }
}

/// Identity of the caller, inserted by [`require_session`]
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub email: Email,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AuthError::SessionInvalid)
    }
}

/// Middleware that requires a valid session cookie
///
/// Rejects with 401 before the handler runs; on success the handler can
/// extract [`AuthenticatedUser`].
pub async fn require_session<A>(
    State(gate): State<SessionGate<A>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError>
where
    A: Authorizer + Send + Sync + 'static,
{
    let token = extract_cookie(req.headers(), &gate.config.session_cookie_name)
        .ok_or(AuthError::SessionInvalid)?;

    let email = gate.authorizer.authorize(&token).await?;

    req.extensions_mut().insert(AuthenticatedUser { email });

    Ok(next.run(req).await)
}
