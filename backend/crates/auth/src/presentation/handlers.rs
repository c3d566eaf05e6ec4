//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use platform::cookie::{extract_cookie, set_cookie_header};
use std::sync::Arc;

use crate::application::authorizer::RequestAuthorizer;
use crate::application::config::AuthConfig;
use crate::application::credential_store::{CredentialStore, Registration};
use crate::application::session_manager::SessionManager;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    SessionStatusResponse, SignInRequest, SignInResponse, SignUpRequest, SignUpResponse,
};

/// Shared state for auth handlers
pub struct AuthAppState<U, S>
where
    U: UserRepository + Send + Sync + 'static,
    S: SessionRepository + Send + Sync + 'static,
{
    pub credentials: Arc<CredentialStore<U>>,
    pub sessions: Arc<SessionManager<S, U>>,
    pub config: Arc<AuthConfig>,
}

impl<U, S> AuthAppState<U, S>
where
    U: UserRepository + Send + Sync + 'static,
    S: SessionRepository + Send + Sync + 'static,
{
    pub fn new(users: Arc<U>, sessions: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            credentials: Arc::new(CredentialStore::new(users.clone(), config.clone())),
            sessions: Arc::new(SessionManager::new(sessions, users, config.clone())),
            config,
        }
    }

    /// Authorizer sharing this state's session table
    pub fn authorizer(&self) -> RequestAuthorizer<S, U> {
        RequestAuthorizer::new(self.sessions.clone())
    }
}

impl<U, S> Clone for AuthAppState<U, S>
where
    U: UserRepository + Send + Sync + 'static,
    S: SessionRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            credentials: self.credentials.clone(),
            sessions: self.sessions.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/auth/signup
///
/// Registers the identity and signs it in.
pub async fn sign_up<U, S>(
    State(state): State<AuthAppState<U, S>>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<impl IntoResponse>
where
    U: UserRepository + Send + Sync + 'static,
    S: SessionRepository + Send + Sync + 'static,
{
    let user = state
        .credentials
        .register(Registration {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            password: req.password,
        })
        .await?;

    let issued = state.sessions.issue(&user.email).await?;
    let cookie = state.config.session_cookie().build_set_cookie(&issued.token);

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, set_cookie_header(&cookie))],
        Json(SignUpResponse {
            email: user.email.to_string(),
            first_name: user.first_name.to_string(),
            last_name: user.last_name.to_string(),
            expires_at_ms: issued.session.expires_at_ms(),
        }),
    ))
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /api/auth/signin
pub async fn sign_in<U, S>(
    State(state): State<AuthAppState<U, S>>,
    Json(req): Json<SignInRequest>,
) -> AuthResult<impl IntoResponse>
where
    U: UserRepository + Send + Sync + 'static,
    S: SessionRepository + Send + Sync + 'static,
{
    let user = state.credentials.verify(&req.email, req.password).await?;

    let issued = state.sessions.issue(&user.email).await?;
    let cookie = state.config.session_cookie().build_set_cookie(&issued.token);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, set_cookie_header(&cookie))],
        Json(SignInResponse {
            email: user.email.to_string(),
            expires_at_ms: issued.session.expires_at_ms(),
        }),
    ))
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /api/auth/signout
///
/// Requires a live session; revokes it and clears the cookie.
pub async fn sign_out<U, S>(
    State(state): State<AuthAppState<U, S>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    U: UserRepository + Send + Sync + 'static,
    S: SessionRepository + Send + Sync + 'static,
{
    let token = extract_cookie(&headers, &state.config.session_cookie_name)
        .ok_or(AuthError::SessionInvalid)?;

    let session = state.sessions.validate(&token).await?;
    state.sessions.revoke(&token).await?;

    tracing::info!(email = %session.email, "User signed out");

    let cookie = state.config.session_cookie().build_delete_cookie();

    Ok((
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, set_cookie_header(&cookie))],
    ))
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /api/auth/status
pub async fn session_status<U, S>(
    State(state): State<AuthAppState<U, S>>,
    headers: HeaderMap,
) -> AuthResult<Json<SessionStatusResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    S: SessionRepository + Send + Sync + 'static,
{
    let token = extract_cookie(&headers, &state.config.session_cookie_name);

    let session = match token {
        Some(token) => match state.sessions.validate(&token).await {
            Ok(session) => Some(session),
            Err(AuthError::SessionInvalid) => None,
            Err(e) => return Err(e),
        },
        None => None,
    };

    Ok(Json(match session {
        Some(session) => SessionStatusResponse {
            authenticated: true,
            email: Some(session.email.to_string()),
            expires_at_ms: Some(session.expires_at_ms()),
        },
        None => SessionStatusResponse {
            authenticated: false,
            email: None,
            expires_at_ms: None,
        },
    }))
}
