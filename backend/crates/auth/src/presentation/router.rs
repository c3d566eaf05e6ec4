//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};

use crate::domain::repository::{SessionRepository, UserRepository};
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router for any repository implementation
///
/// Mounted under `/api/auth` by the API binary.
pub fn auth_router<U, S>(state: AuthAppState<U, S>) -> Router
where
    U: UserRepository + Send + Sync + 'static,
    S: SessionRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/signup", post(handlers::sign_up::<U, S>))
        .route("/signin", post(handlers::sign_in::<U, S>))
        .route("/signout", post(handlers::sign_out::<U, S>))
        .route("/status", get(handlers::session_status::<U, S>))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::AuthConfig;
    use crate::infra::memory::{MemorySessionStore, MemoryUserStore};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, Response, StatusCode, header};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let state = AuthAppState::new(
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemorySessionStore::new()),
            Arc::new(AuthConfig::development()),
        );
        auth_router(state)
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn with_cookie(method: &str, uri: &str, cookie: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap()
    }

    /// `name=value` part of the Set-Cookie header
    fn session_cookie(response: &Response<Body>) -> String {
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    async fn json_body(response: Response<Body>) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn signup_body() -> Value {
        json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "password": "engine"
        })
    }

    #[tokio::test]
    async fn test_signup_sets_session_cookie() {
        let app = app();

        let response = app
            .clone()
            .oneshot(json_request("/signup", signup_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("Max-Age=7200"));
        let cookie = session_cookie(&response);

        let body = json_body(response).await;
        assert_eq!(body["email"], "ada@example.com");
        assert_eq!(body["firstName"], "Ada");

        let response = app
            .oneshot(with_cookie("GET", "/status", &cookie))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["authenticated"], true);
        assert_eq!(body["email"], "ada@example.com");
    }

    #[tokio::test]
    async fn test_duplicate_signup_conflicts() {
        let app = app();

        app.clone()
            .oneshot(json_request("/signup", signup_body()))
            .await
            .unwrap();
        let response = app
            .oneshot(json_request("/signup", signup_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = json_body(response).await;
        assert_eq!(body["title"], "Conflict");
    }

    #[tokio::test]
    async fn test_signup_with_missing_field_is_bad_request() {
        let mut body = signup_body();
        body["lastName"] = json!("");

        let response = app().oneshot(json_request("/signup", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_signin_failures_look_the_same() {
        let app = app();
        app.clone()
            .oneshot(json_request("/signup", signup_body()))
            .await
            .unwrap();

        let wrong_password = app
            .clone()
            .oneshot(json_request(
                "/signin",
                json!({ "email": "ada@example.com", "password": "nope" }),
            ))
            .await
            .unwrap();
        let unknown_account = app
            .oneshot(json_request(
                "/signin",
                json!({ "email": "bob@example.com", "password": "nope" }),
            ))
            .await
            .unwrap();

        assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_account.status(), StatusCode::UNAUTHORIZED);
        assert!(wrong_password.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(json_body(wrong_password).await, json_body(unknown_account).await);
    }

    #[tokio::test]
    async fn test_signin_then_signout() {
        let app = app();
        app.clone()
            .oneshot(json_request("/signup", signup_body()))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(json_request(
                "/signin",
                json!({ "email": "Ada@Example.com", "password": "engine" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = session_cookie(&response);

        let response = app
            .clone()
            .oneshot(with_cookie("POST", "/signout", &cookie))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let cleared = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cleared.contains("Max-Age=0"));

        let response = app
            .clone()
            .oneshot(with_cookie("GET", "/status", &cookie))
            .await
            .unwrap();
        assert_eq!(json_body(response).await["authenticated"], false);

        let response = app
            .oneshot(with_cookie("POST", "/signout", &cookie))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_signout_without_cookie_is_unauthorized() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/signout")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
