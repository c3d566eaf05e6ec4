//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request-level errors are the crates'
//! own `AuthError` / `ForumError`.

use anyhow::{Context, bail};
use auth::application::session_manager::SessionManager;
use auth::domain::repository::{SessionRepository, UserRepository};
use auth::presentation::handlers::AuthAppState;
use auth::{AuthConfig, MemorySessionStore, MemoryUserStore, PgUserRepository, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use base64::Engine;
use base64::engine::general_purpose;
use forum::domain::repository::{CommentRepository, LikeRepository, PostRepository};
use forum::{MemoryForumStore, PgForumRepository, forum_router};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PORT: u16 = 31113;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// How often expired sessions are swept from the session table
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(15 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,forum=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let auth_config = Arc::new(load_auth_config()?);

    let api = match env::var("DATABASE_URL") {
        Ok(database_url) => {
            let max_connections = parse_env("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
            let pool = PgPoolOptions::new()
                .max_connections(max_connections)
                .connect(&database_url)
                .await
                .context("failed to connect to DATABASE_URL")?;

            tracing::info!(max_connections, "Connected to database");

            // Run migrations
            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            api_router(
                Arc::new(PgUserRepository::new(pool.clone())),
                Arc::new(PgForumRepository::new(pool)),
                auth_config,
            )
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage; data is lost on exit");
            let users = MemoryUserStore::new();
            api_router(
                Arc::new(users.clone()),
                Arc::new(MemoryForumStore::new(users)),
                auth_config,
            )
        }
    };

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([header::CONTENT_TYPE, header::ACCEPT]))
        .allow_credentials(true);

    let app = api.layer(TraceLayer::new_for_http()).layer(cors);

    // Start server
    let port = parse_env("API_PORT", DEFAULT_PORT)?;
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Mount auth and forum on one router sharing a single session table
fn api_router<U, R>(users: Arc<U>, forum: Arc<R>, auth_config: Arc<AuthConfig>) -> Router
where
    U: UserRepository + Send + Sync + 'static,
    R: PostRepository + CommentRepository + LikeRepository + Send + Sync + 'static,
{
    let auth_state = AuthAppState::new(
        users,
        Arc::new(MemorySessionStore::new()),
        auth_config.clone(),
    );
    spawn_session_sweeper(auth_state.sessions.clone());

    let authorizer = Arc::new(auth_state.authorizer());

    Router::new()
        .nest("/api/auth", auth_router(auth_state))
        .nest("/api/forum", forum_router(forum, authorizer, auth_config))
}

fn spawn_session_sweeper<S, U>(sessions: Arc<SessionManager<S, U>>)
where
    S: SessionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        // First tick completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;
            if let Err(e) = sessions.cleanup_expired().await {
                tracing::warn!(error = %e, "Session cleanup failed, retrying next interval");
            }
        }
    });
}

fn load_auth_config() -> anyhow::Result<AuthConfig> {
    let mut config = match env::var("SESSION_SECRET") {
        Ok(secret_b64) => AuthConfig {
            session_secret: decode_secret(&secret_b64)?,
            cookie_secure: !cfg!(debug_assertions),
            ..AuthConfig::default()
        },
        Err(_) if cfg!(debug_assertions) => {
            tracing::warn!("SESSION_SECRET not set, using a random one");
            AuthConfig::development()
        }
        Err(_) => bail!("SESSION_SECRET must be set in production"),
    };

    if let Ok(pepper_b64) = env::var("PASSWORD_PEPPER") {
        let pepper = general_purpose::STANDARD
            .decode(pepper_b64.trim())
            .context("PASSWORD_PEPPER must be base64")?;
        config.password_pepper = Some(pepper);
    }

    Ok(config)
}

fn decode_secret(secret_b64: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = general_purpose::STANDARD
        .decode(secret_b64.trim())
        .context("SESSION_SECRET must be base64")?;

    bytes
        .try_into()
        .map_err(|b: Vec<u8>| anyhow::anyhow!("SESSION_SECRET must decode to 32 bytes, got {}", b.len()))
}

fn parse_env<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", name, value)),
        Err(_) => Ok(default),
    }
}
