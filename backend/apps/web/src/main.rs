//! Web Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.
//!
//! If the store cannot be reached at startup the process does NOT exit:
//! it serves a degraded read-only mode (home and static assets only) and
//! every store-backed route answers with a generic server error.

use axum::Router;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use base64::Engine;
use base64::engine::general_purpose;
use membership::{MembershipConfig, PgMembershipRepository, membership_router, views};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "web=info,membership=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_membership_config()?;

    let app = match init_store().await {
        Ok(pool) => {
            let repo = PgMembershipRepository::new(pool);

            // Startup cleanup: remove expired sessions.
            // Errors here should not prevent server startup
            match repo.cleanup_expired().await {
                Ok(deleted) => {
                    tracing::info!(sessions_deleted = deleted, "Session cleanup completed");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Session cleanup failed, continuing anyway");
                }
            }

            membership_router(repo, config)
        }
        Err(e) => {
            tracing::error!(error = %e, "Store unavailable, serving degraded read-only mode");
            degraded_router()
        }
    };

    // Static assets (stylesheet, gallery images)
    let static_dir =
        env::var("STATIC_DIR").unwrap_or_else(|_| "backend/apps/web/public".to_string());

    let app = app
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http());

    // Start server
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Connect to PostgreSQL and run migrations
async fn init_store() -> anyhow::Result<PgPool> {
    let database_url =
        env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL is not set"))?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    sqlx::migrate!("../../../database/migrations").run(&pool).await?;

    tracing::info!("Migrations completed");

    Ok(pool)
}

/// Load membership configuration from the environment
fn load_membership_config() -> anyhow::Result<MembershipConfig> {
    if cfg!(debug_assertions) {
        // Random secret, insecure cookie
        return Ok(MembershipConfig::development());
    }

    // In production, load secret from environment
    let secret_b64 =
        env::var("SESSION_SECRET").map_err(|_| anyhow::anyhow!("SESSION_SECRET must be set"))?;
    let secret_bytes = Engine::decode(&general_purpose::STANDARD, &secret_b64)?;
    if secret_bytes.len() != 32 {
        anyhow::bail!("SESSION_SECRET must decode to exactly 32 bytes");
    }

    let mut secret = [0u8; 32];
    secret.copy_from_slice(&secret_bytes);

    Ok(MembershipConfig {
        session_secret: secret,
        ..MembershipConfig::default()
    })
}

/// Router served when the store is unreachable: home and static assets
/// only, every store-backed route surfaces a generic server error
fn degraded_router() -> Router {
    Router::new()
        .route("/", get(degraded_home))
        .route("/signup", get(store_unavailable).post(store_unavailable))
        .route("/login", get(store_unavailable).post(store_unavailable))
        .route("/logout", get(store_unavailable))
        .route("/members", get(store_unavailable))
        .route("/admin", get(store_unavailable))
        .route("/admin/update-user", post(store_unavailable))
        .fallback(not_found)
}

async fn degraded_home() -> Html<String> {
    Html(views::home_page(None))
}

async fn store_unavailable() -> AppError {
    AppError::service_unavailable("Service temporarily unavailable, please try again later")
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html(views::not_found_page()))
}
