//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use axum::{
    Extension, Json, Router, http,
    http::{Method, header},
    middleware,
    routing::get,
};
use magiclink::handlers::MagicLinkState;
use magiclink::middleware::{CurrentIdentity, require_session};
use magiclink::router::magiclink_router_with_state;
use magiclink::{Environment, MagicLinkConfig, PgIdentityStore};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
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
                .unwrap_or_else(|_| "api=info,magiclink=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Target environment: one deployment serves exactly one identity store
    let environment = match env::var("APP_ENV") {
        Ok(value) => value
            .parse::<Environment>()
            .map_err(anyhow::Error::msg)?,
        Err(_) => Environment::default(),
    };

    // Database connection
    let database_url = database_url_for(environment)?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!(environment = environment.as_str(), "Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let config = build_config(environment)?;
    let state = MagicLinkState::new(PgIdentityStore::new(pool), config);

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

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
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Protected routes share state with the auth router so the middleware
    // validates against the same store
    let protected = Router::new().route("/api/me", get(current_user)).layer(
        middleware::from_fn({
            let state = state.clone();
            move |req, next| require_session(state.clone(), req, next)
        }),
    );

    // Build router
    let app = Router::new()
        .merge(magiclink_router_with_state(state))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], 31117));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// GET /api/me (session required)
async fn current_user(
    Extension(CurrentIdentity(identity)): Extension<CurrentIdentity>,
) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "email": identity.email.as_str(),
        "displayName": identity.display_name(),
        "tier": identity.tier,
        "accountStatus": identity.account_status(),
    }))
}

/// Resolve the connection string for the selected environment
///
/// Per-environment variables win; plain DATABASE_URL is the single-store
/// fallback for local development.
fn database_url_for(environment: Environment) -> anyhow::Result<String> {
    let key = match environment {
        Environment::Staging => "DATABASE_URL_STAGING",
        Environment::Production => "DATABASE_URL_PRODUCTION",
    };

    env::var(key)
        .or_else(|_| env::var("DATABASE_URL"))
        .map_err(|_| anyhow::anyhow!("{key} or DATABASE_URL must be set in environment"))
}

fn build_config(environment: Environment) -> anyhow::Result<MagicLinkConfig> {
    let mut config = if cfg!(debug_assertions) {
        MagicLinkConfig::development()
    } else {
        MagicLinkConfig::default()
    };

    config.environment = environment;

    if let Ok(base_url) = env::var("APP_BASE_URL") {
        config.base_url = base_url;
    }

    match env::var("WEBHOOK_SECRET") {
        Ok(secret) => config.webhook_secret = secret.into_bytes(),
        // Development keeps the random secret from MagicLinkConfig::development()
        Err(_) if cfg!(debug_assertions) => {}
        Err(_) => anyhow::bail!("WEBHOOK_SECRET must be set in production"),
    }

    Ok(config)
}
