//! Magic-Link Router

use axum::{
    Router,
    routing::{get, post},
};

use crate::application::config::MagicLinkConfig;
use crate::domain::repository::IdentityStore;
use crate::infra::postgres::PgIdentityStore;
use crate::presentation::handlers::{self, MagicLinkState};

/// Create the magic-link router with the PostgreSQL store
pub fn magiclink_router(store: PgIdentityStore, config: MagicLinkConfig) -> Router {
    magiclink_router_with_state(MagicLinkState::new(store, config))
}

/// Create a magic-link router for any store implementation
pub fn magiclink_router_generic<S>(store: S, config: MagicLinkConfig) -> Router
where
    S: IdentityStore + Clone + Send + Sync + 'static,
{
    magiclink_router_with_state(MagicLinkState::new(store, config))
}

/// Create the router from an already-built state
///
/// The api binary uses this so it can share the same state with the
/// `require_session` middleware on its protected routes.
pub fn magiclink_router_with_state<S>(state: MagicLinkState<S>) -> Router
where
    S: IdentityStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/login", get(handlers::login::<S>))
        .route("/session", get(handlers::session_status::<S>))
        .route("/auth/request-link", post(handlers::request_link::<S>))
        .route("/auth/logout", post(handlers::logout::<S>))
        .route("/webhooks/identity", post(handlers::identity_webhook::<S>))
        .with_state(state)
}
