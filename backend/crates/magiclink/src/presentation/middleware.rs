//! Session Middleware
//!
//! Middleware for requiring a valid session on protected routes. Validation
//! goes through [`CheckSessionUseCase`], so every protected request hits the
//! identity store; there is no cached verdict to outlive a revocation.

use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::application::CheckSessionUseCase;
use crate::domain::entity::identity::Identity;
use crate::domain::repository::IdentityStore;
use crate::presentation::handlers::MagicLinkState;

/// Middleware that requires a valid session
///
/// Inserts the validated [`CurrentIdentity`] into request extensions for
/// downstream handlers. Wire it with `middleware::from_fn` and a cloned
/// state, the way the api binary does.
pub async fn require_session<S>(
    state: MagicLinkState<S>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    S: IdentityStore + Clone + Send + Sync + 'static,
{
    let use_case = CheckSessionUseCase::new(state.store.clone(), state.config.clone());

    let identity = match use_case.execute(req.headers()).await {
        Ok(identity) => identity,
        Err(e) => return Err(e.into_response()),
    };

    req.extensions_mut().insert(CurrentIdentity(identity));

    Ok(next.run(req).await)
}

/// The authenticated identity, stored in request extensions
#[derive(Clone)]
pub struct CurrentIdentity(pub Identity);
