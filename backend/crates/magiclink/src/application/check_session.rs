//! Check Session Use Case
//!
//! Validates the session on every protected request. The cookie is only a
//! reference: the identity record is re-fetched and the access flags
//! re-checked each time, with no time-boxed cache, so an administrative
//! revocation takes effect on the very next request.

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::application::config::MagicLinkConfig;
use crate::domain::entity::identity::Identity;
use crate::domain::repository::IdentityStore;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Check session use case
pub struct CheckSessionUseCase<S>
where
    S: IdentityStore,
{
    store: Arc<S>,
    config: Arc<MagicLinkConfig>,
}

impl<S> CheckSessionUseCase<S>
where
    S: IdentityStore,
{
    pub fn new(store: Arc<S>, config: Arc<MagicLinkConfig>) -> Self {
        Self { store, config }
    }

    /// Validate the request's session cookies and return the live identity
    ///
    /// Fails with `Unauthenticated` when the server cookie is absent,
    /// malformed, references a missing identity, or the identity's access
    /// flags no longer allow sign-in. Store failures stay `Database` errors —
    /// an unreachable backend must never be reported as "not signed in".
    pub async fn execute(&self, headers: &HeaderMap) -> AuthResult<Identity> {
        let raw = platform::cookie::extract_cookie(headers, &self.config.server_cookie_name)
            .ok_or(AuthError::Unauthenticated)?;

        if raw.is_empty() {
            return Err(AuthError::Unauthenticated);
        }

        // The cookie is only trusted as far as being a well-formed email;
        // everything else comes from the store.
        let email = Email::new(&raw).map_err(|_| AuthError::Unauthenticated)?;

        let identity = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::Unauthenticated)?;

        if !identity.can_sign_in() {
            tracing::debug!(email = %identity.email, status = identity.account_status(), "Session rejected by access flags");
            return Err(AuthError::Unauthenticated);
        }

        Ok(identity)
    }

    /// Just check whether the request carries a valid session
    ///
    /// Store errors count as invalid here; callers that need the
    /// outage/unauthenticated distinction use [`execute`].
    ///
    /// [`execute`]: CheckSessionUseCase::execute
    pub async fn is_valid(&self, headers: &HeaderMap) -> bool {
        self.execute(headers).await.is_ok()
    }
}
