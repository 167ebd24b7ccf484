//! Redeem Token Use Case
//!
//! Exchanges a presented token for the identity it belongs to. The claim is
//! a single conditional update in the store, so the same token can never be
//! redeemed twice, even under concurrent requests.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::entity::identity::Identity;
use crate::domain::repository::IdentityStore;
use crate::domain::value_object::magic_token::MagicToken;
use crate::error::{AuthError, AuthResult};

/// Redeem token use case
pub struct RedeemTokenUseCase<S>
where
    S: IdentityStore,
{
    store: Arc<S>,
}

impl<S> RedeemTokenUseCase<S>
where
    S: IdentityStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Redeem a presented token value
    ///
    /// On success the token is already cleared from the record; the caller
    /// establishes the session from the returned identity. Failures are
    /// reported as `TokenNotFound`, `TokenExpired`, or `AccessDenied` —
    /// distinct, so the UI can render different guidance.
    pub async fn execute(&self, presented: &str) -> AuthResult<Identity> {
        // Malformed values can never match a stored token
        let token = MagicToken::parse(presented).ok_or(AuthError::TokenNotFound)?;
        let now = Utc::now();

        if let Some(identity) = self.store.claim_token(&token, now).await? {
            tracing::info!(
                email = %identity.email,
                token = %token.preview(),
                "Login token redeemed"
            );
            return Ok(identity);
        }

        // The claim did not match; read the record to report why. An expired
        // or access-denied token stays in place — it can never succeed, but
        // keeping it lets support inspect the state.
        match self.store.find_by_token(&token).await? {
            None => Err(AuthError::TokenNotFound),
            Some(identity) => {
                if !identity.has_valid_token(now) {
                    Err(AuthError::TokenExpired)
                } else if !identity.can_sign_in() {
                    Err(AuthError::AccessDenied)
                } else {
                    // Token was valid and flags allow sign-in, yet the claim
                    // missed: a concurrent redemption won the race.
                    Err(AuthError::TokenNotFound)
                }
            }
        }
    }
}
