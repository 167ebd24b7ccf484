//! Identity Store Trait
//!
//! Interface for the identity-record store. Implementations live in the
//! infrastructure layer and are injected into every use case — no
//! process-wide clients.

use chrono::{DateTime, Utc};

use crate::domain::entity::identity::Identity;
use crate::domain::value_object::{
    email::Email, identity_id::IdentityId, magic_token::MagicToken,
};
use crate::error::AuthResult;

/// Identity store trait
#[trait_variant::make(IdentityStore: Send)]
pub trait LocalIdentityStore {
    /// Create a new identity record
    ///
    /// Fails with `EmailTaken` when an identity with the same email already
    /// exists in this store (the email-uniqueness invariant is the webhook
    /// de-duplication key).
    async fn create(&self, identity: &Identity) -> AuthResult<()>;

    /// Find identity by email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Identity>>;

    /// Find identity by its internal ID
    async fn find_by_id(&self, identity_id: &IdentityId) -> AuthResult<Option<Identity>>;

    /// Find the identity whose active token equals the presented value
    ///
    /// Exact match only; used to distinguish not-found from expired after a
    /// failed claim. Never clears anything.
    async fn find_by_token(&self, token: &MagicToken) -> AuthResult<Option<Identity>>;

    /// Update descriptive fields and access flags (never token columns)
    async fn update_profile(&self, identity: &Identity) -> AuthResult<()>;

    /// Attach a token to an identity, overwriting any previous one
    async fn store_token(
        &self,
        identity_id: &IdentityId,
        token: &MagicToken,
        expires_at: DateTime<Utc>,
    ) -> AuthResult<()>;

    /// Atomically claim a token: clear it and return the identity
    ///
    /// A single conditional update guarded by token match, unexpired expiry,
    /// and the access flags — not a read-then-write — so two concurrent
    /// redemptions can never both observe the token as claimable. Returns
    /// `None` when no row qualifies; the caller then inspects the record via
    /// [`find_by_token`] to report why.
    ///
    /// [`find_by_token`]: LocalIdentityStore::find_by_token
    async fn claim_token(
        &self,
        token: &MagicToken,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<Identity>>;
}
