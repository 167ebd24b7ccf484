//! In-Memory Identity Store
//!
//! Reference implementation of [`IdentityStore`] backed by a mutex-guarded
//! map, keyed by email. Used by the test suite and for local development
//! without a database. The claim operation holds the lock across the
//! check-and-clear, mirroring the conditional UPDATE of the Postgres store.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::entity::identity::Identity;
use crate::domain::repository::IdentityStore;
use crate::domain::value_object::{
    email::Email, identity_id::IdentityId, magic_token::MagicToken,
};
use crate::error::{AuthError, AuthResult};

/// In-memory identity store
#[derive(Clone, Default)]
pub struct MemoryIdentityStore {
    records: Arc<Mutex<HashMap<String, Identity>>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of identities in the store
    pub async fn count(&self) -> usize {
        self.records.lock().await.len()
    }
}

impl IdentityStore for MemoryIdentityStore {
    async fn create(&self, identity: &Identity) -> AuthResult<()> {
        let mut records = self.records.lock().await;
        let key = identity.email.as_str().to_string();
        if records.contains_key(&key) {
            return Err(AuthError::EmailTaken);
        }
        records.insert(key, identity.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Identity>> {
        let records = self.records.lock().await;
        Ok(records.get(email.as_str()).cloned())
    }

    async fn find_by_id(&self, identity_id: &IdentityId) -> AuthResult<Option<Identity>> {
        let records = self.records.lock().await;
        Ok(records
            .values()
            .find(|identity| &identity.identity_id == identity_id)
            .cloned())
    }

    async fn find_by_token(&self, token: &MagicToken) -> AuthResult<Option<Identity>> {
        let records = self.records.lock().await;
        Ok(records
            .values()
            .find(|identity| identity.active_token.as_deref() == Some(token.as_str()))
            .cloned())
    }

    async fn update_profile(&self, identity: &Identity) -> AuthResult<()> {
        let mut records = self.records.lock().await;
        let record = records
            .get_mut(identity.email.as_str())
            .ok_or(AuthError::IdentityNotFound)?;

        record.first_name = identity.first_name.clone();
        record.last_name = identity.last_name.clone();
        record.tier = identity.tier.clone();
        record.has_access = identity.has_access;
        record.is_active = identity.is_active;
        record.updated_at = identity.updated_at;
        Ok(())
    }

    async fn store_token(
        &self,
        identity_id: &IdentityId,
        token: &MagicToken,
        expires_at: DateTime<Utc>,
    ) -> AuthResult<()> {
        let mut records = self.records.lock().await;
        let record = records
            .values_mut()
            .find(|identity| &identity.identity_id == identity_id)
            .ok_or(AuthError::IdentityNotFound)?;

        record.set_token(token, expires_at);
        Ok(())
    }

    async fn claim_token(
        &self,
        token: &MagicToken,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<Identity>> {
        let mut records = self.records.lock().await;

        let record = records.values_mut().find(|identity| {
            identity.active_token.as_deref() == Some(token.as_str())
                && identity.has_valid_token(now)
                && identity.can_sign_in()
        });

        Ok(record.map(|identity| {
            identity.clear_token();
            identity.clone()
        }))
    }
}
