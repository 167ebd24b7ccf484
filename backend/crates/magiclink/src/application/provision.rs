//! Provision Use Case
//!
//! Cross-environment provisioner, invoked by the inbound marketing-platform
//! webhook. Ensures an identity exists in the targeted store before a login
//! token can be issued for it. Idempotent per store: the email-uniqueness
//! invariant is the de-duplication key.

use std::sync::Arc;

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::application::config::MagicLinkConfig;
use crate::application::issue_token::{IssueTokenOutput, IssueTokenUseCase};
use crate::domain::entity::identity::Identity;
use crate::domain::repository::IdentityStore;
use crate::domain::value_object::{email::Email, provisioning_source::ProvisioningSource};
use crate::error::{AuthError, AuthResult};

/// Marketing-platform tag → subscription tier
const TIER_TAGS: &[(&str, &str)] = &[
    ("impact_member_v3", "impact_member"),
    ("startup_business_v3", "startup_business"),
    ("advanced_business_v3", "advanced_business"),
    ("church_leader_small_v3", "church_leader"),
    ("church_leader_medium_v3", "church_leader"),
    ("church_leader_large_v3", "church_leader"),
];

/// Tier assigned at creation when no tag is recognized
const DEFAULT_TIER: &str = "impact_member";

/// Inbound provisioning event (already signature-verified and parsed)
#[derive(Debug, Clone)]
pub struct WebhookEvent {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub tags: Vec<String>,
    /// Re-issue a login token for an existing identity
    pub reissue_token: bool,
}

/// Provision output
pub struct ProvisionOutput {
    pub identity: Identity,
    pub created: bool,
    /// Token minted for a new identity (or on explicit re-issuance)
    pub issued: Option<IssueTokenOutput>,
}

/// Provision use case
pub struct ProvisionUseCase<S>
where
    S: IdentityStore,
{
    store: Arc<S>,
    config: Arc<MagicLinkConfig>,
}

impl<S> ProvisionUseCase<S>
where
    S: IdentityStore,
{
    pub fn new(store: Arc<S>, config: Arc<MagicLinkConfig>) -> Self {
        Self { store, config }
    }

    pub async fn execute(&self, event: WebhookEvent) -> AuthResult<ProvisionOutput> {
        let email =
            Email::new(&event.email).map_err(|e| AuthError::InvalidEmail(e.message().to_string()))?;
        let tier = tier_from_tags(&event.tags);

        match self.store.find_by_email(&email).await? {
            Some(identity) => self.update_existing(identity, &event, tier).await,
            None => match self.create_new(email.clone(), &event, tier.clone()).await {
                Ok(output) => Ok(output),
                // Lost a create race against a replayed event; the record
                // exists now, so fall through to the update path.
                Err(AuthError::EmailTaken) => {
                    let identity = self
                        .store
                        .find_by_email(&email)
                        .await?
                        .ok_or(AuthError::IdentityNotFound)?;
                    self.update_existing(identity, &event, tier).await
                }
                Err(e) => Err(e),
            },
        }
    }

    /// Repeat event for an existing identity: update descriptive fields,
    /// leave the active token untouched unless re-issuance was requested.
    async fn update_existing(
        &self,
        mut identity: Identity,
        event: &WebhookEvent,
        tier: Option<String>,
    ) -> AuthResult<ProvisionOutput> {
        identity.apply_profile(event.first_name.clone(), event.last_name.clone(), tier);
        self.store.update_profile(&identity).await?;

        let issued = if event.reissue_token {
            Some(
                IssueTokenUseCase::new(self.store.clone(), self.config.clone())
                    .execute_for(&identity)
                    .await?,
            )
        } else {
            None
        };

        tracing::info!(
            email = %identity.email,
            tier = identity.tier.as_deref().unwrap_or("-"),
            environment = self.config.environment.as_str(),
            reissued = issued.is_some(),
            "Updated provisioned identity"
        );

        Ok(ProvisionOutput {
            identity,
            created: false,
            issued,
        })
    }

    /// First event for this email: create the identity with full access and
    /// mint a token immediately (7-day window) so a login link can be sent.
    async fn create_new(
        &self,
        email: Email,
        event: &WebhookEvent,
        tier: Option<String>,
    ) -> AuthResult<ProvisionOutput> {
        let mut identity = Identity::new(email, ProvisioningSource::Webhook);
        // New records always get a tier; repeat events only change it when a
        // recognized tag is present.
        let tier = tier.unwrap_or_else(|| DEFAULT_TIER.to_string());
        identity.apply_profile(event.first_name.clone(), event.last_name.clone(), Some(tier));

        self.store.create(&identity).await?;

        let issued = IssueTokenUseCase::new(self.store.clone(), self.config.clone())
            .execute_for(&identity)
            .await?;

        tracing::info!(
            email = %identity.email,
            tier = identity.tier.as_deref().unwrap_or("-"),
            environment = self.config.environment.as_str(),
            "Provisioned new identity from webhook"
        );

        Ok(ProvisionOutput {
            identity,
            created: true,
            issued: Some(issued),
        })
    }
}

/// Map webhook tags to a subscription tier (first known tag wins)
fn tier_from_tags(tags: &[String]) -> Option<String> {
    tags.iter().find_map(|tag| {
        TIER_TAGS
            .iter()
            .find(|(name, _)| name == tag)
            .map(|(_, tier)| tier.to_string())
    })
}

/// Verify the webhook's shared-secret signature header
///
/// The signature is the hex HMAC-SHA256 of the raw request body. Rejection
/// must happen before any parsing or store access — a bad signature never
/// has side effects.
pub fn verify_signature(secret: &[u8], body: &[u8], signature_hex: &str) -> AuthResult<()> {
    let signature =
        hex::decode(signature_hex.trim()).map_err(|_| AuthError::SignatureInvalid)?;

    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(body);

    mac.verify_slice(&signature)
        .map_err(|_| AuthError::SignatureInvalid)
}

/// Compute the signature header value for a body (used by tests and docs)
pub fn sign_body(secret: &[u8], body: &[u8]) -> String {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_from_tags() {
        let tags = vec!["newsletter".to_string(), "startup_business_v3".to_string()];
        assert_eq!(tier_from_tags(&tags), Some("startup_business".to_string()));

        let tags = vec!["church_leader_medium_v3".to_string()];
        assert_eq!(tier_from_tags(&tags), Some("church_leader".to_string()));

        assert_eq!(tier_from_tags(&[]), None);
        assert_eq!(tier_from_tags(&["unknown".to_string()]), None);
    }

    #[test]
    fn test_signature_roundtrip() {
        let secret = b"shared-secret";
        let body = br#"{"email":"alice@example.com"}"#;
        let signature = sign_body(secret, body);
        assert!(verify_signature(secret, body, &signature).is_ok());
    }

    #[test]
    fn test_signature_rejects_tampering() {
        let secret = b"shared-secret";
        let body = br#"{"email":"alice@example.com"}"#;
        let signature = sign_body(secret, body);

        assert!(matches!(
            verify_signature(secret, br#"{"email":"mallory@example.com"}"#, &signature),
            Err(AuthError::SignatureInvalid)
        ));
        assert!(matches!(
            verify_signature(b"other-secret", body, &signature),
            Err(AuthError::SignatureInvalid)
        ));
        assert!(matches!(
            verify_signature(secret, body, "not-hex"),
            Err(AuthError::SignatureInvalid)
        ));
    }
}
