//! Identity Entity
//!
//! The single persisted entity this subsystem manipulates: the user-profile
//! record keyed by email. Token state lives directly on the record — at most
//! one redeemable token per identity at a time.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    email::Email, identity_id::IdentityId, magic_token::MagicToken,
    provisioning_source::ProvisioningSource,
};

/// Identity record entity
///
/// Invariant: `active_token` is set if and only if `token_expires_at` is set.
/// All mutation goes through the methods below, which preserve the pairing.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Internal UUID identifier, immutable
    pub identity_id: IdentityId,
    /// Unique, case-normalized; primary lookup key for token flows
    pub email: Email,
    /// Descriptive profile fields (from signup or webhook payloads)
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Subscription tier derived from webhook tags; display/admin only
    pub tier: Option<String>,
    /// Currently redeemable login token, if any
    pub active_token: Option<String>,
    /// Expiry for `active_token`; always present when the token is
    pub token_expires_at: Option<DateTime<Utc>>,
    /// Gates whether a session may be established at all
    pub has_access: bool,
    /// Independent deactivation flag (e.g. suspended account)
    pub is_active: bool,
    /// How this record was created
    pub provisioning_source: ProvisioningSource,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    /// Create a new identity with no pending token
    pub fn new(email: Email, source: ProvisioningSource) -> Self {
        let now = Utc::now();

        Self {
            identity_id: IdentityId::new(),
            email,
            first_name: None,
            last_name: None,
            tier: None,
            active_token: None,
            token_expires_at: None,
            has_access: true,
            is_active: true,
            provisioning_source: source,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether a session may be created or remain valid for this identity
    pub fn can_sign_in(&self) -> bool {
        self.has_access && self.is_active
    }

    /// Human-readable account status for API responses
    pub fn account_status(&self) -> &'static str {
        if !self.is_active {
            "suspended"
        } else if !self.has_access {
            "revoked"
        } else {
            "active"
        }
    }

    /// Display name assembled from profile fields
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.email.as_str().to_string(),
        }
    }

    /// Attach a fresh token, overwriting any previous one
    pub fn set_token(&mut self, token: &MagicToken, expires_at: DateTime<Utc>) {
        self.active_token = Some(token.as_str().to_string());
        self.token_expires_at = Some(expires_at);
        self.updated_at = Utc::now();
    }

    /// Clear the token pair (on redemption)
    pub fn clear_token(&mut self) {
        self.active_token = None;
        self.token_expires_at = None;
        self.updated_at = Utc::now();
    }

    /// Whether the stored token (if any) is still redeemable at `now`
    pub fn has_valid_token(&self, now: DateTime<Utc>) -> bool {
        match (&self.active_token, &self.token_expires_at) {
            (Some(_), Some(expires_at)) => now < *expires_at,
            _ => false,
        }
    }

    /// Update descriptive fields from a provisioning event
    ///
    /// Token state and access flags are deliberately untouched.
    pub fn apply_profile(
        &mut self,
        first_name: Option<String>,
        last_name: Option<String>,
        tier: Option<String>,
    ) {
        if first_name.is_some() {
            self.first_name = first_name;
        }
        if last_name.is_some() {
            self.last_name = last_name;
        }
        if tier.is_some() {
            self.tier = tier;
        }
        self.updated_at = Utc::now();
    }
}
