//! Issue Token Use Case
//!
//! Mints a single-use login token for an identity and stores it on the
//! record, overwriting any previously active token. Sending the email is
//! delegated to an external collaborator; the output carries the assembled
//! login link for it.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::config::MagicLinkConfig;
use crate::domain::entity::identity::Identity;
use crate::domain::repository::IdentityStore;
use crate::domain::value_object::{email::Email, magic_token::MagicToken};
use crate::error::{AuthError, AuthResult};

/// Issue token input
pub struct IssueTokenInput {
    /// Email that must resolve to exactly one identity record
    pub email: String,
}

/// Issue token output — the link components for the mailer collaborator
pub struct IssueTokenOutput {
    pub email: Email,
    pub token: MagicToken,
    pub expires_at: DateTime<Utc>,
    pub login_url: String,
}

/// Issue token use case
pub struct IssueTokenUseCase<S>
where
    S: IdentityStore,
{
    store: Arc<S>,
    config: Arc<MagicLinkConfig>,
}

impl<S> IssueTokenUseCase<S>
where
    S: IdentityStore,
{
    pub fn new(store: Arc<S>, config: Arc<MagicLinkConfig>) -> Self {
        Self { store, config }
    }

    pub async fn execute(&self, input: IssueTokenInput) -> AuthResult<IssueTokenOutput> {
        let email =
            Email::new(&input.email).map_err(|e| AuthError::InvalidEmail(e.message().to_string()))?;

        let identity = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::IdentityNotFound)?;

        self.execute_for(&identity).await
    }

    /// Mint a token for an already-loaded identity
    ///
    /// Used by the provisioner right after creating a record, skipping the
    /// redundant lookup.
    pub async fn execute_for(&self, identity: &Identity) -> AuthResult<IssueTokenOutput> {
        let ttl = if identity.provisioning_source.is_provisioned() {
            self.config.token_ttl_provisioned
        } else {
            self.config.token_ttl_self_service
        };
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| AuthError::Internal(format!("Invalid token TTL: {e}")))?;

        let token = MagicToken::generate();
        let expires_at = Utc::now() + ttl;

        // Overwrites any previously active token: requesting a new link
        // invalidates an old, unused one.
        self.store
            .store_token(&identity.identity_id, &token, expires_at)
            .await?;

        let login_url = build_login_url(&self.config.base_url, &token, &identity.email);

        tracing::info!(
            email = %identity.email,
            token = %token.preview(),
            expires_at = %expires_at,
            source = %identity.provisioning_source,
            "Issued login token"
        );

        Ok(IssueTokenOutput {
            email: identity.email.clone(),
            token,
            expires_at,
            login_url,
        })
    }
}

/// Assemble the login link the mailer embeds in the email
fn build_login_url(base_url: &str, token: &MagicToken, email: &Email) -> String {
    format!(
        "{}/login?token={}&email={}",
        base_url.trim_end_matches('/'),
        token.as_str(),
        encode_query(email.as_str())
    )
}

/// Percent-encode a query-string component (RFC 3986 unreserved set)
fn encode_query(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for b in value.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_query() {
        assert_eq!(encode_query("alice@example.com"), "alice%40example.com");
        assert_eq!(encode_query("a+b@x.org"), "a%2Bb%40x.org");
        assert_eq!(encode_query("plain"), "plain");
    }

    #[test]
    fn test_build_login_url() {
        let token = MagicToken::generate();
        let email = Email::new("alice@example.com").unwrap();
        let url = build_login_url("https://app.example.com/", &token, &email);
        assert_eq!(
            url,
            format!(
                "https://app.example.com/login?token={}&email=alice%40example.com",
                token.as_str()
            )
        );
    }
}
