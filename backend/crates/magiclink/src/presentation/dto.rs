//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

// ============================================================================
// Login (magic-link landing)
// ============================================================================

/// Query string of the login link
///
/// `token` is optional at the extraction level so a mangled link still
/// gets the redirect treatment instead of a bare 400.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginQuery {
    pub token: Option<String>,
    /// Carried in the link for the mailer's sake; redemption keys on the
    /// token alone.
    pub email: Option<String>,
}

// ============================================================================
// Session Status
// ============================================================================

/// Session status response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub authenticated: bool,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub tier: Option<String>,
    pub account_status: String,
}

// ============================================================================
// Request Link
// ============================================================================

/// Request a fresh login link
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestLinkRequest {
    pub email: String,
}

/// Request link response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestLinkResponse {
    pub success: bool,
    pub message: String,
}

// ============================================================================
// Identity Webhook
// ============================================================================

/// Inbound provisioning webhook payload
///
/// Every field except `email` is optional; the signature check happens on
/// the raw body before this is ever parsed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityWebhookRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub reissue_token: bool,
}

/// Identity webhook response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityWebhookResponse {
    pub success: bool,
    /// False when the event updated an existing identity
    pub created: bool,
    pub email: String,
    pub tier: Option<String>,
}
