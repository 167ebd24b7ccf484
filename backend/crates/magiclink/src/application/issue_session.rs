//! Issue Session
//!
//! Builds the two cooperating session cookies after a successful redemption:
//! a server-only cookie carrying the authoritative identity reference, and a
//! client-readable flag the UI uses to decide what to render. No token or
//! secret material ever enters a cookie — the validator re-checks the store
//! on every request.

use crate::application::config::MagicLinkConfig;
use crate::domain::value_object::email::Email;

/// Static value of the client-readable flag cookie (no PII)
pub const CLIENT_COOKIE_VALUE: &str = "authenticated";

/// The cookie pair, as Set-Cookie header values
pub struct SessionCookies {
    /// HttpOnly cookie, value = identity email
    pub server: String,
    /// Script-readable cookie, value = static flag
    pub client: String,
}

/// Build the cookie pair establishing a session for `email`
///
/// Both cookies share the configured session lifetime; there is no silent
/// refresh — expiry forces re-authentication via a fresh token.
pub fn issue_session(config: &MagicLinkConfig, email: &Email) -> SessionCookies {
    SessionCookies {
        server: config.server_cookie().build_set_cookie(email.as_str()),
        client: config.client_cookie().build_set_cookie(CLIENT_COOKIE_VALUE),
    }
}

/// Build the cookie pair that clears a session (logout)
pub fn clear_session(config: &MagicLinkConfig) -> SessionCookies {
    SessionCookies {
        server: config.server_cookie().build_delete_cookie(),
        client: config.client_cookie().build_delete_cookie(),
    }
}
