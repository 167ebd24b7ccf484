//! Application Configuration
//!
//! Configuration for the magic-link application layer. The target
//! environment (staging vs production) is an explicit parameter here,
//! injected into the store adapter and provisioner — never a hardcoded
//! URL or key.

use std::str::FromStr;
use std::time::Duration;

/// Re-export cookie types from platform
pub use platform::cookie::{CookieConfig, SameSite};

/// Deployment environment, selecting which identity store is targeted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "staging" | "dev" | "development" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("Unknown environment: {other}")),
        }
    }
}

/// Magic-link application configuration
#[derive(Debug, Clone)]
pub struct MagicLinkConfig {
    /// Target environment
    pub environment: Environment,
    /// Base URL used when assembling login links
    pub base_url: String,
    /// Shared secret for the webhook signature (HMAC-SHA256)
    pub webhook_secret: Vec<u8>,
    /// Server-readable session cookie name (HttpOnly)
    pub server_cookie_name: String,
    /// Client-readable UI-state cookie name
    pub client_cookie_name: String,
    /// Whether to require Secure cookies
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Session cookie lifetime (1 week, no silent refresh)
    pub session_ttl: Duration,
    /// Token window for self-service link requests (24 hours)
    pub token_ttl_self_service: Duration,
    /// Token window for webhook/admin-provisioned identities (7 days)
    pub token_ttl_provisioned: Duration,
}

impl Default for MagicLinkConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Staging,
            base_url: "http://localhost:3000".to_string(),
            webhook_secret: Vec::new(),
            server_cookie_name: "session_server".to_string(),
            client_cookie_name: "session_client".to_string(),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            session_ttl: Duration::from_secs(7 * 24 * 3600), // 1 week
            token_ttl_self_service: Duration::from_secs(24 * 3600), // 24 hours
            token_ttl_provisioned: Duration::from_secs(7 * 24 * 3600), // 1 week
        }
    }
}

impl MagicLinkConfig {
    /// Create config with a random webhook secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            webhook_secret: secret.to_vec(),
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Cookie config for the authoritative server-only cookie
    pub fn server_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.server_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.session_ttl.as_secs() as i64),
        }
    }

    /// Cookie config for the script-readable UI flag cookie
    pub fn client_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.client_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: false,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.session_ttl.as_secs() as i64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parse() {
        assert_eq!("staging".parse::<Environment>(), Ok(Environment::Staging));
        assert_eq!("PROD".parse::<Environment>(), Ok(Environment::Production));
        assert!("mars".parse::<Environment>().is_err());
    }

    #[test]
    fn test_cookie_pair_roles() {
        let config = MagicLinkConfig::default();
        assert!(config.server_cookie().http_only);
        assert!(!config.client_cookie().http_only);
        assert_eq!(
            config.server_cookie().max_age_secs,
            config.client_cookie().max_age_secs
        );
    }

    #[test]
    fn test_token_windows() {
        let config = MagicLinkConfig::default();
        assert_eq!(config.token_ttl_self_service, Duration::from_secs(86_400));
        assert_eq!(config.token_ttl_provisioned, Duration::from_secs(604_800));
    }
}
