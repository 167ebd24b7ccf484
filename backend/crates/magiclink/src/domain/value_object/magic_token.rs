//! Magic Token Value Object
//!
//! Single-use, time-limited login credential. 32 bytes of CSPRNG output,
//! hex-encoded to 64 characters. The raw value is only ever stored on the
//! identity record and embedded in the login link; it never enters a cookie.

use platform::crypto::{random_bytes, to_hex};

/// Bytes of entropy per token
pub const TOKEN_ENTROPY_BYTES: usize = 32;

/// Encoded token length (hex)
pub const TOKEN_ENCODED_LEN: usize = TOKEN_ENTROPY_BYTES * 2;

/// Magic-link token value object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagicToken(String);

impl MagicToken {
    /// Generate a fresh token from the OS random source
    pub fn generate() -> Self {
        Self(to_hex(&random_bytes(TOKEN_ENTROPY_BYTES)))
    }

    /// Parse a presented token value
    ///
    /// Only exact-shape values (64 lowercase hex chars) are accepted;
    /// anything else can never match a stored token, so callers treat
    /// `None` as token-not-found without touching the store.
    pub fn parse(value: &str) -> Option<Self> {
        if value.len() != TOKEN_ENCODED_LEN {
            return None;
        }
        if !value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        {
            return None;
        }
        Some(Self(value.to_string()))
    }

    /// Get the token as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Truncated form for logging (never log the full value)
    pub fn preview(&self) -> String {
        format!("{}…", &self.0[..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_shape() {
        let token = MagicToken::generate();
        assert_eq!(token.as_str().len(), TOKEN_ENCODED_LEN);
        assert!(token.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_unique() {
        let a = MagicToken::generate();
        let b = MagicToken::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_parse_roundtrip() {
        let token = MagicToken::generate();
        let parsed = MagicToken::parse(token.as_str()).unwrap();
        assert_eq!(parsed, token);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(MagicToken::parse("").is_none());
        assert!(MagicToken::parse("abc123").is_none());
        assert!(MagicToken::parse(&"g".repeat(TOKEN_ENCODED_LEN)).is_none());
        assert!(MagicToken::parse(&"A".repeat(TOKEN_ENCODED_LEN)).is_none());
        assert!(MagicToken::parse(&"a".repeat(TOKEN_ENCODED_LEN + 1)).is_none());
    }

    #[test]
    fn test_preview_truncates() {
        let token = MagicToken::generate();
        let preview = token.preview();
        assert!(preview.len() < token.as_str().len());
        assert!(token.as_str().starts_with(&preview[..8]));
    }
}
