//! Magic-Link Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// No identity record for the given email
    #[error("Identity not found")]
    IdentityNotFound,

    /// An identity with this email already exists in the target store
    #[error("Email already registered")]
    EmailTaken,

    /// No identity has the presented token as its active token
    #[error("Login token not found")]
    TokenNotFound,

    /// The token matched but its expiry has passed
    #[error("Login token has expired")]
    TokenExpired,

    /// Token or session was valid but the identity lacks platform access
    #[error("Platform access denied")]
    AccessDenied,

    /// No usable session cookie on a protected request
    #[error("Not authenticated")]
    Unauthenticated,

    /// Webhook signature verification failed
    #[error("Invalid webhook signature")]
    SignatureInvalid,

    /// Email failed validation
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// Required field missing from a request payload
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Request body could not be parsed
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::IdentityNotFound | AuthError::TokenNotFound => StatusCode::NOT_FOUND,
            AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::TokenExpired | AuthError::AccessDenied => StatusCode::FORBIDDEN,
            AuthError::Unauthenticated | AuthError::SignatureInvalid => StatusCode::UNAUTHORIZED,
            AuthError::InvalidEmail(_)
            | AuthError::MissingField(_)
            | AuthError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::IdentityNotFound | AuthError::TokenNotFound => ErrorKind::NotFound,
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::TokenExpired | AuthError::AccessDenied => ErrorKind::Forbidden,
            AuthError::Unauthenticated | AuthError::SignatureInvalid => ErrorKind::Unauthorized,
            AuthError::InvalidEmail(_)
            | AuthError::MissingField(_)
            | AuthError::MalformedPayload(_) => ErrorKind::BadRequest,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Token failures and access denial carry distinct user actions so the
    /// frontend can point the user at "request a new link" vs "contact support".
    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            AuthError::TokenNotFound | AuthError::TokenExpired => {
                err.with_action("Request a new login link")
            }
            AuthError::AccessDenied => err.with_action("Contact support"),
            _ => err,
        }
    }

    /// Query-string error indicator for login-page redirects
    pub fn redirect_indicator(&self) -> &'static str {
        match self {
            AuthError::TokenExpired => "expired-token",
            AuthError::AccessDenied => "access-denied",
            AuthError::TokenNotFound | AuthError::IdentityNotFound => "invalid-token",
            _ => "server-error",
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Identity store error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Magic-link internal error");
            }
            AuthError::SignatureInvalid => {
                tracing::warn!("Webhook signature verification failed");
            }
            AuthError::TokenNotFound => {
                tracing::warn!("Redemption attempt with unknown token");
            }
            AuthError::AccessDenied => {
                tracing::warn!("Sign-in attempt without platform access");
            }
            _ => {
                tracing::debug!(error = %self, "Magic-link auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_match_contract() {
        assert_eq!(AuthError::IdentityNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AuthError::TokenNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AuthError::TokenExpired.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AuthError::AccessDenied.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AuthError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::SignatureInvalid.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::MissingField("email").status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_token_failures_have_distinct_actions() {
        // Expired/unknown tokens tell the user to request a new link,
        // access denial sends them to support.
        assert_eq!(
            AuthError::TokenExpired.to_app_error().action(),
            Some("Request a new login link")
        );
        assert_eq!(
            AuthError::AccessDenied.to_app_error().action(),
            Some("Contact support")
        );
    }

    #[test]
    fn test_redirect_indicators() {
        assert_eq!(AuthError::TokenNotFound.redirect_indicator(), "invalid-token");
        assert_eq!(AuthError::TokenExpired.redirect_indicator(), "expired-token");
        assert_eq!(AuthError::AccessDenied.redirect_indicator(), "access-denied");
        assert_eq!(
            AuthError::Internal("x".into()).redirect_indicator(),
            "server-error"
        );
    }
}
