//! Magic-Link Authentication Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, store trait
//! - `application/` - Use cases and application services
//! - `infra/` - Identity store implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Passwordless sign-in via single-use emailed login links
//! - Webhook-driven identity provisioning (marketing-platform purchases)
//! - Dual session cookies: HttpOnly server cookie + client-readable flag
//! - Per-request session re-validation against the live identity record
//!
//! ## Security Model
//! - Tokens carry 256 bits of CSPRNG entropy, stored and compared verbatim
//! - Redemption is an atomic conditional claim (no double-spend)
//! - Webhook bodies are HMAC-SHA256 signed with a shared secret
//! - Access flags are authoritative on every request; revocation is immediate

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{Environment, MagicLinkConfig};
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgIdentityStore;
pub use presentation::router::magiclink_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::domain::repository::IdentityStore;
    pub use crate::infra::memory::MemoryIdentityStore;
    pub use crate::infra::postgres::PgIdentityStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
