//! Application Layer
//!
//! Use cases and application services.

pub mod check_session;
pub mod config;
pub mod issue_session;
pub mod issue_token;
pub mod provision;
pub mod redeem_token;

// Re-exports
pub use check_session::CheckSessionUseCase;
pub use config::{Environment, MagicLinkConfig};
pub use issue_session::{SessionCookies, clear_session, issue_session};
pub use issue_token::{IssueTokenInput, IssueTokenOutput, IssueTokenUseCase};
pub use provision::{ProvisionOutput, ProvisionUseCase, WebhookEvent, sign_body, verify_signature};
pub use redeem_token::RedeemTokenUseCase;
