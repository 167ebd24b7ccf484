//! Domain Layer
//!
//! Contains entities, value objects, and the identity store trait.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::identity::Identity;
pub use repository::IdentityStore;
