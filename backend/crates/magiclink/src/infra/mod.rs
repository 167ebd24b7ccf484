//! Infrastructure Layer
//!
//! Identity store implementations: PostgreSQL for deployments, in-memory
//! for tests and local development.

pub mod memory;
pub mod postgres;
