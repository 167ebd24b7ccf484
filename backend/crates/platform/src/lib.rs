//! Platform Infrastructure
//!
//! Framework-agnostic infrastructure shared by the backend crates:
//! - `cookie` - cookie building and parsing
//! - `crypto` - random material and hex encoding

pub mod cookie;
pub mod crypto;
