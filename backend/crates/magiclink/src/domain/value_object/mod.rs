//! Value Object Module

pub mod email;
pub mod identity_id;
pub mod magic_token;
pub mod provisioning_source;
