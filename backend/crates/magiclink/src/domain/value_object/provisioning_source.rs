//! Provisioning Source Value Object
//!
//! Records how an identity record was created. Informs display/admin
//! logic and the token expiry window, never a security decision.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// How an identity record came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum ProvisioningSource {
    /// Self-service signup
    #[default]
    #[display("direct")]
    Direct = 0,

    /// Created by an inbound marketing-platform webhook
    #[display("webhook")]
    Webhook = 1,

    /// Created by an administrator
    #[display("admin")]
    Admin = 2,
}

impl ProvisioningSource {
    /// Get numeric ID for database storage
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    /// Create from database value
    pub const fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(ProvisioningSource::Direct),
            1 => Some(ProvisioningSource::Webhook),
            2 => Some(ProvisioningSource::Admin),
            _ => None,
        }
    }

    /// Whether the identity was provisioned out-of-band (webhook/admin)
    ///
    /// Provisioned identities get the longer token window to tolerate
    /// delayed email delivery and first-login setup flows.
    #[inline]
    pub const fn is_provisioned(&self) -> bool {
        matches!(self, ProvisioningSource::Webhook | ProvisioningSource::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        for source in [
            ProvisioningSource::Direct,
            ProvisioningSource::Webhook,
            ProvisioningSource::Admin,
        ] {
            assert_eq!(ProvisioningSource::from_id(source.id()), Some(source));
        }
        assert_eq!(ProvisioningSource::from_id(99), None);
    }

    #[test]
    fn test_provisioned_sources() {
        assert!(!ProvisioningSource::Direct.is_provisioned());
        assert!(ProvisioningSource::Webhook.is_provisioned());
        assert!(ProvisioningSource::Admin.is_provisioned());
    }

    #[test]
    fn test_display() {
        assert_eq!(ProvisioningSource::Webhook.to_string(), "webhook");
    }
}
