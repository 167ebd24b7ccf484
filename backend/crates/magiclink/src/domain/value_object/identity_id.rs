//! Identity ID Value Object

use kernel::id::Id;

/// Marker for identity record IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdentityMarker;

/// Typed identity record ID
pub type IdentityId = Id<IdentityMarker>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_id_new() {
        let identity_id = IdentityId::new();
        let uuid = identity_id.as_uuid();
        assert_eq!(uuid.get_version_num(), 4); // UUIDv4
    }

    #[test]
    fn test_from_uuid() {
        let uuid = uuid::Uuid::new_v4();
        let identity_id = IdentityId::from_uuid(uuid);
        assert_eq!(identity_id.as_uuid(), &uuid);
    }
}
