//! Organization Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Organization UUID
pub type OrgUuid = TypedUuid<OrgRecord>;

/// Organization Record
#[derive(Debug, Clone)]
pub struct OrgRecord {
    /// Unique organization identifier.
    pub uuid: OrgUuid,

    /// Human-readable organization name.
    pub name: String,

    /// Organization creation timestamp.
    pub created_at: Timestamp,

    /// Last update timestamp.
    pub updated_at: Timestamp,

    /// Soft-delete timestamp when deleted.
    pub deleted_at: Option<Timestamp>,
}
