//! Audit Records

use jiff::Timestamp;
use uuid::Uuid;

use crate::{auth::records::ActorUuid, domain::orgs::records::OrgUuid, uuids::TypedUuid};

/// Audit Entry UUID
pub type AuditEntryUuid = TypedUuid<AuditEntryRecord>;

/// Audit Entry Record
#[derive(Debug, Clone)]
pub struct AuditEntryRecord {
    /// Unique entry identifier.
    pub uuid: AuditEntryUuid,

    /// Organization the audited operation was scoped to.
    pub org: OrgUuid,

    /// Actor who performed the operation.
    pub actor: ActorUuid,

    /// Dotted action name, e.g. `notification.replay`.
    pub action: String,

    /// UUID of the record the operation touched.
    pub subject_uuid: Uuid,

    /// Entry creation timestamp.
    pub created_at: Timestamp,
}
