//! Audit Data

use uuid::Uuid;

use crate::{
    auth::records::ActorUuid,
    domain::{audit::records::AuditEntryUuid, orgs::records::OrgUuid},
};

/// New Audit Entry Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditEntry {
    /// UUID to assign to the entry row.
    pub uuid: AuditEntryUuid,

    /// Organization the audited operation was scoped to.
    pub org: OrgUuid,

    /// Actor who performed the operation.
    pub actor: ActorUuid,

    /// Dotted action name.
    pub action: String,

    /// UUID of the record the operation touched.
    pub subject_uuid: Uuid,
}
