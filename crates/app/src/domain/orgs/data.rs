//! Organization Data

use crate::domain::orgs::records::OrgUuid;

/// New Organization Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrg {
    /// UUID to assign to the organization row.
    pub uuid: OrgUuid,

    /// Organization name to persist.
    pub name: String,
}
