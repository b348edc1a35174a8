//! API Token Data

use crate::{
    auth::records::{ActorUuid, ApiTokenUuid},
    domain::orgs::records::OrgUuid,
};

/// New API Token Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewApiToken {
    /// UUID to assign to the token row.
    pub uuid: ApiTokenUuid,

    /// Organization the token is scoped to.
    pub org: OrgUuid,

    /// Actor the token acts as.
    pub actor: ActorUuid,

    /// Token display name.
    pub name: String,

    /// Hash of the raw secret; the secret itself is never stored.
    pub token_hash: String,
}
