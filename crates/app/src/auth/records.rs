//! API Token Records

use jiff::Timestamp;

use crate::{domain::orgs::records::OrgUuid, uuids::TypedUuid};

/// API Token UUID
pub type ApiTokenUuid = TypedUuid<ApiTokenRecord>;

/// Marker for actor identifiers minted by the external identity provider.
/// Actors have no table of their own; tokens carry the id they act as.
#[derive(Debug)]
pub struct Actor;

/// Actor UUID
pub type ActorUuid = TypedUuid<Actor>;

/// API Token Record
#[derive(Debug, Clone)]
pub struct ApiTokenRecord {
    /// Unique token identifier.
    pub uuid: ApiTokenUuid,

    /// Organization the token is scoped to.
    pub org: OrgUuid,

    /// Actor the token acts as.
    pub actor: ActorUuid,

    /// Token display name.
    pub name: String,

    /// Token creation timestamp.
    pub created_at: Timestamp,
}

/// Resolved request scope for an authenticated bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthSession {
    /// Organization every operation in the request is scoped to.
    pub org: OrgUuid,

    /// Actor recorded for auditing.
    pub actor: ActorUuid,
}

/// A freshly issued token with its raw secret, shown exactly once.
#[derive(Debug, Clone)]
pub struct IssuedApiToken {
    /// Raw bearer token. Never persisted.
    pub token: String,

    /// Stored token metadata.
    pub record: ApiTokenRecord,
}
