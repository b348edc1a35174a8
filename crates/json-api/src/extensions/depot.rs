//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use brigade_app::{auth::records::ActorUuid, domain::orgs::records::OrgUuid};

const ORG_UUID_KEY: &str = "brigade.org_uuid";
const ACTOR_UUID_KEY: &str = "brigade.actor_uuid";

/// Helpers for stashing request scope and mapping extraction failures to
/// HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;
    fn insert_org_uuid(&mut self, org: OrgUuid);
    fn insert_actor_uuid(&mut self, actor: ActorUuid);
    fn org_uuid_or_401(&self) -> Result<OrgUuid, StatusError>;
    fn actor_uuid_or_401(&self) -> Result<ActorUuid, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_org_uuid(&mut self, org: OrgUuid) {
        self.insert(ORG_UUID_KEY, org);
    }

    fn insert_actor_uuid(&mut self, actor: ActorUuid) {
        self.insert(ACTOR_UUID_KEY, actor);
    }

    fn org_uuid_or_401(&self) -> Result<OrgUuid, StatusError> {
        self.get::<OrgUuid>(ORG_UUID_KEY)
            .copied()
            .map_err(|_ignored| StatusError::unauthorized())
    }

    fn actor_uuid_or_401(&self) -> Result<ActorUuid, StatusError> {
        self.get::<ActorUuid>(ACTOR_UUID_KEY)
            .copied()
            .map_err(|_ignored| StatusError::unauthorized())
    }
}
