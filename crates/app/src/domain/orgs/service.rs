//! Organizations service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;

use crate::domain::orgs::{
    data::NewOrg, errors::OrgsServiceError, records::OrgRecord, repository::PgOrgsRepository,
};

#[derive(Debug, Clone)]
pub struct PgOrgsService {
    repository: PgOrgsRepository,
}

impl PgOrgsService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgOrgsRepository::new(pool),
        }
    }
}

#[async_trait]
impl OrgsService for PgOrgsService {
    async fn create_org(&self, org: NewOrg) -> Result<OrgRecord, OrgsServiceError> {
        self.repository.create_org(org).await.map_err(Into::into)
    }
}

#[automock]
#[async_trait]
/// Organization persistence operations.
pub trait OrgsService: Send + Sync {
    /// Creates a new organization.
    async fn create_org(&self, org: NewOrg) -> Result<OrgRecord, OrgsServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use testresult::TestResult;

    use crate::{domain::orgs::records::OrgUuid, test::TestContext};

    use super::*;

    #[tokio::test]
    async fn create_org_returns_correct_uuid_and_name() -> TestResult {
        let ctx = TestContext::new().await;
        let svc = PgOrgsService::new(ctx.db.pool().clone());

        let uuid = OrgUuid::new();

        let org = svc
            .create_org(NewOrg {
                uuid,
                name: "Bluefin Hospitality".to_string(),
            })
            .await?;

        assert_eq!(org.uuid, uuid);
        assert_eq!(org.name, "Bluefin Hospitality");
        assert!(org.deleted_at.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn create_org_timestamps_are_set() -> TestResult {
        let ctx = TestContext::new().await;
        let svc = PgOrgsService::new(ctx.db.pool().clone());

        let before = Timestamp::now();

        let org = svc
            .create_org(NewOrg {
                uuid: OrgUuid::new(),
                name: "Timestamp Test".to_string(),
            })
            .await?;

        let after = Timestamp::now();

        assert!(org.created_at >= before);
        assert!(org.created_at <= after);

        Ok(())
    }

    #[tokio::test]
    async fn create_org_duplicate_uuid_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;
        let svc = PgOrgsService::new(ctx.db.pool().clone());

        let uuid = OrgUuid::new();

        svc.create_org(NewOrg {
            uuid,
            name: "First".to_string(),
        })
        .await?;

        let result = svc
            .create_org(NewOrg {
                uuid,
                name: "Second".to_string(),
            })
            .await;

        assert!(
            matches!(result, Err(OrgsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_org_duplicate_name_succeeds() -> TestResult {
        let ctx = TestContext::new().await;
        let svc = PgOrgsService::new(ctx.db.pool().clone());

        // Name has no uniqueness constraint; two franchises may share a name
        svc.create_org(NewOrg {
            uuid: OrgUuid::new(),
            name: "Shared Name".to_string(),
        })
        .await?;

        svc.create_org(NewOrg {
            uuid: OrgUuid::new(),
            name: "Shared Name".to_string(),
        })
        .await?;

        Ok(())
    }
}
