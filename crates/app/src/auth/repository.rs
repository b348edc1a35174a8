//! Auth Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query_as};

use crate::{
    auth::{
        data::NewApiToken,
        records::{ActorUuid, ApiTokenRecord, ApiTokenUuid},
    },
    domain::orgs::records::OrgUuid,
};

const CREATE_API_TOKEN_SQL: &str = include_str!("sql/create_api_token.sql");
const FIND_API_TOKEN_BY_HASH_SQL: &str = include_str!("sql/find_api_token_by_hash.sql");

/// PostgreSQL-backed API token repository.
#[derive(Debug, Clone)]
pub(crate) struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn create_api_token(
        &self,
        token: NewApiToken,
    ) -> Result<ApiTokenRecord, sqlx::Error> {
        query_as::<Postgres, ApiTokenRecord>(CREATE_API_TOKEN_SQL)
            .bind(token.uuid.into_uuid())
            .bind(token.org.into_uuid())
            .bind(token.actor.into_uuid())
            .bind(token.name)
            .bind(token.token_hash)
            .fetch_one(&self.pool)
            .await
    }

    pub(crate) async fn find_api_token_by_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<ApiTokenRecord>, sqlx::Error> {
        query_as::<Postgres, ApiTokenRecord>(FIND_API_TOKEN_BY_HASH_SQL)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ApiTokenRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ApiTokenUuid::from_uuid(row.try_get("uuid")?),
            org: OrgUuid::from_uuid(row.try_get("org_uuid")?),
            actor: ActorUuid::from_uuid(row.try_get("actor_uuid")?),
            name: row.try_get("name")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
