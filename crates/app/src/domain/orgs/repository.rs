//! Organizations Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query_as};

use crate::domain::orgs::{
    data::NewOrg,
    records::{OrgRecord, OrgUuid},
};

const CREATE_ORG_SQL: &str = include_str!("sql/create_org.sql");

/// PostgreSQL-backed organizations repository.
#[derive(Debug, Clone)]
pub(crate) struct PgOrgsRepository {
    pool: PgPool,
}

impl PgOrgsRepository {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn create_org(&self, org: NewOrg) -> Result<OrgRecord, sqlx::Error> {
        query_as::<Postgres, OrgRecord>(CREATE_ORG_SQL)
            .bind(org.uuid.into_uuid())
            .bind(org.name)
            .fetch_one(&self.pool)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrgRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrgUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
