//! Audit Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query_as};

use crate::{
    auth::records::ActorUuid,
    domain::{
        audit::{
            data::NewAuditEntry,
            records::{AuditEntryRecord, AuditEntryUuid},
        },
        orgs::records::OrgUuid,
    },
};

const APPEND_AUDIT_ENTRY_SQL: &str = include_str!("sql/append_audit_entry.sql");

/// PostgreSQL-backed append-only audit log.
#[derive(Debug, Clone)]
pub(crate) struct PgAuditLogRepository {
    pool: PgPool,
}

impl PgAuditLogRepository {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn append(
        &self,
        entry: NewAuditEntry,
    ) -> Result<AuditEntryRecord, sqlx::Error> {
        query_as::<Postgres, AuditEntryRecord>(APPEND_AUDIT_ENTRY_SQL)
            .bind(entry.uuid.into_uuid())
            .bind(entry.org.into_uuid())
            .bind(entry.actor.into_uuid())
            .bind(entry.action)
            .bind(entry.subject_uuid)
            .fetch_one(&self.pool)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for AuditEntryRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: AuditEntryUuid::from_uuid(row.try_get("uuid")?),
            org: OrgUuid::from_uuid(row.try_get("org_uuid")?),
            actor: ActorUuid::from_uuid(row.try_get("actor_uuid")?),
            action: row.try_get("action")?,
            subject_uuid: row.try_get("subject_uuid")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
