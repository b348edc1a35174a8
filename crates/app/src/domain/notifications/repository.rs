//! Notifications Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::{
    notifications::{
        data::NewNotification,
        records::{NotificationRecord, NotificationStatus, NotificationUuid, StatusCounts},
    },
    orgs::records::OrgUuid,
};

const CREATE_NOTIFICATION_SQL: &str = include_str!("sql/create_notification.sql");
const FIND_NOTIFICATION_SQL: &str = include_str!("sql/find_notification.sql");
const LIST_FAILED_SQL: &str = include_str!("sql/list_failed.sql");
const RESET_FAILED_SQL: &str = include_str!("sql/reset_failed.sql");
const MARK_SENT_SQL: &str = include_str!("sql/mark_sent.sql");
const MARK_FAILED_SQL: &str = include_str!("sql/mark_failed.sql");
const COUNT_BY_STATUS_SQL: &str = include_str!("sql/count_by_status.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgNotificationsRepository;

impl PgNotificationsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_notification(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        org: OrgUuid,
        notification: NewNotification,
    ) -> Result<NotificationRecord, sqlx::Error> {
        query_as::<Postgres, NotificationRecord>(CREATE_NOTIFICATION_SQL)
            .bind(notification.uuid.into_uuid())
            .bind(org.into_uuid())
            .bind(notification.action)
            .bind(notification.target)
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch by UUID alone. Ownership is the service's concern: the lookup
    /// must succeed for foreign records so the caller can distinguish
    /// `Forbidden` from `NotFound`.
    pub(crate) async fn find_notification(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        notification: NotificationUuid,
    ) -> Result<NotificationRecord, sqlx::Error> {
        query_as::<Postgres, NotificationRecord>(FIND_NOTIFICATION_SQL)
            .bind(notification.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_failed(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        org: OrgUuid,
        limit: u32,
    ) -> Result<Vec<NotificationRecord>, sqlx::Error> {
        query_as::<Postgres, NotificationRecord>(LIST_FAILED_SQL)
            .bind(org.into_uuid())
            .bind(i64::from(limit))
            .fetch_all(&mut **tx)
            .await
    }

    /// Conditionally reset a FAILED record back to PENDING.
    ///
    /// The status predicate in the statement is what serializes concurrent
    /// replays of the same record: the loser re-evaluates it against the
    /// winner's committed row, matches nothing, and gets `None`.
    pub(crate) async fn reset_failed(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        notification: NotificationUuid,
    ) -> Result<Option<NotificationRecord>, sqlx::Error> {
        query_as::<Postgres, NotificationRecord>(RESET_FAILED_SQL)
            .bind(notification.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn mark_sent(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        notification: NotificationUuid,
    ) -> Result<Option<NotificationRecord>, sqlx::Error> {
        query_as::<Postgres, NotificationRecord>(MARK_SENT_SQL)
            .bind(notification.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn mark_failed(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        notification: NotificationUuid,
        error: &str,
    ) -> Result<Option<NotificationRecord>, sqlx::Error> {
        query_as::<Postgres, NotificationRecord>(MARK_FAILED_SQL)
            .bind(notification.into_uuid())
            .bind(error)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn count_by_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        org: OrgUuid,
    ) -> Result<StatusCounts, sqlx::Error> {
        let rows: Vec<(String, i64)> = query_as::<Postgres, (String, i64)>(COUNT_BY_STATUS_SQL)
            .bind(org.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        let mut counts = StatusCounts::default();

        for (status, count) in rows {
            let status = decode_status(&status)?;

            let count = u64::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
                index: "count".to_string(),
                source: Box::new(e),
            })?;

            counts.add(status, count);
        }

        Ok(counts)
    }
}

fn decode_status(status: &str) -> Result<NotificationStatus, sqlx::Error> {
    status
        .parse::<NotificationStatus>()
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: Box::new(e),
        })
}

impl<'r> FromRow<'r, PgRow> for NotificationRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;
        let attempts_i32: i32 = row.try_get("attempts")?;

        let attempts = u32::try_from(attempts_i32).map_err(|e| sqlx::Error::ColumnDecode {
            index: "attempts".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            uuid: NotificationUuid::from_uuid(row.try_get("uuid")?),
            org: OrgUuid::from_uuid(row.try_get("org_uuid")?),
            action: row.try_get("action")?,
            target: row.try_get("target")?,
            status: decode_status(&status)?,
            attempts,
            last_error: row.try_get("last_error")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
