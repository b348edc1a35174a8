//! Notifications service.
//!
//! Owns the only status transition the outbox itself produces (replaying a
//! FAILED record back to PENDING), plus the write surface the delivery
//! pipeline uses and the per-organization status aggregation.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::warn;

use crate::{
    auth::records::ActorUuid,
    database::Db,
    domain::{
        audit::{data::NewAuditEntry, records::AuditEntryUuid, repository::PgAuditLogRepository},
        notifications::{
            data::{NewNotification, ReplayOutcome},
            errors::NotificationsServiceError,
            records::{NotificationRecord, NotificationStatus, NotificationUuid, StatusCounts},
            repository::PgNotificationsRepository,
        },
        orgs::records::OrgUuid,
    },
};

/// Maximum failed records returned when the caller gives no explicit limit.
pub const DEFAULT_FAILED_LIMIT: u32 = 50;

/// Audit action recorded for each successful replay.
const REPLAY_AUDIT_ACTION: &str = "notification.replay";

#[derive(Debug, Clone)]
pub struct PgNotificationsService {
    db: Db,
    repository: PgNotificationsRepository,
    audit: PgAuditLogRepository,
}

impl PgNotificationsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        let audit = PgAuditLogRepository::new(db.pool().clone());

        Self {
            db,
            repository: PgNotificationsRepository::new(),
            audit,
        }
    }

    /// Fetch a record and enforce ownership, in that order: a missing record
    /// is `NotFound`, a foreign one is `Forbidden`.
    async fn find_owned(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        org: OrgUuid,
        notification: NotificationUuid,
    ) -> Result<NotificationRecord, NotificationsServiceError> {
        let record = self.repository.find_notification(tx, notification).await?;

        if record.org != org {
            return Err(NotificationsServiceError::Forbidden);
        }

        Ok(record)
    }

    /// A failed audit write never fails the replay it describes.
    async fn record_replay_audit(
        &self,
        org: OrgUuid,
        actor: ActorUuid,
        notification: NotificationUuid,
    ) {
        let entry = NewAuditEntry {
            uuid: AuditEntryUuid::new(),
            org,
            actor,
            action: REPLAY_AUDIT_ACTION.to_string(),
            subject_uuid: notification.into_uuid(),
        };

        if let Err(error) = self.audit.append(entry).await {
            warn!("failed to record replay audit entry for notification {notification}: {error}");
        }
    }
}

#[async_trait]
impl NotificationsService for PgNotificationsService {
    async fn enqueue(
        &self,
        org: OrgUuid,
        notification: NewNotification,
    ) -> Result<NotificationRecord, NotificationsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let created = self
            .repository
            .create_notification(&mut tx, org, notification)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn mark_sent(
        &self,
        org: OrgUuid,
        notification: NotificationUuid,
    ) -> Result<NotificationRecord, NotificationsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.find_owned(&mut tx, org, notification).await?;

        if !record.status.is_deliverable() {
            return Err(NotificationsServiceError::InvalidState);
        }

        let Some(updated) = self.repository.mark_sent(&mut tx, notification).await? else {
            return Err(NotificationsServiceError::InvalidState);
        };

        tx.commit().await?;

        Ok(updated)
    }

    async fn mark_failed(
        &self,
        org: OrgUuid,
        notification: NotificationUuid,
        error: String,
    ) -> Result<NotificationRecord, NotificationsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.find_owned(&mut tx, org, notification).await?;

        if !record.status.is_deliverable() {
            return Err(NotificationsServiceError::InvalidState);
        }

        let Some(updated) = self
            .repository
            .mark_failed(&mut tx, notification, &error)
            .await?
        else {
            return Err(NotificationsServiceError::InvalidState);
        };

        tx.commit().await?;

        Ok(updated)
    }

    async fn list_failed(
        &self,
        org: OrgUuid,
        limit: Option<u32>,
    ) -> Result<Vec<NotificationRecord>, NotificationsServiceError> {
        let limit = limit.unwrap_or(DEFAULT_FAILED_LIMIT);

        let mut tx = self.db.begin_transaction().await?;

        let records = self.repository.list_failed(&mut tx, org, limit).await?;

        tx.commit().await?;

        Ok(records)
    }

    async fn replay(
        &self,
        org: OrgUuid,
        notification: NotificationUuid,
        actor: ActorUuid,
    ) -> Result<ReplayOutcome, NotificationsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.find_owned(&mut tx, org, notification).await?;

        if record.status != NotificationStatus::Failed {
            return Err(NotificationsServiceError::InvalidState);
        }

        // The update re-checks the status, so a concurrent replay of the same
        // record cannot reset it twice; the loser matches no rows.
        let Some(reset) = self.repository.reset_failed(&mut tx, notification).await? else {
            return Err(NotificationsServiceError::InvalidState);
        };

        tx.commit().await?;

        self.record_replay_audit(org, actor, notification).await;

        Ok(ReplayOutcome::replayed(&reset))
    }

    async fn replay_many(
        &self,
        org: OrgUuid,
        notifications: Vec<NotificationUuid>,
        actor: ActorUuid,
    ) -> Result<Vec<ReplayOutcome>, NotificationsServiceError> {
        let mut outcomes = Vec::with_capacity(notifications.len());

        // Items run sequentially and a failure never aborts the batch: the
        // caller gets one outcome per input id, in input order.
        for notification in notifications {
            let outcome = match self.replay(org, notification, actor).await {
                Ok(outcome) => outcome,
                Err(error) => ReplayOutcome::rejected(notification, &error),
            };

            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    async fn counts_by_status(
        &self,
        org: OrgUuid,
    ) -> Result<StatusCounts, NotificationsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let counts = self.repository.count_by_status(&mut tx, org).await?;

        tx.commit().await?;

        Ok(counts)
    }
}

#[automock]
#[async_trait]
pub trait NotificationsService: Send + Sync {
    /// Enqueue a new notification in PENDING with zero attempts.
    async fn enqueue(
        &self,
        org: OrgUuid,
        notification: NewNotification,
    ) -> Result<NotificationRecord, NotificationsServiceError>;

    /// Record a successful delivery: PENDING/RETRYING → SENT, attempts + 1.
    async fn mark_sent(
        &self,
        org: OrgUuid,
        notification: NotificationUuid,
    ) -> Result<NotificationRecord, NotificationsServiceError>;

    /// Record an exhausted delivery: PENDING/RETRYING → FAILED, attempts + 1,
    /// `last_error` set.
    async fn mark_failed(
        &self,
        org: OrgUuid,
        notification: NotificationUuid,
        error: String,
    ) -> Result<NotificationRecord, NotificationsServiceError>;

    /// Up to `limit` (default 50) FAILED records for the organization,
    /// newest-created-first.
    async fn list_failed(
        &self,
        org: OrgUuid,
        limit: Option<u32>,
    ) -> Result<Vec<NotificationRecord>, NotificationsServiceError>;

    /// Re-queue one FAILED record: status back to PENDING, attempts reset to
    /// zero, `last_error` cleared. At most one of any set of concurrent
    /// replays of the same record succeeds.
    async fn replay(
        &self,
        org: OrgUuid,
        notification: NotificationUuid,
        actor: ActorUuid,
    ) -> Result<ReplayOutcome, NotificationsServiceError>;

    /// Replay each id independently, in order. Per-item failures become
    /// failed outcomes; the batch itself never aborts.
    async fn replay_many(
        &self,
        org: OrgUuid,
        notifications: Vec<NotificationUuid>,
        actor: ActorUuid,
    ) -> Result<Vec<ReplayOutcome>, NotificationsServiceError>;

    /// Record counts per status for the organization, every status present.
    async fn counts_by_status(
        &self,
        org: OrgUuid,
    ) -> Result<StatusCounts, NotificationsServiceError>;
}

#[cfg(test)]
mod tests {
    use sqlx::query_scalar;
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn enqueue_starts_pending_with_zero_attempts() -> TestResult {
        let ctx = TestContext::new().await;

        let record = ctx
            .notifications
            .enqueue(ctx.org_uuid, ctx.new_notification("order.created"))
            .await?;

        assert_eq!(record.status, NotificationStatus::Pending);
        assert_eq!(record.attempts, 0);
        assert!(record.last_error.is_none());
        assert_eq!(record.org, ctx.org_uuid);

        Ok(())
    }

    #[tokio::test]
    async fn mark_failed_increments_attempts_and_keeps_error() -> TestResult {
        let ctx = TestContext::new().await;

        let record = ctx
            .notifications
            .enqueue(ctx.org_uuid, ctx.new_notification("order.created"))
            .await?;

        let failed = ctx
            .notifications
            .mark_failed(ctx.org_uuid, record.uuid, "delivery timed out".to_string())
            .await?;

        assert_eq!(failed.status, NotificationStatus::Failed);
        assert_eq!(failed.attempts, 1);
        assert_eq!(failed.last_error.as_deref(), Some("delivery timed out"));

        Ok(())
    }

    #[tokio::test]
    async fn mark_sent_on_failed_record_returns_invalid_state() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ctx.seed_failed(ctx.org_uuid, "order.created").await?;

        let result = ctx.notifications.mark_sent(ctx.org_uuid, uuid).await;

        assert!(
            matches!(result, Err(NotificationsServiceError::InvalidState)),
            "expected InvalidState, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn replay_resets_failed_notification() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ctx.seed_failed(ctx.org_uuid, "order.created").await?;

        let outcome = ctx
            .notifications
            .replay(ctx.org_uuid, uuid, ctx.actor_uuid)
            .await?;

        assert!(outcome.success);
        assert_eq!(outcome.uuid, uuid);
        assert_eq!(outcome.new_status, NotificationStatus::Pending);
        assert_eq!(outcome.attempts, 0);
        assert!(outcome.error.is_none());

        let record = ctx.find_notification(uuid).await?;

        assert_eq!(record.status, NotificationStatus::Pending);
        assert_eq!(record.attempts, 0);
        assert!(record.last_error.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn replay_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .notifications
            .replay(ctx.org_uuid, NotificationUuid::new(), ctx.actor_uuid)
            .await;

        assert!(
            matches!(result, Err(NotificationsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn replay_cross_org_returns_forbidden_not_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ctx.seed_failed(ctx.org_uuid, "order.created").await?;

        let org_b = ctx.create_org("Org B").await;

        let result = ctx.notifications.replay(org_b, uuid, ctx.actor_uuid).await;

        assert!(
            matches!(result, Err(NotificationsServiceError::Forbidden)),
            "expected Forbidden for cross-org replay, got {result:?}"
        );

        // The record is untouched and still replayable by its owner.
        let record = ctx.find_notification(uuid).await?;

        assert_eq!(record.status, NotificationStatus::Failed);
        assert_eq!(record.attempts, 1);

        Ok(())
    }

    #[tokio::test]
    async fn replay_non_failed_record_performs_no_write() -> TestResult {
        let ctx = TestContext::new().await;

        let record = ctx
            .notifications
            .enqueue(ctx.org_uuid, ctx.new_notification("order.created"))
            .await?;

        let sent = ctx.notifications.mark_sent(ctx.org_uuid, record.uuid).await?;

        let result = ctx
            .notifications
            .replay(ctx.org_uuid, record.uuid, ctx.actor_uuid)
            .await;

        assert!(
            matches!(result, Err(NotificationsServiceError::InvalidState)),
            "expected InvalidState, got {result:?}"
        );

        let unchanged = ctx.find_notification(record.uuid).await?;

        assert_eq!(unchanged.status, NotificationStatus::Sent);
        assert_eq!(unchanged.attempts, sent.attempts);
        assert_eq!(unchanged.last_error, sent.last_error);

        Ok(())
    }

    #[tokio::test]
    async fn replay_retrying_record_returns_invalid_state() -> TestResult {
        let ctx = TestContext::new().await;

        let record = ctx
            .notifications
            .enqueue(ctx.org_uuid, ctx.new_notification("order.created"))
            .await?;

        // RETRYING is reachable only through the delivery pipeline; emulate it.
        sqlx::query("UPDATE notifications SET status = 'RETRYING', attempts = 2 WHERE uuid = $1")
            .bind(record.uuid.into_uuid())
            .execute(ctx.db.pool())
            .await?;

        let result = ctx
            .notifications
            .replay(ctx.org_uuid, record.uuid, ctx.actor_uuid)
            .await;

        assert!(
            matches!(result, Err(NotificationsServiceError::InvalidState)),
            "expected InvalidState, got {result:?}"
        );

        let unchanged = ctx.find_notification(record.uuid).await?;

        assert_eq!(unchanged.status, NotificationStatus::Retrying);
        assert_eq!(unchanged.attempts, 2);

        Ok(())
    }

    #[tokio::test]
    async fn second_replay_returns_invalid_state() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ctx.seed_failed(ctx.org_uuid, "order.created").await?;

        ctx.notifications
            .replay(ctx.org_uuid, uuid, ctx.actor_uuid)
            .await?;

        let result = ctx
            .notifications
            .replay(ctx.org_uuid, uuid, ctx.actor_uuid)
            .await;

        assert!(
            matches!(result, Err(NotificationsServiceError::InvalidState)),
            "expected InvalidState on duplicate replay, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_replays_reset_exactly_once() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ctx.seed_failed(ctx.org_uuid, "order.created").await?;

        let (first, second) = tokio::join!(
            ctx.notifications.replay(ctx.org_uuid, uuid, ctx.actor_uuid),
            ctx.notifications.replay(ctx.org_uuid, uuid, ctx.actor_uuid),
        );

        let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();

        assert_eq!(successes, 1, "exactly one concurrent replay may win");

        let loser = if first.is_ok() { second } else { first };

        assert!(
            matches!(loser, Err(NotificationsServiceError::InvalidState)),
            "the losing replay must observe InvalidState, got {loser:?}"
        );

        let record = ctx.find_notification(uuid).await?;

        assert_eq!(record.status, NotificationStatus::Pending);
        assert_eq!(record.attempts, 0);

        Ok(())
    }

    #[tokio::test]
    async fn replay_writes_an_audit_entry() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ctx.seed_failed(ctx.org_uuid, "order.created").await?;

        ctx.notifications
            .replay(ctx.org_uuid, uuid, ctx.actor_uuid)
            .await?;

        let entries: i64 = query_scalar(
            "SELECT COUNT(*) FROM audit_log \
             WHERE subject_uuid = $1 AND actor_uuid = $2 AND action = 'notification.replay'",
        )
        .bind(uuid.into_uuid())
        .bind(ctx.actor_uuid.into_uuid())
        .fetch_one(ctx.db.pool())
        .await?;

        assert_eq!(entries, 1);

        Ok(())
    }

    #[tokio::test]
    async fn failed_replay_writes_no_audit_entry() -> TestResult {
        let ctx = TestContext::new().await;

        let record = ctx
            .notifications
            .enqueue(ctx.org_uuid, ctx.new_notification("order.created"))
            .await?;

        let result = ctx
            .notifications
            .replay(ctx.org_uuid, record.uuid, ctx.actor_uuid)
            .await;

        assert!(result.is_err(), "replaying a PENDING record must fail");

        let entries: i64 = query_scalar("SELECT COUNT(*) FROM audit_log WHERE subject_uuid = $1")
            .bind(record.uuid.into_uuid())
            .fetch_one(ctx.db.pool())
            .await?;

        assert_eq!(entries, 0);

        Ok(())
    }

    #[tokio::test]
    async fn replay_many_reports_partial_success_in_order() -> TestResult {
        let ctx = TestContext::new().await;

        let valid_a = ctx.seed_failed(ctx.org_uuid, "order.created").await?;
        let unknown = NotificationUuid::new();
        let valid_b = ctx.seed_failed(ctx.org_uuid, "invoice.issued").await?;

        let outcomes = ctx
            .notifications
            .replay_many(ctx.org_uuid, vec![valid_a, unknown, valid_b], ctx.actor_uuid)
            .await?;

        let uuids: Vec<_> = outcomes.iter().map(|o| o.uuid).collect();
        let flags: Vec<_> = outcomes.iter().map(|o| o.success).collect();

        assert_eq!(uuids, vec![valid_a, unknown, valid_b]);
        assert_eq!(flags, vec![true, false, true]);

        let failed: Vec<_> = outcomes.iter().filter(|o| !o.success).collect();

        for outcome in failed {
            assert_eq!(outcome.new_status, NotificationStatus::Failed);
            assert_eq!(outcome.attempts, 0);
            assert_eq!(outcome.error.as_deref(), Some("notification not found"));
        }

        Ok(())
    }

    #[tokio::test]
    async fn replay_many_converts_cross_org_items_to_failed_outcomes() -> TestResult {
        let ctx = TestContext::new().await;
        let org_b = ctx.create_org("Org B").await;

        let foreign = ctx.seed_failed(ctx.org_uuid, "order.created").await?;
        let owned = ctx.seed_failed(org_b, "order.created").await?;

        let outcomes = ctx
            .notifications
            .replay_many(org_b, vec![foreign, owned], ctx.actor_uuid)
            .await?;

        let flags: Vec<_> = outcomes.iter().map(|o| o.success).collect();

        assert_eq!(flags, vec![false, true]);

        let first = outcomes.first().ok_or("missing first outcome")?;

        assert_eq!(
            first.error.as_deref(),
            Some("notification belongs to a different organization")
        );

        Ok(())
    }

    #[tokio::test]
    async fn replay_many_with_no_ids_returns_no_outcomes() -> TestResult {
        let ctx = TestContext::new().await;

        let outcomes = ctx
            .notifications
            .replay_many(ctx.org_uuid, vec![], ctx.actor_uuid)
            .await?;

        assert!(outcomes.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn list_failed_returns_only_failed_records_newest_first() -> TestResult {
        let ctx = TestContext::new().await;

        let older = ctx.seed_failed(ctx.org_uuid, "order.created").await?;
        let newer = ctx.seed_failed(ctx.org_uuid, "invoice.issued").await?;

        // A PENDING record must not appear.
        ctx.notifications
            .enqueue(ctx.org_uuid, ctx.new_notification("table.booked"))
            .await?;

        let records = ctx.notifications.list_failed(ctx.org_uuid, None).await?;

        let uuids: Vec<_> = records.iter().map(|r| r.uuid).collect();

        assert_eq!(uuids, vec![newer, older]);

        Ok(())
    }

    #[tokio::test]
    async fn list_failed_respects_limit() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.seed_failed(ctx.org_uuid, "order.created").await?;
        ctx.seed_failed(ctx.org_uuid, "invoice.issued").await?;
        let newest = ctx.seed_failed(ctx.org_uuid, "table.booked").await?;

        let records = ctx
            .notifications
            .list_failed(ctx.org_uuid, Some(1))
            .await?;

        let uuids: Vec<_> = records.iter().map(|r| r.uuid).collect();

        assert_eq!(uuids, vec![newest]);

        Ok(())
    }

    #[tokio::test]
    async fn list_failed_is_scoped_to_the_org() -> TestResult {
        let ctx = TestContext::new().await;
        let org_b = ctx.create_org("Org B").await;

        ctx.seed_failed(ctx.org_uuid, "order.created").await?;

        let records = ctx.notifications.list_failed(org_b, None).await?;

        assert!(records.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn counts_by_status_empty_org_returns_all_zeroes() -> TestResult {
        let ctx = TestContext::new().await;

        let counts = ctx.notifications.counts_by_status(ctx.org_uuid).await?;

        assert_eq!(counts, StatusCounts::default());

        Ok(())
    }

    #[tokio::test]
    async fn counts_by_status_reflects_record_mix() -> TestResult {
        let ctx = TestContext::new().await;

        for action in ["order.created", "invoice.issued", "table.booked"] {
            ctx.seed_failed(ctx.org_uuid, action).await?;
        }

        for action in ["menu.updated", "shift.assigned"] {
            ctx.notifications
                .enqueue(ctx.org_uuid, ctx.new_notification(action))
                .await?;
        }

        let counts = ctx.notifications.counts_by_status(ctx.org_uuid).await?;

        assert_eq!(
            counts,
            StatusCounts {
                pending: 2,
                sent: 0,
                failed: 3,
                retrying: 0,
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn counts_by_status_is_scoped_to_the_org() -> TestResult {
        let ctx = TestContext::new().await;
        let org_b = ctx.create_org("Org B").await;

        ctx.seed_failed(ctx.org_uuid, "order.created").await?;

        let counts = ctx.notifications.counts_by_status(org_b).await?;

        assert_eq!(counts, StatusCounts::default());

        Ok(())
    }

    #[tokio::test]
    async fn cross_org_then_owner_replay_scenario() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ctx.seed_failed(ctx.org_uuid, "order.created").await?;

        let org_b = ctx.create_org("Org B").await;

        let foreign = ctx.notifications.replay(org_b, uuid, ctx.actor_uuid).await;

        assert!(
            matches!(foreign, Err(NotificationsServiceError::Forbidden)),
            "expected Forbidden, got {foreign:?}"
        );

        let owned = ctx
            .notifications
            .replay(ctx.org_uuid, uuid, ctx.actor_uuid)
            .await?;

        assert!(owned.success);
        assert_eq!(owned.new_status, NotificationStatus::Pending);
        assert_eq!(owned.attempts, 0);

        let again = ctx
            .notifications
            .replay(ctx.org_uuid, uuid, ctx.actor_uuid)
            .await;

        assert!(
            matches!(again, Err(NotificationsServiceError::InvalidState)),
            "expected InvalidState, got {again:?}"
        );

        Ok(())
    }
}
