//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use brigade_app::{
    auth::{MockAuthService, records::ActorUuid},
    context::AppContext,
    domain::{
        notifications::{
            MockNotificationsService,
            data::ReplayOutcome,
            records::{NotificationRecord, NotificationStatus, NotificationUuid},
        },
        orgs::records::OrgUuid,
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_ORG_UUID: OrgUuid = OrgUuid::from_uuid(Uuid::nil());
pub(crate) const TEST_ACTOR_UUID: ActorUuid = ActorUuid::from_uuid(Uuid::max());

#[salvo::handler]
pub(crate) async fn inject_session(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_org_uuid(TEST_ORG_UUID);
    depot.insert_actor_uuid(TEST_ACTOR_UUID);
    ctrl.call_next(req, depot, res).await;
}

fn strict_auth_mock() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_authenticate_bearer().never();

    auth
}

/// A notifications mock whose every operation defaults to `never()`;
/// individual tests override the expectations they need.
pub(crate) fn strict_notifications_mock() -> MockNotificationsService {
    let mut notifications = MockNotificationsService::new();

    notifications.expect_enqueue().never();
    notifications.expect_mark_sent().never();
    notifications.expect_mark_failed().never();
    notifications.expect_list_failed().never();
    notifications.expect_replay().never();
    notifications.expect_replay_many().never();
    notifications.expect_counts_by_status().never();

    notifications
}

fn app_context(notifications: MockNotificationsService, auth: MockAuthService) -> AppContext {
    AppContext {
        notifications: Arc::new(notifications),
        auth: Arc::new(auth),
    }
}

pub(crate) fn state_with_notifications(notifications: MockNotificationsService) -> Arc<State> {
    Arc::new(State::new(app_context(notifications, strict_auth_mock())))
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    Arc::new(State::new(app_context(MockNotificationsService::new(), auth)))
}

pub(crate) fn notifications_service(
    notifications: MockNotificationsService,
    route: Router,
) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_notifications(notifications)))
            .hoop(inject_session)
            .push(route),
    )
}

pub(crate) fn make_failed_notification(uuid: NotificationUuid) -> NotificationRecord {
    NotificationRecord {
        uuid,
        org: TEST_ORG_UUID,
        action: "order.created".to_string(),
        target: "branch:downtown".to_string(),
        status: NotificationStatus::Failed,
        attempts: 3,
        last_error: Some("delivery timed out".to_string()),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_replay_outcome(uuid: NotificationUuid) -> ReplayOutcome {
    ReplayOutcome {
        uuid,
        success: true,
        new_status: NotificationStatus::Pending,
        attempts: 0,
        error: None,
    }
}
