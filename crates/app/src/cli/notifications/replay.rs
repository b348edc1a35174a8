use brigade_app::{
    database::{self, Db},
    domain::notifications::{NotificationsService, PgNotificationsService},
};
use clap::Args;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct ReplayArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Organization UUID the notifications belong to
    #[arg(long)]
    org_uuid: Uuid,

    /// Actor UUID recorded in the audit trail
    #[arg(long)]
    actor_uuid: Uuid,

    /// Notification UUIDs to replay, in order
    #[arg(required = true)]
    notification_uuids: Vec<Uuid>,
}

pub(crate) async fn run(args: ReplayArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgNotificationsService::new(Db::new(pool));

    let notifications = args
        .notification_uuids
        .into_iter()
        .map(Into::into)
        .collect();

    let outcomes = service
        .replay_many(args.org_uuid.into(), notifications, args.actor_uuid.into())
        .await
        .map_err(|error| format!("failed to replay notifications: {error}"))?;

    for outcome in outcomes {
        if outcome.success {
            println!("replayed {}: status {}", outcome.uuid, outcome.new_status);
        } else {
            println!(
                "failed {}: {}",
                outcome.uuid,
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}
