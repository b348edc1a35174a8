use brigade_app::{
    database::{self, Db},
    domain::notifications::{
        NotificationsService, PgNotificationsService, records::NotificationStatus,
    },
};
use clap::Args;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CountsArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Organization UUID to aggregate
    #[arg(long)]
    org_uuid: Uuid,
}

pub(crate) async fn run(args: CountsArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgNotificationsService::new(Db::new(pool));

    let counts = service
        .counts_by_status(args.org_uuid.into())
        .await
        .map_err(|error| format!("failed to count notifications: {error}"))?;

    for status in NotificationStatus::ALL {
        println!("{status}: {}", counts.get(status));
    }

    Ok(())
}
