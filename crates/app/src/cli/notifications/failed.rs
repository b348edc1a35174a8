use brigade_app::{
    database::{self, Db},
    domain::notifications::{NotificationsService, PgNotificationsService},
};
use clap::Args;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct ListFailedArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Organization UUID whose failed notifications should be listed
    #[arg(long)]
    org_uuid: Uuid,

    /// Maximum number of records to return
    #[arg(long)]
    limit: Option<u32>,
}

pub(crate) async fn run(args: ListFailedArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgNotificationsService::new(Db::new(pool));

    let records = service
        .list_failed(args.org_uuid.into(), args.limit)
        .await
        .map_err(|error| format!("failed to list notifications: {error}"))?;

    if records.is_empty() {
        println!("no failed notifications for org {}", args.org_uuid);
        return Ok(());
    }

    for record in records {
        println!("notification_uuid: {}", record.uuid);
        println!("action: {}", record.action);
        println!("target: {}", record.target);
        println!("attempts: {}", record.attempts);
        println!(
            "last_error: {}",
            record.last_error.as_deref().unwrap_or("none")
        );
        println!("created_at: {}", record.created_at);
        println!();
    }

    Ok(())
}
