use brigade_app::{auth::PgAuthService, database};
use clap::Args;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateTokenArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Organization UUID the token is scoped to
    #[arg(long)]
    org_uuid: Uuid,

    /// Actor UUID the token acts as
    #[arg(long)]
    actor_uuid: Uuid,

    /// Token display name
    #[arg(long, default_value = "cli")]
    name: String,
}

pub(crate) async fn run(args: CreateTokenArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgAuthService::new(pool);

    let issued = service
        .issue_api_token(args.org_uuid.into(), args.actor_uuid.into(), args.name)
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    println!("token_uuid: {}", issued.record.uuid);
    println!("org_uuid: {}", issued.record.org);
    println!("actor_uuid: {}", issued.record.actor);
    println!("token_name: {}", issued.record.name);
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
