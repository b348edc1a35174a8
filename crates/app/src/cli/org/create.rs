use brigade_app::{
    database,
    domain::orgs::{OrgsService, PgOrgsService, data::NewOrg},
};
use clap::Args;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateOrgArgs {
    /// Organization display name
    #[arg(long)]
    name: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Optional organization UUID; generated when omitted
    #[arg(long)]
    org_uuid: Option<Uuid>,
}

pub(crate) async fn run(args: CreateOrgArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgOrgsService::new(pool);
    let org_uuid = args.org_uuid.unwrap_or_else(Uuid::now_v7);

    let org = service
        .create_org(NewOrg {
            uuid: org_uuid.into(),
            name: args.name,
        })
        .await
        .map_err(|error| format!("failed to create organization: {error}"))?;

    println!("org_uuid: {}", org.uuid);
    println!("org_name: {}", org.name);

    Ok(())
}
