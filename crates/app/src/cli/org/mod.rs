use clap::{Args, Subcommand};

mod create;

#[derive(Debug, Args)]
pub(crate) struct OrgCommand {
    #[command(subcommand)]
    command: OrgSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrgSubcommand {
    Create(create::CreateOrgArgs),
}

pub(crate) async fn run(command: OrgCommand) -> Result<(), String> {
    match command.command {
        OrgSubcommand::Create(args) => create::run(args).await,
    }
}
