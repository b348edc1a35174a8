use clap::{Parser, Subcommand};

mod notifications;
mod org;
mod token;

#[derive(Debug, Parser)]
#[command(name = "brigade-app", about = "Brigade CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Org(org::OrgCommand),
    Token(token::TokenCommand),
    Notifications(notifications::NotificationsCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Org(command) => org::run(command).await,
            Commands::Token(command) => token::run(command).await,
            Commands::Notifications(command) => notifications::run(command).await,
        }
    }
}
