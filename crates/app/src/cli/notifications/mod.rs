use clap::{Args, Subcommand};

mod counts;
mod failed;
mod replay;

#[derive(Debug, Args)]
pub(crate) struct NotificationsCommand {
    #[command(subcommand)]
    command: NotificationsSubcommand,
}

#[derive(Debug, Subcommand)]
enum NotificationsSubcommand {
    /// List an organization's dead-lettered notifications
    Failed(failed::ListFailedArgs),

    /// Re-queue dead-lettered notifications for delivery
    Replay(replay::ReplayArgs),

    /// Show record counts per delivery status
    Counts(counts::CountsArgs),
}

pub(crate) async fn run(command: NotificationsCommand) -> Result<(), String> {
    match command.command {
        NotificationsSubcommand::Failed(args) => failed::run(args).await,
        NotificationsSubcommand::Replay(args) => replay::run(args).await,
        NotificationsSubcommand::Counts(args) => counts::run(args).await,
    }
}
