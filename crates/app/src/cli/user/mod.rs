use clap::{Args, Subcommand};

mod create;
mod promote;

#[derive(Debug, Args)]
pub(crate) struct UserCommand {
    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Debug, Subcommand)]
enum UserSubcommand {
    /// Create an account, optionally as an admin
    Create(create::CreateUserArgs),
    /// Grant the admin role to an existing account
    Promote(promote::PromoteUserArgs),
}

pub(crate) async fn run(command: UserCommand) -> Result<(), String> {
    match command.command {
        UserSubcommand::Create(args) => create::run(args).await,
        UserSubcommand::Promote(args) => promote::run(args).await,
    }
}
