use clap::{Parser, Subcommand};
use gennessence_app::{
    auth::{PgAuthService, TokenVerifier},
    database::{self, Db},
};

mod db;
mod token;
mod user;

#[derive(Debug, Parser)]
#[command(name = "gennessence-app", about = "Gennessence CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Manage shop accounts
    User(user::UserCommand),
    /// Issue and revoke API bearer tokens
    Token(token::TokenCommand),
    /// Database maintenance
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::User(command) => user::run(command).await,
            Commands::Token(command) => token::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}

async fn connect(database_url: &str) -> Result<Db, String> {
    database::connect(database_url)
        .await
        .map(Db::new)
        .map_err(|error| format!("failed to connect to database: {error}"))
}

async fn auth_service(database_url: &str, token_secret: &str) -> Result<PgAuthService, String> {
    let verifier = TokenVerifier::new(token_secret)
        .map_err(|error| format!("invalid token secret: {error}"))?;

    Ok(PgAuthService::new(connect(database_url).await?, verifier))
}
