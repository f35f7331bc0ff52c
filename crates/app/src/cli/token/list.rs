use clap::Args;
use gennessence_app::domain::users::records::UserUuid;

#[derive(Debug, Args)]
pub(crate) struct ListTokensArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Secret API token verifiers are keyed with
    #[arg(long, env = "AUTH_TOKEN_SECRET", hide_env_values = true)]
    auth_token_secret: String,

    /// UUID of the user whose tokens should be listed
    #[arg(long)]
    user_uuid: UserUuid,
}

pub(crate) async fn run(args: ListTokensArgs) -> Result<(), String> {
    let service = crate::cli::auth_service(&args.database_url, &args.auth_token_secret).await?;

    let tokens = service
        .list_api_tokens(args.user_uuid)
        .await
        .map_err(|error| format!("failed to list tokens: {error}"))?;

    if tokens.is_empty() {
        println!("no tokens found for user {}", args.user_uuid);
        return Ok(());
    }

    for token in tokens {
        println!("token_uuid: {}", token.uuid);
        println!("user_uuid: {}", token.user_uuid);
        println!("token_version: {}", token.version.as_i16());
        println!("created_at: {}", token.created_at);
        println!(
            "last_used_at: {}",
            token
                .last_used_at
                .map_or_else(|| "never".to_string(), |value| value.to_string())
        );
        println!(
            "expires_at: {}",
            token
                .expires_at
                .map_or_else(|| "none".to_string(), |value| value.to_string())
        );
        println!(
            "revoked_at: {}",
            token
                .revoked_at
                .map_or_else(|| "active".to_string(), |value| value.to_string())
        );
        println!();
    }

    Ok(())
}
