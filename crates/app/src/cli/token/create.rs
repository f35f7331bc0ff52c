use clap::Args;
use gennessence_app::domain::users::{PgUsersService, UsersService, records::UserUuid};
use jiff::Timestamp;

#[derive(Debug, Args)]
pub(crate) struct CreateTokenArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Secret API token verifiers are keyed with
    #[arg(long, env = "AUTH_TOKEN_SECRET", hide_env_values = true)]
    auth_token_secret: String,

    /// UUID of the user that should own the token
    #[arg(long, conflicts_with = "email", required_unless_present = "email")]
    user_uuid: Option<UserUuid>,

    /// Email address of the user that should own the token
    #[arg(long)]
    email: Option<String>,

    /// Optional token expiration timestamp (RFC 3339)
    #[arg(long)]
    token_expires_at: Option<String>,
}

pub(crate) async fn run(args: CreateTokenArgs) -> Result<(), String> {
    let token_expires_at = parse_token_expires_at(args.token_expires_at.as_deref())?;

    if let Some(expires_at) = token_expires_at.as_ref()
        && *expires_at <= Timestamp::now()
    {
        return Err("token-expires-at must be in the future".to_string());
    }

    let user_uuid = match (args.user_uuid, args.email) {
        (Some(user_uuid), _) => user_uuid,
        (None, Some(email)) => {
            PgUsersService::new(crate::cli::connect(&args.database_url).await?)
                .find_user_by_email(&email)
                .await
                .map_err(|error| format!("failed to find user {email}: {error}"))?
                .uuid
        }
        (None, None) => return Err("either --user-uuid or --email is required".to_string()),
    };

    let service = crate::cli::auth_service(&args.database_url, &args.auth_token_secret).await?;

    let issued = service
        .issue_api_token(user_uuid, token_expires_at)
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    println!("token_uuid: {}", issued.metadata.uuid);
    println!("user_uuid: {}", issued.metadata.user_uuid);
    println!("token_version: {}", issued.metadata.version.as_i16());
    println!("token_created_at: {}", issued.metadata.created_at);
    if let Some(expires_at) = issued.metadata.expires_at {
        println!("token_expires_at: {expires_at}");
    }
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}

fn parse_token_expires_at(raw: Option<&str>) -> Result<Option<Timestamp>, String> {
    raw.map(|value| {
        value
            .parse::<Timestamp>()
            .map_err(|error| format!("invalid token-expires-at timestamp: {error}"))
    })
    .transpose()
}
