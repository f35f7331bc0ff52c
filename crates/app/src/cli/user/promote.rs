use clap::Args;
use gennessence_app::domain::users::{PgUsersService, UsersService, records::UserRole};

#[derive(Debug, Args)]
pub(crate) struct PromoteUserArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Email address of the user to make an administrator
    #[arg(long)]
    email: String,
}

pub(crate) async fn run(args: PromoteUserArgs) -> Result<(), String> {
    let db = crate::cli::connect(&args.database_url).await?;
    let service = PgUsersService::new(db);

    let user = service
        .find_user_by_email(&args.email)
        .await
        .map_err(|error| format!("failed to find user {}: {error}", args.email))?;

    if user.is_admin() {
        println!("{} is already an administrator", user.email);
        return Ok(());
    }

    let user = service
        .update_user_role(user.uuid, UserRole::Admin)
        .await
        .map_err(|error| format!("failed to promote user: {error}"))?;

    println!("promoted {} ({}) to {}", user.email, user.uuid, user.role);

    Ok(())
}
