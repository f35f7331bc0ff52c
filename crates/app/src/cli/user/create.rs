use clap::Args;
use gennessence_app::domain::users::{
    PgUsersService, UsersService,
    data::NewUser,
    records::{UserRole, UserStatus, UserUuid},
};

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Login email address
    #[arg(long)]
    email: String,

    /// Display name
    #[arg(long)]
    name: String,

    /// Initial password
    #[arg(long, env = "GENNESSENCE_USER_PASSWORD", hide_env_values = true)]
    password: String,

    /// `customer` or `admin`
    #[arg(long, default_value = "customer")]
    role: UserRole,
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    let db = crate::cli::connect(&args.database_url).await?;

    let user = PgUsersService::new(db)
        .create_user(NewUser {
            uuid: UserUuid::new(),
            email: args.email,
            name: args.name,
            password: args.password,
            role: args.role,
            status: UserStatus::Active,
            avatar: None,
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("email: {}", user.email);
    println!("role: {}", user.role);

    Ok(())
}
