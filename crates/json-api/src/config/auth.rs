//! Auth Config

use clap::Args;

/// Longest accepted session lifetime, in hours.
pub(crate) const MAX_TOKEN_TTL_HOURS: i64 = 24 * 90;

/// Bearer token settings.
#[derive(Args)]
pub struct AuthConfig {
    /// Secret used to key API token verifiers
    #[arg(long, env = "AUTH_TOKEN_SECRET", hide_env_values = true)]
    pub auth_token_secret: String,

    /// Lifetime of tokens issued at login and signup, in hours
    #[arg(long, env = "AUTH_TOKEN_TTL_HOURS", default_value_t = 24)]
    pub auth_token_ttl_hours: i64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("auth_token_secret", &"**redacted**")
            .field("auth_token_ttl_hours", &self.auth_token_ttl_hours)
            .finish()
    }
}
