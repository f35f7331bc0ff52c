//! Server configuration module

use clap::Parser;
use jiff::SignedDuration;
use thiserror::Error;

use gennessence_app::{
    auth::{TokenVerifier, VerifierError},
    context::AppSettings,
};

use crate::config::{
    auth::AuthConfig,
    db::DatabaseConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    payments::PaymentGatewayArgs,
    server::ServerRuntimeConfig,
};

pub(crate) mod auth;
pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod payments;
pub(crate) mod server;

/// Configuration values that parse but cannot be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The token signing secret was rejected.
    #[error("invalid AUTH_TOKEN_SECRET: {0}")]
    TokenSecret(#[from] VerifierError),

    /// The session lifetime is out of range.
    #[error("AUTH_TOKEN_TTL_HOURS must be between 1 and {max}", max = auth::MAX_TOKEN_TTL_HOURS)]
    TokenTtl,
}

/// Gennessence JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "gennessence-json", about = "Gennessence JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Observability (traces/metrics) settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Bearer token settings.
    #[command(flatten)]
    pub auth: AuthConfig,

    /// Payment gateway settings.
    #[command(flatten)]
    pub payments: PaymentGatewayArgs,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Settings for building the application services.
    ///
    /// # Errors
    ///
    /// Returns an error when the token secret or lifetime is unusable.
    pub fn app_settings(&self) -> Result<AppSettings, ConfigError> {
        if !(1..=auth::MAX_TOKEN_TTL_HOURS).contains(&self.auth.auth_token_ttl_hours) {
            return Err(ConfigError::TokenTtl);
        }

        Ok(AppSettings {
            database_url: self.database.database_url.clone(),
            run_migrations: self.database.run_migrations,
            token_verifier: TokenVerifier::new(&self.auth.auth_token_secret)?,
            session_ttl: SignedDuration::from_hours(self.auth.auth_token_ttl_hours),
            payment_gateway: self.payments.gateway_config(),
        })
    }
}
