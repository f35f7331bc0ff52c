//! App Context

use std::sync::Arc;

use jiff::SignedDuration;
use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService, TokenVerifier},
    database::{self, Db},
    domain::{
        carts::{CartsService, PgCartsService},
        orders::{OrdersService, PgOrdersService},
        payments::{PaymentGatewayConfig, PaymentsService, PgPaymentsService},
        products::{PgProductsService, ProductsService},
        reports::{PgReportsService, ReportsService},
        users::{PgUsersService, UsersService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrate(#[source] sqlx::migrate::MigrateError),
}

/// Settings needed to build the services.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub database_url: String,
    /// Apply pending migrations before serving.
    pub run_migrations: bool,
    pub token_verifier: TokenVerifier,
    pub session_ttl: SignedDuration,
    pub payment_gateway: PaymentGatewayConfig,
}

#[derive(Clone)]
pub struct AppContext {
    pub users: Arc<dyn UsersService>,
    pub auth: Arc<dyn AuthService>,
    pub products: Arc<dyn ProductsService>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub reports: Arc<dyn ReportsService>,
    pub payments: Arc<dyn PaymentsService>,
}

impl AppContext {
    /// Build application context from its settings.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or applying
    /// migrations fails.
    pub async fn from_settings(settings: AppSettings) -> Result<Self, AppInitError> {
        let pool = database::connect(&settings.database_url)
            .await
            .map_err(AppInitError::Database)?;

        if settings.run_migrations {
            database::migrate(&pool)
                .await
                .map_err(AppInitError::Migrate)?;
        }

        let db = Db::new(pool);

        Ok(Self {
            users: Arc::new(PgUsersService::new(db.clone())),
            auth: Arc::new(
                PgAuthService::new(db.clone(), settings.token_verifier)
                    .with_session_ttl(settings.session_ttl),
            ),
            products: Arc::new(PgProductsService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db.clone())),
            reports: Arc::new(PgReportsService::new(db.clone())),
            payments: Arc::new(PgPaymentsService::new(db, settings.payment_gateway)),
        })
    }
}
