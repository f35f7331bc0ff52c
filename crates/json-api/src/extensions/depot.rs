//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use gennessence_app::auth::AuthenticatedUser;

const CURRENT_USER_DEPOT_KEY: &str = "current_user";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// Store the user a request was authenticated as.
    fn insert_current_user(&mut self, user: AuthenticatedUser);

    /// The authenticated user, or 401 when the request carried no valid token.
    fn current_user_or_401(&self) -> Result<AuthenticatedUser, StatusError>;

    /// The authenticated user when they are an administrator, otherwise 401
    /// or 403.
    fn admin_or_403(&self) -> Result<AuthenticatedUser, StatusError> {
        let user = self.current_user_or_401()?;

        if !user.is_admin() {
            return Err(StatusError::forbidden().brief("Administrator access required"));
        }

        Ok(user)
    }
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_current_user(&mut self, user: AuthenticatedUser) {
        self.insert(CURRENT_USER_DEPOT_KEY, user);
    }

    fn current_user_or_401(&self) -> Result<AuthenticatedUser, StatusError> {
        self.get::<AuthenticatedUser>(CURRENT_USER_DEPOT_KEY)
            .copied()
            .map_err(|_ignored| StatusError::unauthorized())
    }
}
