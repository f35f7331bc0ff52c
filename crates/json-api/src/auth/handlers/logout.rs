//! Logout Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{auth::into_status_error, extensions::*, state::State};

/// Logout Handler
///
/// Revokes the token the request was made with.
#[endpoint(
    tags("auth"),
    summary = "Log Out",
    security(("bearer_auth" = [])),
    responses((status_code = StatusCode::NO_CONTENT, description = "Token revoked")),
)]
pub(crate) async fn handler(depot: &mut Depot, res: &mut Response) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let current = depot.current_user_or_401()?;

    state
        .app
        .auth
        .logout(current.token_uuid)
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::NO_CONTENT);

    Ok(())
}
