//! Change User Status Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gennessence_app::domain::users::records::UserStatus;

use crate::{
    extensions::*,
    state::State,
    users::{errors::into_status_error, get::UserResponse},
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateStatusRequest {
    /// `active` or `inactive`
    pub status: String,
}

/// Change User Status Handler
///
/// Inactive users cannot sign in and their tokens stop working.
#[endpoint(tags("users"), summary = "Change User Status", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    json: JsonBody<UpdateStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let current = depot.current_user_or_401()?;
    let user = user.into_inner();
    let status = json
        .into_inner()
        .status
        .parse::<UserStatus>()
        .or_400("invalid status")?;

    if current.user_uuid.into_uuid() == user && status != UserStatus::Active {
        return Err(StatusError::bad_request().brief("You cannot deactivate your own account"));
    }

    let user = state
        .app
        .users
        .update_user_status(user.into(), status)
        .await
        .map_err(into_status_error)?;

    Ok(Json(user.into()))
}
