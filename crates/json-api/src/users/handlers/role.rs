//! Change User Role Handler

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

use gennessence_app::domain::users::records::UserRole;

use crate::{
    extensions::*,
    state::State,
    users::{errors::into_status_error, get::UserResponse},
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateRoleRequest {
    /// `customer` or `admin`
    pub role: String,
}

/// Change User Role Handler
#[endpoint(tags("users"), summary = "Change User Role", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    json: JsonBody<UpdateRoleRequest>,
    depot: &mut Depot,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let current = depot.current_user_or_401()?;
    let user = user.into_inner();
    let role = json.into_inner().role.parse::<UserRole>().or_400("invalid role")?;

    if current.user_uuid.into_uuid() == user && role != UserRole::Admin {
        return Err(StatusError::bad_request().brief("You cannot remove your own admin role"));
    }

    let user = state
        .app
        .users
        .update_user_role(user.into(), role)
        .await
        .map_err(into_status_error)?;

    Ok(Json(user.into()))
}
