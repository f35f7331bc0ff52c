//! Register Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use gennessence_app::domain::users::{
    data::NewUser,
    records::{UserRole, UserStatus, UserUuid},
};

use crate::{
    extensions::*,
    state::State,
    users::{errors::into_status_error, get::UserResponse},
};

/// Register Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,

    /// `customer` (default) or `admin`
    pub role: Option<String>,
}

/// Register Handler
///
/// Creates an active account on behalf of a user.
#[endpoint(
    tags("auth"),
    summary = "Register User",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "User created"),
        (status_code = StatusCode::CONFLICT, description = "Email already registered"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RegisterRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let role = request
        .role
        .as_deref()
        .map(str::parse::<UserRole>)
        .transpose()
        .or_400("invalid role")?
        .unwrap_or(UserRole::Customer);

    let user = state
        .app
        .users
        .create_user(NewUser {
            uuid: UserUuid::new(),
            email: request.email,
            name: request.name,
            password: request.password,
            role,
            status: UserStatus::Active,
            avatar: None,
        })
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/api/users/{}", user.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(user.into()))
}
