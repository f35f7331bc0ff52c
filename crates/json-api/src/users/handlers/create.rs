//! Create User Handler

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

/// Create User Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateUserRequest {
    pub email: String,
    pub name: String,
    pub password: String,

    /// `customer` (default) or `admin`
    pub role: Option<String>,

    /// `active` (default) or `inactive`
    pub status: Option<String>,

    pub avatar: Option<String>,
}

impl CreateUserRequest {
    fn into_new_user(self) -> Result<NewUser, StatusError> {
        let role = match self.role.as_deref() {
            Some(role) => role.parse::<UserRole>().or_400("invalid role")?,
            None => UserRole::Customer,
        };

        let status = match self.status.as_deref() {
            Some(status) => status.parse::<UserStatus>().or_400("invalid status")?,
            None => UserStatus::Active,
        };

        Ok(NewUser {
            uuid: UserUuid::new(),
            email: self.email,
            name: self.name,
            password: self.password,
            role,
            status,
            avatar: self.avatar.filter(|avatar| !avatar.trim().is_empty()),
        })
    }
}

/// Create User Handler
#[endpoint(
    tags("users"),
    summary = "Create User",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "User created"),
        (status_code = StatusCode::CONFLICT, description = "Email already registered"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateUserRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let new_user = json.into_inner().into_new_user()?;

    let user = state
        .app
        .users
        .create_user(new_user)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/api/users/{}", user.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(user.into()))
}
