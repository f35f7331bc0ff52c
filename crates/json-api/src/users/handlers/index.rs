//! User Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use gennessence_app::domain::users::{
    data::UserFilter,
    records::{UserRole, UserStatus},
};

use crate::{
    extensions::*,
    state::State,
    users::{errors::into_status_error, get::UserResponse},
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UsersResponse {
    /// The requested page of users, newest first
    pub users: Vec<UserResponse>,

    /// Users matching the filters across all pages
    pub total: u64,

    pub page: u32,
    pub limit: u32,
}

/// User Index Handler
///
/// Returns one page of users matching the filters.
#[endpoint(tags("users"), summary = "List Users", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    page: QueryParam<u32, false>,
    limit: QueryParam<u32, false>,
    search: QueryParam<String, false>,
    role: QueryParam<String, false>,
    status: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<UsersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let defaults = UserFilter::default();

    let filter = UserFilter {
        page: page.into_inner().unwrap_or(defaults.page),
        limit: limit.into_inner().unwrap_or(defaults.limit),
        search: search
            .into_inner()
            .map(|search| search.trim().to_string())
            .filter(|search| !search.is_empty()),
        role: role
            .into_inner()
            .map(|role| role.parse::<UserRole>())
            .transpose()
            .or_400("invalid role filter")?,
        status: status
            .into_inner()
            .map(|status| status.parse::<UserStatus>())
            .transpose()
            .or_400("invalid status filter")?,
    };

    let page = state
        .app
        .users
        .list_users(filter)
        .await
        .map_err(into_status_error)?;

    Ok(Json(UsersResponse {
        users: page.users.into_iter().map(Into::into).collect(),
        total: page.total,
        page: page.page,
        limit: page.limit,
    }))
}
