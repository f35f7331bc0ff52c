//! Get User Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gennessence_app::domain::users::records::UserRecord;

use crate::{extensions::*, state::State, users::errors::into_status_error};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UserResponse {
    /// The unique identifier of the user
    pub uuid: Uuid,

    pub email: String,
    pub name: String,

    /// `customer` or `admin`
    pub role: String,

    /// `active` or `inactive`
    pub status: String,

    pub avatar: Option<String>,

    /// The date and time of the last successful login
    pub last_login_at: Option<String>,

    pub created_at: String,
    pub updated_at: String,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        UserResponse {
            uuid: user.uuid.into(),
            email: user.email,
            name: user.name,
            role: user.role.to_string(),
            status: user.status.to_string(),
            avatar: user.avatar,
            last_login_at: user.last_login_at.map(|at| at.to_string()),
            created_at: user.created_at.to_string(),
            updated_at: user.updated_at.to_string(),
        }
    }
}

/// Get User Handler
#[endpoint(tags("users"), summary = "Get User", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let user = state
        .app
        .users
        .get_user(user.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use gennessence_app::domain::users::{
        UsersServiceError,
        records::{UserRole, UserUuid},
    };
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{MockServices, admin_service, make_user};

    use super::*;

    fn make_service(services: MockServices) -> Service {
        admin_service(services, Router::with_path("users/{user}").get(handler))
    }

    #[tokio::test]
    async fn test_get_user_returns_user() -> TestResult {
        let uuid = UserUuid::new();
        let mut services = MockServices::default();

        services
            .users
            .expect_get_user()
            .once()
            .withf(move |user| *user == uuid)
            .return_once(move |_| Ok(make_user(uuid, "amara@example.com", UserRole::Admin)));

        let body: UserResponse = TestClient::get(format!("http://example.com/users/{uuid}"))
            .send(&make_service(services))
            .await
            .take_json()
            .await?;

        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.role, "admin");
        assert_eq!(body.status, "active");

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_user_returns_404() -> TestResult {
        let mut services = MockServices::default();

        services
            .users
            .expect_get_user()
            .once()
            .return_once(|_| Err(UsersServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/users/{}", UserUuid::new()))
            .send(&make_service(services))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_uuid_returns_400() -> TestResult {
        let res = TestClient::get("http://example.com/users/not-a-uuid")
            .send(&make_service(MockServices::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
