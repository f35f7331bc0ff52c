//! Reset User Password Handler

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

use crate::{extensions::*, state::State, users::errors::into_status_error};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ResetPasswordRequest {
    pub password: String,
}

/// Reset User Password Handler
#[endpoint(
    tags("users"),
    summary = "Reset User Password",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Password changed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Password too short"),
        (status_code = StatusCode::NOT_FOUND, description = "User not found"),
    ),
)]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    json: JsonBody<ResetPasswordRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .users
        .reset_password(user.into_inner().into(), &json.into_inner().password)
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::NO_CONTENT);

    Ok(())
}

#[cfg(test)]
mod tests {
    use gennessence_app::domain::users::{UsersServiceError, records::UserUuid};
    use salvo::test::TestClient;
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{MockServices, admin_service};

    use super::*;

    fn make_service(services: MockServices) -> Service {
        admin_service(
            services,
            Router::with_path("users/{user}/password").patch(handler),
        )
    }

    #[tokio::test]
    async fn test_reset_password_returns_204() -> TestResult {
        let uuid = UserUuid::new();
        let mut services = MockServices::default();

        services
            .users
            .expect_reset_password()
            .once()
            .withf(move |user, password| *user == uuid && password == "new-password")
            .return_once(|_, _| Ok(()));

        let res = TestClient::patch(format!("http://example.com/users/{uuid}/password"))
            .json(&json!({ "password": "new-password" }))
            .send(&make_service(services))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }

    #[tokio::test]
    async fn test_short_password_returns_400() -> TestResult {
        let mut services = MockServices::default();

        services
            .users
            .expect_reset_password()
            .once()
            .return_once(|_, _| Err(UsersServiceError::WeakPassword(6)));

        let res = TestClient::patch(format!("http://example.com/users/{}/password", UserUuid::new()))
            .json(&json!({ "password": "abc" }))
            .send(&make_service(services))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
