//! Signup Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use gennessence_app::domain::users::{
    data::NewUser,
    records::{UserRole, UserStatus, UserUuid},
};

use crate::{
    auth::{into_status_error as auth_status_error, login::SessionResponse},
    extensions::*,
    state::State,
    users::errors::into_status_error,
};

/// Signup Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SignupRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Signup Handler
///
/// Creates a customer account and signs it in.
#[endpoint(
    tags("auth"),
    summary = "Sign Up",
    responses(
        (status_code = StatusCode::CREATED, description = "Account created"),
        (status_code = StatusCode::CONFLICT, description = "Email already registered"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<SignupRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<SessionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let user = state
        .app
        .users
        .create_user(NewUser {
            uuid: UserUuid::new(),
            email: request.email,
            name: request.name,
            password: request.password,
            role: UserRole::Customer,
            status: UserStatus::Active,
            avatar: None,
        })
        .await
        .map_err(into_status_error)?;

    let token = state
        .app
        .auth
        .issue_session(user.uuid)
        .await
        .map_err(auth_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(SessionResponse::new(token, user)))
}

#[cfg(test)]
mod tests {
    use gennessence_app::{
        auth::{ApiTokenMetadata, ApiTokenVersion, IssuedApiToken},
        domain::users::UsersServiceError,
    };
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{MockServices, make_user, public_service};

    use super::*;

    fn make_service(services: MockServices) -> Service {
        public_service(services, Router::with_path("signup").post(handler))
    }

    #[tokio::test]
    async fn test_signup_creates_customer_and_issues_token() -> TestResult {
        let mut services = MockServices::default();

        services
            .users
            .expect_create_user()
            .once()
            .withf(|user| user.role == UserRole::Customer && user.email == "amara@example.com")
            .return_once(|user| Ok(make_user(user.uuid, &user.email, user.role)));

        services
            .auth
            .expect_issue_session()
            .once()
            .return_once(|user| {
                Ok(IssuedApiToken {
                    token: "gn_v1_token".to_string(),
                    metadata: ApiTokenMetadata {
                        uuid: uuid::Uuid::nil(),
                        user_uuid: user,
                        version: ApiTokenVersion::V1,
                        created_at: Timestamp::UNIX_EPOCH,
                        last_used_at: None,
                        expires_at: Some(Timestamp::UNIX_EPOCH),
                        revoked_at: None,
                    },
                })
            });

        let mut res = TestClient::post("http://example.com/signup")
            .json(&json!({
                "email": "amara@example.com",
                "name": "Amara Okafor",
                "password": "password123"
            }))
            .send(&make_service(services))
            .await;

        let body: SessionResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.token, "gn_v1_token");
        assert!(body.expires_at.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_short_password_returns_400() -> TestResult {
        let mut services = MockServices::default();

        services
            .users
            .expect_create_user()
            .once()
            .return_once(|_| Err(UsersServiceError::WeakPassword(6)));

        let res = TestClient::post("http://example.com/signup")
            .json(&json!({
                "email": "amara@example.com",
                "name": "Amara Okafor",
                "password": "abc"
            }))
            .send(&make_service(services))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
