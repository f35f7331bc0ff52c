//! Login Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use gennessence_app::{
    auth::{IssuedApiToken, LoginSession},
    domain::users::records::UserRecord,
};

use crate::{auth::into_status_error, extensions::*, state::State, users::get::UserResponse};

/// Login Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Issued session
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SessionResponse {
    /// Bearer token for the `Authorization` header
    pub token: String,

    /// When the token stops working
    pub expires_at: Option<String>,

    /// The signed-in user
    pub user: UserResponse,
}

impl SessionResponse {
    pub(crate) fn new(token: IssuedApiToken, user: UserRecord) -> Self {
        SessionResponse {
            token: token.token,
            expires_at: token.metadata.expires_at.map(|at| at.to_string()),
            user: user.into(),
        }
    }
}

impl From<LoginSession> for SessionResponse {
    fn from(session: LoginSession) -> Self {
        Self::new(session.token, session.user)
    }
}

/// Login Handler
///
/// Exchanges an email and password for a bearer token.
#[endpoint(
    tags("auth"),
    summary = "Log In",
    responses(
        (status_code = StatusCode::OK, description = "Logged in"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid email or password"),
        (status_code = StatusCode::FORBIDDEN, description = "Account is inactive"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<LoginRequest>,
    depot: &mut Depot,
) -> Result<Json<SessionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let session = state
        .app
        .auth
        .login(&request.email, &request.password)
        .await
        .map_err(into_status_error)?;

    Ok(Json(session.into()))
}

#[cfg(test)]
mod tests {
    use gennessence_app::{
        auth::{ApiTokenMetadata, ApiTokenVersion, AuthServiceError, IssuedApiToken},
        domain::users::records::UserRole,
    };
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{MockServices, TEST_CUSTOMER_UUID, make_user, public_service};

    use super::*;

    fn make_service(services: MockServices) -> Service {
        public_service(services, Router::with_path("login").post(handler))
    }

    fn make_session() -> LoginSession {
        LoginSession {
            token: IssuedApiToken {
                token: "gn_v1_token".to_string(),
                metadata: ApiTokenMetadata {
                    uuid: uuid::Uuid::nil(),
                    user_uuid: TEST_CUSTOMER_UUID,
                    version: ApiTokenVersion::V1,
                    created_at: Timestamp::UNIX_EPOCH,
                    last_used_at: None,
                    expires_at: None,
                    revoked_at: None,
                },
            },
            user: make_user(TEST_CUSTOMER_UUID, "amara@example.com", UserRole::Customer),
        }
    }

    #[tokio::test]
    async fn test_login_returns_token_and_user() -> TestResult {
        let mut services = MockServices::default();

        services
            .auth
            .expect_login()
            .once()
            .withf(|email, password| email == "amara@example.com" && password == "password123")
            .return_once(|_, _| Ok(make_session()));

        let mut res = TestClient::post("http://example.com/login")
            .json(&json!({ "email": "amara@example.com", "password": "password123" }))
            .send(&make_service(services))
            .await;

        let body: SessionResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.token, "gn_v1_token");
        assert_eq!(body.user.uuid, TEST_CUSTOMER_UUID.into_uuid());
        assert_eq!(body.user.role, "customer");

        Ok(())
    }

    #[tokio::test]
    async fn test_bad_credentials_return_401() -> TestResult {
        let mut services = MockServices::default();

        services
            .auth
            .expect_login()
            .once()
            .return_once(|_, _| Err(AuthServiceError::InvalidCredentials));

        let res = TestClient::post("http://example.com/login")
            .json(&json!({ "email": "amara@example.com", "password": "nope" }))
            .send(&make_service(services))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_inactive_account_returns_403() -> TestResult {
        let mut services = MockServices::default();

        services
            .auth
            .expect_login()
            .once()
            .return_once(|_, _| Err(AuthServiceError::Inactive));

        let res = TestClient::post("http://example.com/login")
            .json(&json!({ "email": "amara@example.com", "password": "password123" }))
            .send(&make_service(services))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
