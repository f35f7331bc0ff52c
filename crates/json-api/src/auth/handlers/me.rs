//! Current User Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    state::State,
    users::{errors::into_status_error, get::UserResponse},
};

/// Current User Handler
///
/// Returns the user the bearer token belongs to.
#[endpoint(tags("auth"), summary = "Current User", security(("bearer_auth" = [])))]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let current = depot.current_user_or_401()?;

    let user = state
        .app
        .users
        .get_user(current.user_uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use gennessence_app::domain::users::records::UserRole;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{
        MockServices, TEST_CUSTOMER_UUID, customer_service, make_user, public_service,
    };

    use super::*;

    #[tokio::test]
    async fn test_me_returns_current_user() -> TestResult {
        let mut services = MockServices::default();

        services
            .users
            .expect_get_user()
            .once()
            .withf(|user| *user == TEST_CUSTOMER_UUID)
            .return_once(|uuid| Ok(make_user(uuid, "amara@example.com", UserRole::Customer)));

        let body: UserResponse = TestClient::get("http://example.com/me")
            .send(&customer_service(
                services,
                Router::with_path("me").get(handler),
            ))
            .await
            .take_json()
            .await?;

        assert_eq!(body.email, "amara@example.com");

        Ok(())
    }

    #[tokio::test]
    async fn test_me_without_user_returns_401() -> TestResult {
        let res = TestClient::get("http://example.com/me")
            .send(&public_service(
                MockServices::default(),
                Router::with_path("me").get(handler),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
