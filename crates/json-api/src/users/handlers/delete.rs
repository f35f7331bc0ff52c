//! Delete User Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, state::State, users::errors::into_status_error};

/// Delete User Handler
///
/// Users who have placed orders cannot be deleted.
#[endpoint(
    tags("users"),
    summary = "Delete User",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "User deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "User not found"),
        (status_code = StatusCode::CONFLICT, description = "User has orders"),
    ),
)]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let current = depot.current_user_or_401()?;
    let user = user.into_inner();

    if current.user_uuid.into_uuid() == user {
        return Err(StatusError::bad_request().brief("You cannot delete your own account"));
    }

    state
        .app
        .users
        .delete_user(user.into())
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::NO_CONTENT);

    Ok(())
}

#[cfg(test)]
mod tests {
    use gennessence_app::domain::users::{UsersServiceError, records::UserUuid};
    use salvo::test::TestClient;
    use testresult::TestResult;

    use crate::test_helpers::{MockServices, TEST_ADMIN_UUID, admin_service};

    use super::*;

    fn make_service(services: MockServices) -> Service {
        admin_service(services, Router::with_path("users/{user}").delete(handler))
    }

    #[tokio::test]
    async fn test_delete_user_returns_204() -> TestResult {
        let uuid = UserUuid::new();
        let mut services = MockServices::default();

        services
            .users
            .expect_delete_user()
            .once()
            .withf(move |user| *user == uuid)
            .return_once(|_| Ok(()));

        let res = TestClient::delete(format!("http://example.com/users/{uuid}"))
            .send(&make_service(services))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }

    #[tokio::test]
    async fn test_user_with_orders_returns_409() -> TestResult {
        let mut services = MockServices::default();

        services
            .users
            .expect_delete_user()
            .once()
            .return_once(|_| Err(UsersServiceError::InvalidReference));

        let res = TestClient::delete(format!("http://example.com/users/{}", UserUuid::new()))
            .send(&make_service(services))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_cannot_delete_themselves() -> TestResult {
        let res = TestClient::delete(format!("http://example.com/users/{TEST_ADMIN_UUID}"))
            .send(&make_service(MockServices::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
