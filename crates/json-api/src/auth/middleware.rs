//! Auth middleware.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};

use crate::{auth::into_status_error, extensions::*, state::State};

/// Resolve the bearer token to a user, or answer 401.
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = extract_bearer_token(req) else {
        res.render(StatusError::unauthorized().brief("Missing or invalid Authorization header"));
        ctrl.skip_rest();

        return;
    };

    let state = match depot.obtain_or_500::<Arc<State>>() {
        Ok(state) => state,
        Err(error) => {
            res.render(error);
            ctrl.skip_rest();

            return;
        }
    };

    let user = match state.app.auth.authenticate_bearer(token).await {
        Ok(user) => user,
        Err(error) => {
            res.render(into_status_error(error));
            ctrl.skip_rest();

            return;
        }
    };

    tracing::Span::current().record("user_uuid", tracing::field::display(user.user_uuid));

    depot.insert_current_user(user);

    ctrl.call_next(req, depot, res).await;
}

/// Answer 403 unless the authenticated user is an administrator.
#[salvo::handler]
pub(crate) async fn require_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if let Err(error) = depot.admin_or_403() {
        res.render(error);
        ctrl.skip_rest();

        return;
    }

    ctrl.call_next(req, depot, res).await;
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.splitn(2, ' ');

    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}

#[cfg(test)]
mod tests {
    use gennessence_app::auth::AuthServiceError;
    use salvo::{
        affix_state::inject,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use crate::test_helpers::{MockServices, TEST_ADMIN, TEST_CUSTOMER};

    use super::*;

    #[salvo::handler]
    async fn echo_user(depot: &mut Depot, res: &mut Response) {
        let user = depot.current_user_or_401().ok().map_or_else(
            || "missing".to_string(),
            |user| user.user_uuid.to_string(),
        );

        res.render(user);
    }

    fn make_service(services: MockServices) -> Service {
        let router = Router::new()
            .hoop(inject(services.into_state()))
            .hoop(handler)
            .push(Router::new().get(echo_user))
            .push(Router::with_path("admin").hoop(require_admin).get(echo_user));

        Service::new(router)
    }

    #[tokio::test]
    async fn test_missing_authorization_header_returns_401() -> TestResult {
        let mut services = MockServices::default();

        services.auth.expect_authenticate_bearer().never();

        let res = TestClient::get("http://example.com")
            .send(&make_service(services))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_non_bearer_authorization_header_returns_401() -> TestResult {
        let mut services = MockServices::default();

        services.auth.expect_authenticate_bearer().never();

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Basic abc123", true)
            .send(&make_service(services))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_token_returns_401() -> TestResult {
        let mut services = MockServices::default();

        services
            .auth
            .expect_authenticate_bearer()
            .once()
            .withf(|token| token == "abc123")
            .return_once(|_| Err(AuthServiceError::NotFound));

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
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
            .expect_authenticate_bearer()
            .once()
            .return_once(|_| Err(AuthServiceError::Inactive));

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&make_service(services))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_valid_token_injects_user() -> TestResult {
        let mut services = MockServices::default();

        services
            .auth
            .expect_authenticate_bearer()
            .once()
            .withf(|token| token == "abc123")
            .return_once(|_| Ok(TEST_CUSTOMER));

        let mut res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&make_service(services))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(
            res.take_string().await?,
            TEST_CUSTOMER.user_uuid.to_string()
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_customer_is_forbidden_from_admin_routes() -> TestResult {
        let mut services = MockServices::default();

        services
            .auth
            .expect_authenticate_bearer()
            .once()
            .return_once(|_| Ok(TEST_CUSTOMER));

        let res = TestClient::get("http://example.com/admin")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&make_service(services))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_passes_admin_guard() -> TestResult {
        let mut services = MockServices::default();

        services
            .auth
            .expect_authenticate_bearer()
            .once()
            .return_once(|_| Ok(TEST_ADMIN));

        let mut res = TestClient::get("http://example.com/admin")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&make_service(services))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, TEST_ADMIN.user_uuid.to_string());

        Ok(())
    }
}
