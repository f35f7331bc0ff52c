//! Clear Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{cart::errors::into_status_error, extensions::*, state::State};

/// Clear Cart Handler
#[endpoint(
    tags("cart"),
    summary = "Clear Cart",
    security(("bearer_auth" = [])),
    responses((status_code = StatusCode::NO_CONTENT, description = "Cart cleared")),
)]
pub(crate) async fn handler(depot: &mut Depot, res: &mut Response) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let current = depot.current_user_or_401()?;

    state
        .app
        .carts
        .clear_cart(current.user_uuid)
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::NO_CONTENT);

    Ok(())
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use crate::test_helpers::{MockServices, TEST_CUSTOMER_UUID, customer_service};

    use super::*;

    #[tokio::test]
    async fn test_clear_cart_returns_204() -> TestResult {
        let mut services = MockServices::default();

        services
            .carts
            .expect_clear_cart()
            .once()
            .withf(|user| *user == TEST_CUSTOMER_UUID)
            .return_once(|_| Ok(()));

        let res = TestClient::delete("http://example.com/cart")
            .send(&customer_service(
                services,
                Router::with_path("cart").delete(handler),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }
}
