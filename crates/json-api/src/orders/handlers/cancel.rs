//! Cancel Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use gennessence::orders::Actor;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, get::OrderResponse},
    state::State,
};

/// Cancel Order Handler
///
/// Only pending orders can be cancelled. Customers may cancel their own
/// orders; administrators may cancel any.
#[endpoint(
    tags("orders"),
    summary = "Cancel Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order cancelled"),
        (status_code = StatusCode::BAD_REQUEST, description = "Order is not pending"),
        (status_code = StatusCode::FORBIDDEN, description = "Order belongs to another user"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let current = depot.current_user_or_401()?;

    let actor = if current.is_admin() {
        Actor::Admin
    } else {
        Actor::Owner
    };

    let order = state
        .app
        .orders
        .cancel_order(order.into_inner().into(), current.user_uuid, actor)
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use gennessence::orders::{OrderStatus, TransitionError};
    use gennessence_app::domain::orders::{OrdersServiceError, records::OrderUuid};

    use crate::{
        orders::handlers::tests::make_order,
        test_helpers::{
            MockServices, TEST_ADMIN_UUID, TEST_CUSTOMER_UUID, admin_service, customer_service,
        },
    };

    use super::*;

    fn route() -> Router {
        Router::with_path("orders/{order}/cancel").post(handler)
    }

    #[tokio::test]
    async fn test_owner_cancels_pending_order() -> TestResult {
        let uuid = OrderUuid::new();
        let mut services = MockServices::default();

        services
            .orders
            .expect_cancel_order()
            .once()
            .withf(move |order, requester, actor| {
                *order == uuid && *requester == TEST_CUSTOMER_UUID && *actor == Actor::Owner
            })
            .return_once(|uuid, user, _| Ok(make_order(uuid, user, OrderStatus::Cancelled)));

        let body: OrderResponse =
            TestClient::post(format!("http://example.com/orders/{uuid}/cancel"))
                .send(&customer_service(services, route()))
                .await
                .take_json()
                .await?;

        assert_eq!(body.status, "cancelled");

        Ok(())
    }

    #[tokio::test]
    async fn test_shipped_order_returns_400() -> TestResult {
        let mut services = MockServices::default();

        services
            .orders
            .expect_cancel_order()
            .once()
            .return_once(|_, _, _| {
                Err(OrdersServiceError::Transition(
                    TransitionError::NotCancellable(OrderStatus::Shipped),
                ))
            });

        let res = TestClient::post(format!("http://example.com/orders/{}/cancel", OrderUuid::new()))
            .send(&customer_service(services, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_other_customers_order_returns_403() -> TestResult {
        let mut services = MockServices::default();

        services
            .orders
            .expect_cancel_order()
            .once()
            .return_once(|_, _, _| Err(OrdersServiceError::Forbidden));

        let res = TestClient::post(format!("http://example.com/orders/{}/cancel", OrderUuid::new()))
            .send(&customer_service(services, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_cancels_as_admin() -> TestResult {
        let mut services = MockServices::default();

        services
            .orders
            .expect_cancel_order()
            .once()
            .withf(|_, requester, actor| *requester == TEST_ADMIN_UUID && *actor == Actor::Admin)
            .return_once(|uuid, _, _| {
                Ok(make_order(uuid, TEST_CUSTOMER_UUID, OrderStatus::Cancelled))
            });

        let res = TestClient::post(format!("http://example.com/orders/{}/cancel", OrderUuid::new()))
            .send(&admin_service(services, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }
}
