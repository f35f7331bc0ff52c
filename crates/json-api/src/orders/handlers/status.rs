//! Update Order Status Handler

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

use gennessence::orders::OrderStatus;
use gennessence_app::domain::orders::data::StatusUpdate;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, get::OrderResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateOrderStatusRequest {
    /// `pending`, `paid`, `shipped`, `delivered` or `cancelled`
    pub status: String,

    pub tracking_number: Option<String>,
    pub notes: Option<String>,
}

/// Update Order Status Handler
#[endpoint(
    tags("orders"),
    summary = "Update Order Status",
    security(("bearer_auth" = [])),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<UpdateOrderStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let update = StatusUpdate {
        status: request
            .status
            .parse::<OrderStatus>()
            .or_400("invalid status")?,
        tracking_number: request.tracking_number,
        notes: request.notes,
    };

    let order = state
        .app
        .orders
        .update_status(order.into_inner().into(), update)
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use gennessence::orders::TransitionError;
    use gennessence_app::domain::{
        orders::{OrdersServiceError, records::OrderUuid},
        users::records::UserUuid,
    };

    use crate::{
        orders::handlers::tests::make_order,
        test_helpers::{MockServices, admin_service},
    };

    use super::*;

    fn make_service(services: MockServices) -> Service {
        admin_service(
            services,
            Router::with_path("orders/{order}/status").patch(handler),
        )
    }

    #[tokio::test]
    async fn test_ship_order_with_tracking_number() -> TestResult {
        let uuid = OrderUuid::new();
        let mut services = MockServices::default();

        services
            .orders
            .expect_update_status()
            .once()
            .withf(move |order, update| {
                *order == uuid
                    && *update
                        == StatusUpdate {
                            status: OrderStatus::Shipped,
                            tracking_number: Some("ZA123".to_string()),
                            notes: None,
                        }
            })
            .return_once(|uuid, update| {
                let mut order = make_order(uuid, UserUuid::new(), update.status);
                order.tracking_number = update.tracking_number;
                Ok(order)
            });

        let body: OrderResponse =
            TestClient::patch(format!("http://example.com/orders/{uuid}/status"))
                .json(&json!({ "status": "shipped", "tracking_number": "ZA123" }))
                .send(&make_service(services))
                .await
                .take_json()
                .await?;

        assert_eq!(body.status, "shipped");
        assert_eq!(body.tracking_number.as_deref(), Some("ZA123"));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_status_returns_400() -> TestResult {
        let res = TestClient::patch(format!("http://example.com/orders/{}/status", OrderUuid::new()))
            .json(&json!({ "status": "lost" }))
            .send(&make_service(MockServices::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_cancelling_a_shipped_order_returns_400() -> TestResult {
        let uuid = OrderUuid::new();
        let mut services = MockServices::default();

        services
            .orders
            .expect_update_status()
            .once()
            .withf(|_, update| update.status == OrderStatus::Cancelled)
            .return_once(|_, _| {
                Err(OrdersServiceError::Transition(
                    TransitionError::NotCancellable(OrderStatus::Shipped),
                ))
            });

        let res = TestClient::patch(format!("http://example.com/orders/{uuid}/status"))
            .json(&json!({ "status": "cancelled" }))
            .send(&make_service(services))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
