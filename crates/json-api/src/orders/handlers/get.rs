//! Get Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gennessence::checkout::ShippingAddress;
use gennessence_app::domain::orders::records::{OrderItemRecord, OrderRecord};

use crate::{extensions::*, orders::errors::into_status_error, state::State};

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    /// The unique identifier of the order
    pub uuid: Uuid,

    /// The customer who placed the order
    pub user_uuid: Uuid,

    pub customer_name: String,
    pub customer_email: String,

    pub items: Vec<OrderItemResponse>,

    /// Sum of the line totals in cents
    pub total: u64,

    /// `pending`, `paid`, `shipped`, `delivered` or `cancelled`
    pub status: String,

    /// `pending`, `completed` or `failed`
    pub payment_status: String,

    /// Gateway payment reference
    pub payment_id: Option<String>,

    pub shipping_address: ShippingAddressBody,
    pub tracking_number: Option<String>,
    pub notes: Option<String>,

    pub created_at: String,
    pub updated_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        OrderResponse {
            uuid: order.uuid.into(),
            user_uuid: order.user_uuid.into(),
            customer_name: order.customer_name,
            customer_email: order.customer_email,
            items: order.items.into_iter().map(Into::into).collect(),
            total: order.total,
            status: order.status.to_string(),
            payment_status: order.payment_status.to_string(),
            payment_id: order.payment_id,
            shipping_address: order.shipping_address.into(),
            tracking_number: order.tracking_number,
            notes: order.notes,
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

/// Order line as purchased.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub product_uuid: Uuid,
    pub name: String,
    pub quantity: u32,

    /// Unit price in cents at the time of purchase
    pub price: u64,
}

impl From<OrderItemRecord> for OrderItemResponse {
    fn from(item: OrderItemRecord) -> Self {
        OrderItemResponse {
            product_uuid: item.product_uuid.into(),
            name: item.name,
            quantity: item.quantity,
            price: item.price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct ShippingAddressBody {
    pub street: String,
    pub city: String,

    #[serde(default)]
    pub state: String,

    pub postal_code: String,
    pub country: String,
}

impl From<ShippingAddress> for ShippingAddressBody {
    fn from(address: ShippingAddress) -> Self {
        ShippingAddressBody {
            street: address.street,
            city: address.city,
            state: address.state,
            postal_code: address.postal_code,
            country: address.country,
        }
    }
}

impl From<ShippingAddressBody> for ShippingAddress {
    fn from(address: ShippingAddressBody) -> Self {
        ShippingAddress {
            street: address.street,
            city: address.city,
            state: address.state,
            postal_code: address.postal_code,
            country: address.country,
        }
    }
}

/// Get Order Handler
///
/// Customers can read their own orders; administrators can read any order.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order"),
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

    let order = state
        .app
        .orders
        .get_order(order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    if !current.is_admin() && !order.is_owned_by(current.user_uuid) {
        return Err(StatusError::forbidden().brief("You can only access your own orders"));
    }

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use gennessence::orders::OrderStatus;
    use gennessence_app::domain::{
        orders::{OrdersServiceError, records::OrderUuid},
        users::records::UserUuid,
    };

    use crate::{
        orders::handlers::tests::make_order,
        test_helpers::{MockServices, TEST_CUSTOMER_UUID, admin_service, customer_service},
    };

    use super::*;

    fn route() -> Router {
        Router::with_path("orders/{order}").get(handler)
    }

    #[tokio::test]
    async fn test_owner_reads_order() -> TestResult {
        let uuid = OrderUuid::new();
        let mut services = MockServices::default();

        services
            .orders
            .expect_get_order()
            .once()
            .withf(move |order| *order == uuid)
            .return_once(|uuid| Ok(make_order(uuid, TEST_CUSTOMER_UUID, OrderStatus::Pending)));

        let body: OrderResponse = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&customer_service(services, route()))
            .await
            .take_json()
            .await?;

        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.total, 10_000);
        assert_eq!(body.status, "pending");
        assert_eq!(body.shipping_address.city, "Cape Town");

        Ok(())
    }

    #[tokio::test]
    async fn test_other_customers_order_returns_403() -> TestResult {
        let mut services = MockServices::default();

        services
            .orders
            .expect_get_order()
            .once()
            .return_once(|uuid| Ok(make_order(uuid, UserUuid::new(), OrderStatus::Pending)));

        let res = TestClient::get(format!("http://example.com/orders/{}", OrderUuid::new()))
            .send(&customer_service(services, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_reads_any_order() -> TestResult {
        let mut services = MockServices::default();

        services
            .orders
            .expect_get_order()
            .once()
            .return_once(|uuid| Ok(make_order(uuid, UserUuid::new(), OrderStatus::Shipped)));

        let res = TestClient::get(format!("http://example.com/orders/{}", OrderUuid::new()))
            .send(&admin_service(services, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_order_returns_404() -> TestResult {
        let mut services = MockServices::default();

        services
            .orders
            .expect_get_order()
            .once()
            .return_once(|_| Err(OrdersServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/orders/{}", OrderUuid::new()))
            .send(&customer_service(services, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
