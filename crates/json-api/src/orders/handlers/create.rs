//! Create Order Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gennessence::checkout::OrderDraftItem;
use gennessence_app::domain::orders::{data::NewOrder, records::OrderUuid};

use crate::{
    extensions::*,
    orders::{
        errors::into_status_error,
        get::{OrderResponse, ShippingAddressBody},
    },
    state::State,
};

/// Create Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderRequest {
    pub items: Vec<CreateOrderItem>,
    pub shipping_address: ShippingAddressBody,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderItem {
    pub product_uuid: Uuid,
    pub quantity: u32,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(request: CreateOrderRequest) -> Self {
        NewOrder {
            uuid: OrderUuid::new(),
            items: request
                .items
                .into_iter()
                .map(|item| OrderDraftItem {
                    product_uuid: item.product_uuid,
                    quantity: item.quantity,
                })
                .collect(),
            shipping_address: request.shipping_address.into(),
        }
    }
}

/// Create Order Handler
///
/// Prices come from the catalogue, not the request.
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Empty order or unknown product"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let current = depot.current_user_or_401()?;

    let order = state
        .app
        .orders
        .create_order(current.user_uuid, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/api/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}
