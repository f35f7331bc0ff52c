//! Update Order Payment Handler

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

use gennessence::orders::PaymentStatus;
use gennessence_app::domain::orders::data::PaymentUpdate;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, get::OrderResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdatePaymentRequest {
    /// `pending`, `completed` or `failed`
    pub payment_status: String,

    /// Gateway payment reference
    pub payment_id: Option<String>,
}

/// Update Order Payment Handler
///
/// Manual override for payments settled outside the gateway.
#[endpoint(
    tags("orders"),
    summary = "Update Order Payment",
    security(("bearer_auth" = [])),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<UpdatePaymentRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let update = PaymentUpdate {
        payment_status: request
            .payment_status
            .parse::<PaymentStatus>()
            .or_400("invalid payment_status")?,
        payment_id: request.payment_id,
    };

    let order = state
        .app
        .orders
        .update_payment(order.into_inner().into(), update)
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
