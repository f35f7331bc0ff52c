//! Create Payment Handler

use std::sync::Arc;

use rust_decimal::Decimal;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gennessence::money;
use gennessence_app::domain::payments::redirect::{PaymentRedirect, PaymentRequest};

use crate::{extensions::*, payfast::errors::into_status_error, state::State};

/// Create Payment Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreatePaymentRequest {
    /// Amount in the shop currency, e.g. `160.00`
    #[salvo(schema(value_type = f64))]
    pub amount: Decimal,

    #[serde(default)]
    pub item_name: String,

    #[serde(default)]
    pub return_url: String,

    #[serde(default)]
    pub cancel_url: String,

    #[serde(default)]
    pub notify_url: String,

    /// Order settled by this payment
    pub order_id: Option<Uuid>,
}

impl CreatePaymentRequest {
    fn into_payment_request(self) -> Result<PaymentRequest, StatusError> {
        let amount = money::from_decimal(self.amount.round_dp(2))
            .ok_or_else(|| StatusError::bad_request().brief("Invalid amount"))?;

        Ok(PaymentRequest {
            amount,
            item_name: self.item_name,
            return_url: self.return_url,
            cancel_url: self.cancel_url,
            notify_url: self.notify_url,
            order: self.order_id.map(Into::into),
        })
    }
}

/// Create Payment Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreatePaymentResponse {
    /// Payment page URL including the signed fields
    pub url: String,

    pub signature: String,
}

impl From<PaymentRedirect> for CreatePaymentResponse {
    fn from(redirect: PaymentRedirect) -> Self {
        CreatePaymentResponse {
            url: redirect.url,
            signature: redirect.signature,
        }
    }
}

/// Create Payment Handler
///
/// Signs a checkout for the hosted payment page. Merchant credentials never
/// leave the server.
#[endpoint(
    tags("payments"),
    summary = "Create Payment",
    responses(
        (status_code = StatusCode::OK, description = "Signed payment URL"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing or invalid field"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreatePaymentRequest>,
    depot: &mut Depot,
) -> Result<Json<CreatePaymentResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner().into_payment_request()?;

    let redirect = state
        .app
        .payments
        .create_payment(&request)
        .map_err(into_status_error)?;

    Ok(Json(redirect.into()))
}
