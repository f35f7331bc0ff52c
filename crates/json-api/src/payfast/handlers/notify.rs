//! Payment Notification Handler

use std::{
    net::{IpAddr, Ipv4Addr},
    sync::Arc,
};

use salvo::prelude::*;
use tracing::info;

use gennessence_app::domain::payments::notification::Resolution;

use crate::{
    extensions::*,
    observability::{NotificationOutcome, observe_payment_notification},
    payfast::errors::{into_status_error, rejection_outcome},
    state::State,
};

/// Payment Notification Handler
///
/// Receives form-encoded notifications from the gateway. A notification is
/// acknowledged with `200 OK` once applied, and also when it repeats one
/// already applied.
#[endpoint(
    tags("payments"),
    summary = "Payment Notification",
    responses(
        (status_code = StatusCode::OK, description = "Notification acknowledged"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid signature or amount"),
        (status_code = StatusCode::FORBIDDEN, description = "Untrusted source"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let source = req
        .remote_addr()
        .clone()
        .into_std()
        .map_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED), |addr| addr.ip());

    let params: Vec<(String, String)> = req
        .form_data()
        .await
        .or_400("invalid notification body")?
        .fields
        .iter_all()
        .flat_map(|(key, values)| {
            values
                .iter()
                .map(move |value| (key.clone(), value.clone()))
        })
        .collect();

    let receipt = match state.app.payments.handle_notification(source, params).await {
        Ok(receipt) => receipt,
        Err(error) => {
            observe_payment_notification(rejection_outcome(&error));

            return Err(into_status_error(error));
        }
    };

    let outcome = match receipt.resolution {
        Resolution::Apply { .. } => NotificationOutcome::Applied,
        Resolution::Duplicate => NotificationOutcome::Duplicate,
        Resolution::Ignore => NotificationOutcome::Ignored,
    };

    observe_payment_notification(outcome);

    info!(order_uuid = %receipt.order, ?outcome, "acknowledged payment notification");

    res.render(Text::Plain("OK"));

    Ok(())
}
