//! Payment Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use gennessence_app::domain::payments::PaymentsServiceError;

use crate::observability::NotificationOutcome;

pub(crate) fn into_status_error(error: PaymentsServiceError) -> StatusError {
    match error {
        PaymentsServiceError::MissingField(field) => {
            StatusError::bad_request().brief(format!("Missing required field: {field}"))
        }
        PaymentsServiceError::InvalidField(field) => {
            StatusError::bad_request().brief(format!("Invalid field: {field}"))
        }
        PaymentsServiceError::InvalidSignature => {
            warn!("rejected payment notification with invalid signature");

            StatusError::bad_request().brief("Invalid signature")
        }
        PaymentsServiceError::UntrustedSource(source) => {
            warn!(%source, "rejected payment notification from untrusted source");

            StatusError::forbidden().brief("Untrusted source")
        }
        PaymentsServiceError::OrderNotFound => StatusError::not_found().brief("Order not found"),
        PaymentsServiceError::AmountMismatch { expected, received } => {
            warn!(expected, received, "rejected payment notification with wrong amount");

            StatusError::bad_request().brief("Amount does not match order total")
        }
        PaymentsServiceError::Sql(source) => {
            error!("payment storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}

/// Metric label for a notification the service refused.
pub(crate) fn rejection_outcome(error: &PaymentsServiceError) -> NotificationOutcome {
    match error {
        PaymentsServiceError::Sql(_) => NotificationOutcome::Failed,
        _ => NotificationOutcome::Rejected,
    }
}
