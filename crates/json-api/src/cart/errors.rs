//! Cart Errors

use salvo::http::StatusError;
use tracing::error;

use gennessence_app::domain::carts::CartsServiceError;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::InvalidQuantity(key) => {
            StatusError::bad_request().brief(format!("Quantity for {key} must be at least 1"))
        }
        CartsServiceError::DuplicateItem(key) => {
            StatusError::bad_request().brief(format!("{key} appears more than once"))
        }
        CartsServiceError::AlreadyExists => StatusError::conflict().brief("Cart already exists"),
        CartsServiceError::InvalidReference
        | CartsServiceError::MissingRequiredData
        | CartsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid cart payload")
        }
        CartsServiceError::NotFound => StatusError::not_found().brief("Cart not found"),
        CartsServiceError::Sql(source) => {
            error!("cart storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
