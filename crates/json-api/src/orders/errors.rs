//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use gennessence::orders::TransitionError;
use gennessence_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::Forbidden => {
            StatusError::forbidden().brief("You can only access your own orders")
        }
        OrdersServiceError::EmptyOrder => {
            StatusError::bad_request().brief("Order must contain at least one item")
        }
        OrdersServiceError::InvalidQuantity => {
            StatusError::bad_request().brief("Quantity must be at least 1")
        }
        OrdersServiceError::UnknownProduct(product) => {
            StatusError::bad_request().brief(format!("Product {product} is not available"))
        }
        OrdersServiceError::Transition(error @ TransitionError::NotCancellable(_)) => {
            StatusError::bad_request().brief(error.to_string())
        }
        OrdersServiceError::Transition(error @ TransitionError::AdminOnly(_)) => {
            StatusError::forbidden().brief(error.to_string())
        }
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::Sql(source) => {
            error!("order storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
