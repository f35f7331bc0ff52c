//! Cart Errors

use thiserror::Error;

use super::{GatewayError, SnapshotError};

/// Errors raised by the cart store.
#[derive(Debug, Error)]
pub enum CartError {
    /// Items must be added with a quantity of at least one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The storefront API could not be reached or rejected the request.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The local snapshot could not be read or written.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}
