//! Payments service errors.

use std::net::IpAddr;

use sqlx::Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentsServiceError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid field: {0}")]
    InvalidField(&'static str),

    #[error("invalid signature")]
    InvalidSignature,

    #[error("notification from untrusted source {0}")]
    UntrustedSource(IpAddr),

    #[error("order not found")]
    OrderNotFound,

    #[error("paid amount {received} does not match order total {expected}")]
    AmountMismatch { expected: u64, received: u64 },

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for PaymentsServiceError {
    fn from(error: Error) -> Self {
        match error {
            Error::RowNotFound => Self::OrderNotFound,
            error => Self::Sql(error),
        }
    }
}
