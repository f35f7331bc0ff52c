//! Gennessence Domain Concerns

use thiserror::Error;

pub mod carts;
pub mod orders;
pub mod payments;
pub mod products;
pub mod reports;
pub mod users;

/// A stored or submitted value outside its allowed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {value:?}")]
pub struct InvalidValue {
    pub kind: &'static str,
    pub value: String,
}

impl InvalidValue {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
