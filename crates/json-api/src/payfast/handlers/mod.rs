//! Payment Gateway Handlers

pub(crate) mod create_payment;
pub(crate) mod notify;
