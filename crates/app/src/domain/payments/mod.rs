//! Payments
//!
//! Redirects shoppers to the hosted payment page and applies the gateway's
//! asynchronous payment notifications to orders.

pub mod config;
pub mod errors;
pub mod notification;
pub mod redirect;
mod repository;
pub mod service;

pub use config::PaymentGatewayConfig;
pub use errors::PaymentsServiceError;
pub use service::*;
