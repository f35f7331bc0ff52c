//! Payment Gateway
//!
//! Hosted payment page redirects and the gateway's server-to-server
//! notifications.

pub(crate) mod errors;
mod handlers;

pub(crate) use handlers::*;
