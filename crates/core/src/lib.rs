//! Gennessence
//!
//! Storefront client library for the Gennessence bottled-water shop: the cart
//! store and its backend synchronisation, the sign-in driven cart lifecycle,
//! checkout validation, order status rules and payment gateway signatures.

pub mod cart;
pub mod checkout;
pub mod credential;
pub mod http;
pub mod money;
pub mod orders;
pub mod session;
pub mod signature;
