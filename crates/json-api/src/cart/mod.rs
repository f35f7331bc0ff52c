//! Cart
//!
//! The signed-in shopper's server-side cart. The client store owns merging;
//! this module only stores what it is sent.

pub(crate) mod errors;
mod handlers;

pub(crate) use handlers::*;
