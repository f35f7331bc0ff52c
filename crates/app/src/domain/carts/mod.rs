//! Carts
//!
//! Server copy of each user's cart. Lines are stored exactly as the client
//! sends them and replaced wholesale on every sync.

pub mod errors;
pub mod records;
mod repositories;
pub mod service;

pub use errors::CartsServiceError;
pub use service::*;
