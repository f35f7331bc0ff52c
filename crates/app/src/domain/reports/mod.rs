//! Reports
//!
//! Sales figures for the back office dashboard.

pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::ReportsServiceError;
pub use service::*;
