//! Statistics Handlers

pub(crate) mod overview;
pub(crate) mod revenue_trend;
pub(crate) mod top_products;
