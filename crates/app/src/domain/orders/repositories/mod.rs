//! Orders Repositories

mod items;
mod orders;

pub(crate) use items::{PgOrderItemsRepository, PricedProduct};
pub(crate) use orders::PgOrdersRepository;
