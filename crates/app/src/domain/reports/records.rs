//! Report Records

use gennessence::orders::{OrderStatus, PaymentStatus};
use jiff::civil::Date;

use crate::domain::products::records::ProductUuid;

/// Totals over every order ever placed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrdersOverview {
    pub total_orders: u64,
    pub total_revenue: u64,
    pub avg_order_value: u64,
    pub by_status: Vec<(OrderStatus, u64)>,
    pub by_payment_status: Vec<(PaymentStatus, u64)>,
}

/// Revenue taken on one UTC day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevenueDay {
    pub date: Date,
    pub total_revenue: u64,
    pub order_count: u64,
}

/// A best seller by units sold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopProduct {
    pub product_uuid: ProductUuid,
    pub name: String,
    pub image: Option<String>,
    pub total_sold: u64,
    pub total_revenue: u64,
}

/// Mean order value rounded to the nearest minor unit.
#[must_use]
pub fn average_order_value(total_revenue: u64, total_orders: u64) -> u64 {
    if total_orders == 0 {
        return 0;
    }

    let orders = u128::from(total_orders);
    let average = (u128::from(total_revenue) + orders / 2) / orders;

    u64::try_from(average).unwrap_or(u64::MAX)
}
