//! Orders Data

use std::str::FromStr;

use gennessence::{
    checkout::{OrderDraftItem, ShippingAddress},
    orders::{OrderStatus, PaymentStatus},
};
use jiff::Timestamp;

use crate::domain::{InvalidValue, orders::records::OrderUuid};

/// New Order Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub items: Vec<OrderDraftItem>,
    pub shipping_address: ShippingAddress,
}

/// Fulfilment update made by an administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub status: OrderStatus,
    pub tracking_number: Option<String>,
    pub notes: Option<String>,
}

/// Payment update made by an administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentUpdate {
    pub payment_status: PaymentStatus,
    pub payment_id: Option<String>,
}

/// Order listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSort {
    DateAsc,
    DateDesc,
    TotalAsc,
    TotalDesc,
}

impl OrderSort {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DateAsc => "date_asc",
            Self::DateDesc => "date_desc",
            Self::TotalAsc => "total_asc",
            Self::TotalDesc => "total_desc",
        }
    }
}

impl FromStr for OrderSort {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date_asc" => Ok(Self::DateAsc),
            "date_desc" => Ok(Self::DateDesc),
            "total_asc" => Ok(Self::TotalAsc),
            "total_desc" => Ok(Self::TotalDesc),
            other => Err(InvalidValue::new("sort", other)),
        }
    }
}

/// Admin order listing filter; newest first when no sort is given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    /// Inclusive creation time range.
    pub created_between: Option<(Timestamp, Timestamp)>,
    pub sort: Option<OrderSort>,
}
