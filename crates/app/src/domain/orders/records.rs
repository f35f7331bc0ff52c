//! Order Records

use gennessence::{
    checkout::ShippingAddress,
    orders::{OrderStatus, PaymentStatus},
};
use jiff::Timestamp;

use crate::{
    domain::{products::records::ProductUuid, users::records::UserUuid},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Record
#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub customer_name: String,
    pub customer_email: String,
    pub items: Vec<OrderItemRecord>,
    pub total: u64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_id: Option<String>,
    pub shipping_address: ShippingAddress,
    pub tracking_number: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl OrderRecord {
    #[must_use]
    pub fn is_owned_by(&self, user: UserUuid) -> bool {
        self.user_uuid == user
    }
}

/// Order line with the product name and unit price captured at purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemRecord {
    pub product_uuid: ProductUuid,
    pub name: String,
    pub quantity: u32,
    pub price: u64,
}

impl OrderItemRecord {
    #[must_use]
    pub fn line_total(&self) -> u64 {
        self.price.saturating_mul(u64::from(self.quantity))
    }
}
