//! Cart test fixtures.

use uuid::Uuid;

use super::{CartItem, CartProduct};
use crate::money::MinorUnits;

pub(crate) fn product(name: &str, size: &str, price: MinorUnits) -> CartProduct {
    CartProduct {
        product_uuid: Uuid::nil(),
        name: name.to_owned(),
        size: size.to_owned(),
        price,
        image: format!("/images/{name}.png"),
        color: "blue".to_owned(),
    }
}

pub(crate) fn item(name: &str, size: &str, price: MinorUnits, qty: u32) -> CartItem {
    CartItem::new(product(name, size, price), qty)
}
