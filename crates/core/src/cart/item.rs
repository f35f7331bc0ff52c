//! Cart Items

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::MinorUnits;

/// Identity of a cart line: one line per product name and size.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartKey(String);

impl CartKey {
    /// Key for a product name and size, e.g. `"Still Water-500ml"`.
    pub fn new(name: &str, size: &str) -> Self {
        Self(format!("{name}-{size}"))
    }

    /// Key as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CartKey {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for CartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A product variant the shopper picked on a product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartProduct {
    pub product_uuid: Uuid,
    pub name: String,
    pub size: String,
    pub price: MinorUnits,
    pub image: String,
    pub color: String,
}

impl CartProduct {
    /// Line key this product would be stored under.
    pub fn key(&self) -> CartKey {
        CartKey::new(&self.name, &self.size)
    }
}

/// Cart line item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartKey,
    pub product_uuid: Uuid,
    pub name: String,
    pub size: String,
    pub price: MinorUnits,
    pub qty: u32,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub color: String,
}

impl CartItem {
    /// Create a line for `qty` units of `product`.
    pub fn new(product: CartProduct, qty: u32) -> Self {
        Self {
            id: product.key(),
            product_uuid: product.product_uuid,
            name: product.name,
            size: product.size,
            price: product.price,
            qty,
            image: product.image,
            color: product.color,
        }
    }

    /// Unit price multiplied by quantity.
    pub fn line_total(&self) -> MinorUnits {
        self.price.saturating_mul(MinorUnits::from(self.qty))
    }
}

/// Merge a signed-in user's remote cart with the anonymous local cart.
///
/// Remote lines keep their order. Local lines whose key matches a remote line
/// add their quantity to it; the remaining local lines are appended in local
/// order. No key appears twice in the result.
pub fn merge_items(remote: Vec<CartItem>, local: &[CartItem]) -> Vec<CartItem> {
    let mut merged: Vec<CartItem> = Vec::with_capacity(remote.len() + local.len());
    let mut positions: FxHashMap<CartKey, usize> = FxHashMap::default();

    for item in remote.into_iter().chain(local.iter().cloned()) {
        match positions.get(&item.id).and_then(|&idx| merged.get_mut(idx)) {
            Some(existing) => existing.qty = existing.qty.saturating_add(item.qty),
            None => {
                positions.insert(item.id.clone(), merged.len());
                merged.push(item);
            }
        }
    }

    merged
}
