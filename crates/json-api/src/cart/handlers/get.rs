//! Get Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gennessence::cart::{CartItem, CartKey};
use gennessence_app::domain::carts::records::CartRecord;

use crate::{cart::errors::into_status_error, extensions::*, state::State};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The unique identifier of the cart
    pub uuid: Uuid,

    /// The lines in the cart, in the order the shopper added them
    pub items: Vec<CartItemBody>,

    /// The date and time the cart was created
    pub created_at: String,

    /// The date and time the cart was last updated
    pub updated_at: String,
}

impl From<CartRecord> for CartResponse {
    fn from(cart: CartRecord) -> Self {
        CartResponse {
            uuid: cart.uuid.into(),
            items: cart.items.into_iter().map(CartItemBody::from).collect(),
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
        }
    }
}

/// One cart line, as stored by the client.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemBody {
    /// Line key, `{name}-{size}`
    pub id: String,

    pub product_uuid: Uuid,
    pub name: String,
    pub size: String,

    /// Unit price in cents
    pub price: u64,

    pub qty: u32,

    #[serde(default)]
    pub image: String,

    #[serde(default)]
    pub color: String,
}

impl From<CartItem> for CartItemBody {
    fn from(item: CartItem) -> Self {
        CartItemBody {
            id: item.id.to_string(),
            product_uuid: item.product_uuid,
            name: item.name,
            size: item.size,
            price: item.price,
            qty: item.qty,
            image: item.image,
            color: item.color,
        }
    }
}

impl From<CartItemBody> for CartItem {
    fn from(item: CartItemBody) -> Self {
        CartItem {
            id: CartKey::from(item.id.as_str()),
            product_uuid: item.product_uuid,
            name: item.name,
            size: item.size,
            price: item.price,
            qty: item.qty,
            image: item.image,
            color: item.color,
        }
    }
}

/// Get Cart Handler
///
/// Returns the current user's cart, creating an empty one on first access.
#[endpoint(tags("cart"), summary = "Get Cart", security(("bearer_auth" = [])))]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let current = depot.current_user_or_401()?;

    let cart = state
        .app
        .carts
        .get_cart(current.user_uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
