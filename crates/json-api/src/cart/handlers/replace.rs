//! Replace Cart Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    cart::{
        errors::into_status_error,
        get::{CartItemBody, CartResponse},
    },
    extensions::*,
    state::State,
};

/// Replace Cart Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReplaceCartRequest {
    /// Every line the cart should hold afterwards
    pub items: Vec<CartItemBody>,
}

/// Replace Cart Handler
///
/// Overwrites the stored cart with the client's snapshot.
#[endpoint(
    tags("cart"),
    summary = "Replace Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart stored"),
        (status_code = StatusCode::BAD_REQUEST, description = "Zero quantity or duplicate line"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ReplaceCartRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let current = depot.current_user_or_401()?;

    let items = json.into_inner().items.into_iter().map(Into::into).collect();

    let cart = state
        .app
        .carts
        .replace_items(current.user_uuid, items)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
