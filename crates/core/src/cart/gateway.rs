//! Cart Gateway
//!
//! Remote side of the cart: the per-user cart held by the storefront API.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::CartItem;
use crate::{
    credential::Credential,
    http::{ApiClient, ApiError},
};

/// Remote cart operations, authenticated by a bearer credential.
#[automock]
#[async_trait]
pub trait CartGateway: Send + Sync {
    /// Fetch the user's remote cart. A user without a cart has no items.
    async fn get_cart(&self, credential: &Credential) -> Result<Vec<CartItem>, GatewayError>;

    /// Replace the user's remote cart with `items`.
    async fn set_cart(&self, credential: &Credential, items: &[CartItem])
    -> Result<(), GatewayError>;

    /// Empty the user's remote cart.
    async fn clear_cart(&self, credential: &Credential) -> Result<(), GatewayError>;
}

/// Cart gateway talking to the storefront JSON API.
#[derive(Debug, Clone)]
pub struct HttpCartGateway {
    client: ApiClient,
}

impl HttpCartGateway {
    /// Gateway using `client` for requests.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct CartPayload {
    #[serde(default)]
    items: Vec<CartItem>,
}

#[derive(Debug, Serialize)]
struct SetCartRequest<'a> {
    items: &'a [CartItem],
}

#[async_trait]
impl CartGateway for HttpCartGateway {
    async fn get_cart(&self, credential: &Credential) -> Result<Vec<CartItem>, GatewayError> {
        let request = self.client.request(Method::GET, "/api/cart", Some(credential));

        let payload: Option<CartPayload> = self.client.send_json(request).await?;

        Ok(payload.map(|payload| payload.items).unwrap_or_default())
    }

    async fn set_cart(
        &self,
        credential: &Credential,
        items: &[CartItem],
    ) -> Result<(), GatewayError> {
        let request = self
            .client
            .request(Method::POST, "/api/cart", Some(credential))
            .json(&SetCartRequest { items });

        self.client.send(request).await?;

        Ok(())
    }

    async fn clear_cart(&self, credential: &Credential) -> Result<(), GatewayError> {
        let request = self
            .client
            .request(Method::DELETE, "/api/cart", Some(credential));

        self.client.send(request).await?;

        Ok(())
    }
}

/// Errors from the remote cart.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The API request failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The remote cart could not be reached for another reason.
    #[error("cart backend unavailable: {0}")]
    Unavailable(String),
}
