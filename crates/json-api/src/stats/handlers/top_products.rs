//! Top Products Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gennessence_app::domain::reports::records::TopProduct;

use crate::{extensions::*, state::State, stats::errors::into_status_error};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TopProductsResponse {
    pub products: Vec<TopProductResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TopProductResponse {
    pub product_uuid: Uuid,
    pub name: String,
    pub image: Option<String>,

    /// Units sold
    pub total_sold: u64,

    /// Revenue in cents
    pub total_revenue: u64,
}

impl From<TopProduct> for TopProductResponse {
    fn from(product: TopProduct) -> Self {
        TopProductResponse {
            product_uuid: product.product_uuid.into(),
            name: product.name,
            image: product.image,
            total_sold: product.total_sold,
            total_revenue: product.total_revenue,
        }
    }
}

/// Top Products Handler
///
/// The five best sellers by units sold.
#[endpoint(tags("stats"), summary = "Top Products", security(("bearer_auth" = [])))]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<TopProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let products = state
        .app
        .reports
        .top_products()
        .await
        .map_err(into_status_error)?;

    Ok(Json(TopProductsResponse {
        products: products.into_iter().map(Into::into).collect(),
    }))
}
