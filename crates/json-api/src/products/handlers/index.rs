//! Product Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use gennessence_app::domain::products::{
    data::{ProductFilter, ProductSort},
    records::ProductStatus,
};

use crate::{
    extensions::*,
    products::{errors::into_status_error, get::ProductResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsResponse {
    /// The list of products
    pub products: Vec<ProductResponse>,
}

/// Product Index Handler
///
/// Returns the catalogue, newest first unless a sort is given.
#[endpoint(tags("products"), summary = "List Products")]
pub(crate) async fn handler(
    search: QueryParam<String, false>,
    status: QueryParam<String, false>,
    sort: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let filter = ProductFilter {
        search: search
            .into_inner()
            .map(|search| search.trim().to_string())
            .filter(|search| !search.is_empty()),
        status: status
            .into_inner()
            .map(|status| status.parse::<ProductStatus>())
            .transpose()
            .or_400("invalid status")?,
        sort: sort
            .into_inner()
            .map(|sort| sort.parse::<ProductSort>())
            .transpose()
            .or_400("invalid sort")?,
    };

    let products = state
        .app
        .products
        .list_products(filter)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ProductsResponse {
        products: products.into_iter().map(Into::into).collect(),
    }))
}
