//! Update Product Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    extensions::*,
    products::{create::ProductRequest, errors::into_status_error, get::ProductResponse},
    state::State,
};

/// Update Product Handler
///
/// Replaces every editable field of a product.
#[endpoint(
    tags("products"),
    summary = "Update Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<ProductRequest>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let details = json.into_inner().into_details()?;

    let product = state
        .app
        .products
        .update_product(product.into_inner().into(), details)
        .await
        .map_err(into_status_error)?;

    Ok(Json(product.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use gennessence_app::domain::products::{
        ProductsServiceError,
        records::{ProductStatus, ProductUuid},
    };

    use crate::{
        products::handlers::tests::make_product,
        test_helpers::{MockServices, admin_service},
    };

    use super::*;

    fn make_service(services: MockServices) -> Service {
        admin_service(services, Router::with_path("products/{product}").put(handler))
    }

    #[tokio::test]
    async fn test_update_product_success() -> TestResult {
        let uuid = ProductUuid::new();
        let mut services = MockServices::default();

        services
            .products
            .expect_update_product()
            .once()
            .withf(move |product, update| {
                *product == uuid
                    && update.price == 2_750
                    && update.stock == 12
                    && update.status == ProductStatus::Inactive
            })
            .return_once(|uuid, update| {
                let mut product = make_product(uuid, update.price);
                product.status = update.status;
                Ok(product)
            });

        let body: ProductResponse = TestClient::put(format!("http://example.com/products/{uuid}"))
            .json(&json!({
                "name": "Alkaline Still",
                "ph": 9.5,
                "size": "500ml",
                "price": 2_750,
                "stock": 12,
                "status": "inactive",
            }))
            .send(&make_service(services))
            .await
            .take_json()
            .await?;

        assert_eq!(body.price, 2_750);
        assert_eq!(body.status, "inactive");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_product_returns_404() -> TestResult {
        let mut services = MockServices::default();

        services
            .products
            .expect_update_product()
            .once()
            .return_once(|_, _| Err(ProductsServiceError::NotFound));

        let res = TestClient::put(format!("http://example.com/products/{}", ProductUuid::new()))
            .json(&json!({ "name": "Still", "ph": 7.0, "size": "500ml", "price": 100 }))
            .send(&make_service(services))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
