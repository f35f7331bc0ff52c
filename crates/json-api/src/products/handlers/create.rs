//! Create Product Handler

use std::sync::Arc;

use rust_decimal::Decimal;
use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use gennessence_app::domain::products::{
    data::{NewProduct, ProductDetails},
    records::{ProductStatus, ProductUuid},
};

use crate::{
    extensions::*,
    products::{errors::into_status_error, get::ProductResponse},
    state::State,
};

/// Product Request
///
/// Body of both create and update.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductRequest {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// pH on the 0 to 14 scale
    pub ph: f64,

    pub size: String,

    /// The price of the product in cents
    pub price: u64,

    #[serde(default)]
    pub image: String,

    #[serde(default)]
    pub benefits: Vec<String>,

    #[serde(default)]
    pub stock: u32,

    /// `active` (default) or `inactive`
    pub status: Option<String>,
}

impl ProductRequest {
    pub(crate) fn into_details(self) -> Result<ProductDetails, StatusError> {
        let ph = Decimal::try_from(self.ph).or_400("invalid ph")?.round_dp(2);

        let status = self
            .status
            .as_deref()
            .map(str::parse::<ProductStatus>)
            .transpose()
            .or_400("invalid status")?
            .unwrap_or_default();

        Ok(ProductDetails {
            name: self.name,
            description: self.description,
            ph,
            size: self.size,
            price: self.price,
            image: self.image,
            benefits: self
                .benefits
                .into_iter()
                .map(|benefit| benefit.trim().to_string())
                .filter(|benefit| !benefit.is_empty())
                .collect(),
            stock: self.stock,
            status,
        })
    }
}

/// Create Product Handler
#[endpoint(
    tags("products"),
    summary = "Create Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
        (status_code = StatusCode::CONFLICT, description = "Product already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ProductRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let product = state
        .app
        .products
        .create_product(NewProduct {
            uuid: ProductUuid::new(),
            details: json.into_inner().into_details()?,
        })
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/api/products/{}", product.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(product.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use gennessence_app::domain::products::{ProductsServiceError, records::ProductRecord};

    use crate::test_helpers::{MockServices, admin_service};

    use super::*;

    fn make_service(services: MockServices) -> Service {
        admin_service(services, Router::with_path("products").post(handler))
    }

    fn stored(new: NewProduct) -> ProductRecord {
        let mut product = crate::products::handlers::tests::make_product(new.uuid, 0);

        product.name = new.details.name;
        product.ph = new.details.ph;
        product.price = new.details.price;
        product.benefits = new.details.benefits;
        product.status = new.details.status;

        product
    }

    #[tokio::test]
    async fn test_create_product_success() -> TestResult {
        let mut services = MockServices::default();

        services
            .products
            .expect_create_product()
            .once()
            .withf(|new| {
                new.details.name == "Sparkling"
                    && new.details.ph == Decimal::new(8, 0)
                    && new.details.price == 3_250
                    && new.details.benefits.as_slice() == ["Minerals".to_string()]
                    && new.details.status == ProductStatus::Active
            })
            .return_once(|new| Ok(stored(new)));

        let mut res = TestClient::post("http://example.com/products")
            .json(&json!({
                "name": "Sparkling",
                "ph": 8.0,
                "size": "1L",
                "price": 3_250,
                "benefits": ["Minerals", " "],
            }))
            .send(&make_service(services))
            .await;

        let body: ProductResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(
            location,
            Some(format!("/api/products/{}", body.uuid).as_str())
        );
        assert_eq!(body.ph, "8");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_invalid_data_returns_400() -> TestResult {
        let mut services = MockServices::default();

        services
            .products
            .expect_create_product()
            .once()
            .return_once(|_| Err(ProductsServiceError::InvalidData));

        let res = TestClient::post("http://example.com/products")
            .json(&json!({ "name": "Acid", "ph": 15.0, "size": "1L", "price": 100 }))
            .send(&make_service(services))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_unknown_status_returns_400() -> TestResult {
        let res = TestClient::post("http://example.com/products")
            .json(&json!({
                "name": "Still",
                "ph": 7.0,
                "size": "500ml",
                "price": 100,
                "status": "archived",
            }))
            .send(&make_service(MockServices::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
