//! Export Products Handler

use std::sync::Arc;

use salvo::{
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    prelude::*,
};

use crate::{extensions::*, products::errors::into_status_error, state::State};

/// Export Products Handler
///
/// Downloads the catalogue as `products.csv`.
#[endpoint(
    tags("products"),
    summary = "Export Products",
    security(("bearer_auth" = [])),
    responses((status_code = StatusCode::OK, description = "CSV document")),
)]
pub(crate) async fn handler(depot: &mut Depot, res: &mut Response) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let csv = state
        .app
        .products
        .export_products()
        .await
        .map_err(into_status_error)?;

    res.add_header(CONTENT_TYPE, "text/csv; charset=utf-8", true)
        .or_500("failed to set content type header")?
        .add_header(
            CONTENT_DISPOSITION,
            "attachment; filename=\"products.csv\"",
            true,
        )
        .or_500("failed to set content disposition header")?
        .body(csv);

    Ok(())
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{MockServices, admin_service};

    use super::*;

    #[tokio::test]
    async fn test_export_returns_csv_attachment() -> TestResult {
        let mut services = MockServices::default();

        services
            .products
            .expect_export_products()
            .once()
            .return_once(|| Ok(b"name,price\nStill,20.00\n".to_vec()));

        let mut res = TestClient::get("http://example.com/products/export/csv")
            .send(&admin_service(
                services,
                Router::with_path("products/export/csv").get(handler),
            ))
            .await;

        let disposition = res
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(
            disposition.as_deref(),
            Some("attachment; filename=\"products.csv\"")
        );
        assert_eq!(res.take_string().await?, "name,price\nStill,20.00\n");

        Ok(())
    }
}
