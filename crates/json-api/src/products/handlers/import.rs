//! Import Products Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, products::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ImportResponse {
    /// Number of products created
    pub imported: usize,
}

/// Import Products Handler
///
/// Accepts a multipart upload with the CSV in the `file` field. Either every
/// row is imported or none is.
#[endpoint(
    tags("products"),
    summary = "Import Products",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Products imported"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing or invalid CSV"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<ImportResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let file = req
        .file("file")
        .await
        .ok_or_else(|| StatusError::bad_request().brief("CSV file is required"))?;

    let csv = tokio::fs::read(file.path())
        .await
        .or_500("failed to read uploaded csv")?;

    let imported = state
        .app
        .products
        .import_products(&csv)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ImportResponse { imported }))
}
