//! Statistics Errors

use salvo::http::StatusError;
use tracing::error;

use gennessence_app::domain::reports::ReportsServiceError;

pub(crate) fn into_status_error(error: ReportsServiceError) -> StatusError {
    error!("failed to build report: {error}");

    StatusError::internal_server_error()
}
