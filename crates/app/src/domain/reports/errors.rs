//! Reports service errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportsServiceError {
    #[error("report window is out of range")]
    Window(#[from] jiff::Error),

    #[error("storage error")]
    Sql(#[from] sqlx::Error),
}
