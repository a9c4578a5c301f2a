//! Product Errors

use salvo::http::StatusError;
use tracing::error;

use atelier_app::domain::catalog::CatalogServiceError;

pub(crate) fn into_status_error(error: CatalogServiceError) -> StatusError {
    match error {
        CatalogServiceError::AlreadyExists => {
            StatusError::conflict().brief("A product with this slug already exists")
        }
        CatalogServiceError::InvalidReference
        | CatalogServiceError::MissingRequiredData
        | CatalogServiceError::InvalidData
        | CatalogServiceError::InvalidAmount => {
            StatusError::bad_request().brief("Invalid product payload")
        }
        CatalogServiceError::NotFound => StatusError::not_found(),
        CatalogServiceError::Sql(source) => {
            error!("catalog storage failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
