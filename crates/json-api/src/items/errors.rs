//! Item Errors

use salvo::http::StatusError;
use tracing::error;

use sewa_app::domain::catalog::CatalogServiceError;

pub(crate) fn into_status_error(error: CatalogServiceError) -> StatusError {
    match error {
        CatalogServiceError::AlreadyExists => StatusError::conflict().brief("Item already exists"),
        CatalogServiceError::NotFound => StatusError::not_found().brief("Item not found"),
        CatalogServiceError::InvalidReference
        | CatalogServiceError::MissingRequiredData
        | CatalogServiceError::InvalidData
        | CatalogServiceError::InvalidPrice(_) => {
            StatusError::bad_request().brief("Invalid item payload")
        }
        CatalogServiceError::Sql(source) => {
            error!("catalog storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}
