//! Cart Errors

use salvo::http::StatusError;
use tracing::error;

use sewa_app::domain::carts::CartsServiceError;

use crate::observability::record_stock_rejection;

/// Maps a cart failure raised by `operation`, counting stock refusals.
pub(crate) fn rejection(operation: &'static str) -> impl FnOnce(CartsServiceError) -> StatusError {
    move |error| {
        if matches!(error, CartsServiceError::StockUnavailable(_)) {
            record_stock_rejection(operation);
        }

        into_status_error(error)
    }
}

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::NotFound => StatusError::not_found(),
        CartsServiceError::Validation(source) => {
            StatusError::bad_request().brief(source.to_string())
        }
        CartsServiceError::UnknownItem(item) => {
            StatusError::not_found().brief(format!("Unknown item: {item}"))
        }
        CartsServiceError::StockUnavailable(_) => {
            StatusError::conflict().brief("Item fully booked")
        }
        CartsServiceError::AlreadyExists => StatusError::conflict(),
        CartsServiceError::Pricing(_)
        | CartsServiceError::InvalidReference
        | CartsServiceError::MissingRequiredData
        | CartsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid cart payload")
        }
        CartsServiceError::Sql(source) => {
            error!("carts storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}
