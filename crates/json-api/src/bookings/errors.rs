//! Booking Errors

use salvo::http::StatusError;
use tracing::error;

use sewa_app::domain::bookings::BookingsServiceError;

pub(crate) fn into_status_error(error: BookingsServiceError) -> StatusError {
    match error {
        BookingsServiceError::NotFound => StatusError::not_found().brief("Booking not found"),
        BookingsServiceError::Validation(source) => {
            StatusError::bad_request().brief(source.to_string())
        }
        BookingsServiceError::UnknownItem(item) => {
            StatusError::bad_request().brief(format!("Unknown item: {item}"))
        }
        BookingsServiceError::StockUnavailable(_) => {
            StatusError::conflict().brief("Item fully booked")
        }
        BookingsServiceError::InvalidTransition(source) => {
            StatusError::conflict().brief(source.to_string())
        }
        BookingsServiceError::Pricing(_)
        | BookingsServiceError::InvalidReference
        | BookingsServiceError::MissingRequiredData
        | BookingsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid booking payload")
        }
        BookingsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Booking already exists")
        }
        BookingsServiceError::CodeSpaceExhausted => {
            error!("no booking code could be allocated");

            StatusError::service_unavailable().brief("Could not allocate a booking code")
        }
        BookingsServiceError::Sql(source) => {
            error!("bookings storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;
    use sewa::{
        bookings::{BookingStatus, TransitionError},
        errors::ValidationError,
        stock::StockError,
    };

    use super::*;

    #[test]
    fn status_mapping() {
        let cases = [
            (BookingsServiceError::NotFound, StatusCode::NOT_FOUND),
            (
                BookingsServiceError::Validation(ValidationError::NoLines),
                StatusCode::BAD_REQUEST,
            ),
            (
                BookingsServiceError::StockUnavailable(StockError::Unavailable {
                    item: "kebaya".into(),
                    requested: 3,
                    available: 1,
                }),
                StatusCode::CONFLICT,
            ),
            (
                BookingsServiceError::InvalidTransition(TransitionError::Terminal(
                    BookingStatus::Completed,
                )),
                StatusCode::CONFLICT,
            ),
            (
                BookingsServiceError::CodeSpaceExhausted,
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(into_status_error(error).code, expected);
        }
    }

    #[test]
    fn stock_conflict_says_fully_booked() {
        let status = into_status_error(BookingsServiceError::StockUnavailable(
            StockError::Unavailable {
                item: "kebaya".into(),
                requested: 1,
                available: 0,
            },
        ));

        assert_eq!(status.brief, "Item fully booked");
    }
}
