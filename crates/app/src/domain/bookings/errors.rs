//! Bookings service errors.

use sewa::{
    bookings::TransitionError,
    catalog::ItemId,
    checkout::CheckoutError,
    errors::ValidationError,
    pricing::PricingError,
    stock::StockError,
};
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BookingsServiceError {
    #[error("booking already exists")]
    AlreadyExists,

    #[error("booking not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("invalid booking request")]
    Validation(#[from] ValidationError),

    #[error("unknown item: {0}")]
    UnknownItem(ItemId),

    #[error("item fully booked")]
    StockUnavailable(#[source] StockError),

    #[error("invalid status transition")]
    InvalidTransition(#[from] TransitionError),

    #[error("booking total could not be computed")]
    Pricing(#[from] PricingError),

    #[error("no free booking code left")]
    CodeSpaceExhausted,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<CheckoutError> for BookingsServiceError {
    fn from(error: CheckoutError) -> Self {
        match error {
            CheckoutError::Validation(error) => Self::Validation(error),
            CheckoutError::UnknownItem(item) => Self::UnknownItem(item),
            CheckoutError::Stock(error) => Self::StockUnavailable(error),
            CheckoutError::Pricing(error) => Self::Pricing(error),
        }
    }
}

impl From<Error> for BookingsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
