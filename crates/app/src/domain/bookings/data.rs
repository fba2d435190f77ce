//! Bookings Data

use sewa::bookings::BookingStatus;

use crate::domain::customers::records::CustomerUuid;

/// Which bookings to list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookingFilter {
    /// Only this customer's bookings; every customer's when `None`.
    pub customer: Option<CustomerUuid>,

    /// Only bookings in this status.
    pub status: Option<BookingStatus>,
}

impl BookingFilter {
    #[must_use]
    pub fn for_customer(customer: CustomerUuid) -> Self {
        Self {
            customer: Some(customer),
            status: None,
        }
    }

    #[must_use]
    pub fn with_status(self, status: Option<BookingStatus>) -> Self {
        Self { status, ..self }
    }
}
