//! Booking Records

use jiff::Timestamp;
use sewa::bookings::Booking;

use crate::{domain::customers::records::CustomerUuid, uuids::TypedUuid};

/// Booking UUID
pub type BookingUuid = TypedUuid<BookingRecord>;

/// Booking Record
#[derive(Debug, Clone)]
pub struct BookingRecord {
    pub uuid: BookingUuid,
    pub customer: CustomerUuid,
    pub booking: Booking,
    pub updated_at: Timestamp,
}
