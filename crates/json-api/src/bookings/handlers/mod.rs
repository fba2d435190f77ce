//! Booking Handlers

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use sewa_app::domain::bookings::records::BookingRecord;

pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod transition;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BookingLineResponse {
    pub item_id: String,
    pub quantity: u32,

    /// Base price frozen when the booking was made
    pub unit_price: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BookingResponse {
    /// `TRX-NNNN-YYYY`
    pub code: String,

    /// `pending`, `confirmed`, `out_on_rent`, `completed` or `cancelled`
    pub status: String,

    /// Display label, e.g. `Menunggu`
    pub status_label: String,

    pub pickup_date: String,
    pub return_date: String,
    pub rental_days: i64,
    pub lines: Vec<BookingLineResponse>,
    pub total_price: u64,
    pub created_at: String,
}

impl From<BookingRecord> for BookingResponse {
    fn from(record: BookingRecord) -> Self {
        let booking = record.booking;

        BookingResponse {
            code: booking.code.to_string(),
            status: booking.status.as_str().to_string(),
            status_label: booking.status.label().to_string(),
            pickup_date: booking.period.pickup().to_string(),
            return_date: booking.period.return_date().to_string(),
            rental_days: booking.period.days(),
            lines: booking
                .lines
                .iter()
                .map(|line| BookingLineResponse {
                    item_id: line.item_id.to_string(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                })
                .collect(),
            total_price: booking.total_price,
            created_at: booking.created_at.to_string(),
        }
    }
}
