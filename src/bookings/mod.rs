//! Bookings

use jiff::{Timestamp, civil::Date};
use smallvec::SmallVec;

use crate::{catalog::ItemId, errors::ValidationError, pricing::RentalDays};

mod code;
mod status;

pub use code::BookingCode;
pub use status::{BookingStatus, TransitionError};

/// Lines of a booking; most bookings rent a handful of items.
pub type BookingLines = SmallVec<[BookingLine; 4]>;

/// Pickup and return dates of a rental, with `return_date > pickup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentalPeriod {
    pickup: Date,
    return_date: Date,
}

impl RentalPeriod {
    /// Creates a rental period.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ReturnNotAfterPickup`] unless `return_date` is after `pickup`.
    pub fn new(pickup: Date, return_date: Date) -> Result<Self, ValidationError> {
        if return_date <= pickup {
            return Err(ValidationError::ReturnNotAfterPickup {
                pickup,
                return_date,
            });
        }

        Ok(Self {
            pickup,
            return_date,
        })
    }

    /// Day the items are collected.
    pub const fn pickup(&self) -> Date {
        self.pickup
    }

    /// Day the items are due back.
    pub const fn return_date(&self) -> Date {
        self.return_date
    }

    /// Number of calendar days between pickup and return.
    pub fn days(&self) -> i64 {
        self.return_date
            .since(self.pickup)
            .map_or(0, |span| i64::from(span.get_days()))
    }

    /// The period's length as a bounded rental duration.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::RentalDaysOutOfRange`] for periods longer than the maximum.
    pub fn rental_days(&self) -> Result<RentalDays, ValidationError> {
        RentalDays::from_days(self.days())
    }
}

/// A booked quantity of one item, priced when the booking was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingLine {
    /// Booked item.
    pub item_id: ItemId,

    /// Number of units, at least 1.
    pub quantity: u32,

    /// Base price per unit frozen at booking time.
    pub unit_price: u64,
}

/// A customer's rental of one or more items over a period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    /// Human-readable reference.
    pub code: BookingCode,

    /// Lifecycle status.
    pub status: BookingStatus,

    /// Pickup and return dates.
    pub period: RentalPeriod,

    /// Booked items.
    pub lines: BookingLines,

    /// Amount charged for the whole booking.
    pub total_price: u64,

    /// Creation time.
    pub created_at: Timestamp,
}

impl Booking {
    /// Total quantity of `item` across this booking's lines.
    pub fn quantity_of(&self, item: &ItemId) -> u32 {
        self.lines
            .iter()
            .filter(|line| &line.item_id == item)
            .fold(0_u32, |acc, line| acc.saturating_add(line.quantity))
    }

    /// Applies the lazy expiry rule, returning `true` if the status changed.
    pub fn complete_if_expired(&mut self, today: Date) -> bool {
        match self.status.expired(self.period.return_date(), today) {
            Some(status) => {
                self.status = status;

                true
            }
            None => false,
        }
    }
}
