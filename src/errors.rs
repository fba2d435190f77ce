//! Validation errors shared across the engine.

use jiff::civil::Date;
use thiserror::Error;

use crate::catalog::ItemId;

/// Malformed input rejected before any stock or state is consulted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A quantity of zero was requested.
    #[error("quantity must be at least 1")]
    NonPositiveQuantity,

    /// Rental duration outside the permitted bounds.
    #[error("rental days must be between {min} and {max}, got {days}")]
    RentalDaysOutOfRange {
        /// Requested number of days.
        days: i64,
        /// Lower bound (inclusive).
        min: u32,
        /// Upper bound (inclusive).
        max: u32,
    },

    /// Return date is on or before the pickup date.
    #[error("return date {return_date} must be after pickup date {pickup}")]
    ReturnNotAfterPickup {
        /// Pickup date.
        pickup: Date,
        /// Return date.
        return_date: Date,
    },

    /// A booking or cart payload without any lines.
    #[error("at least one line is required")]
    NoLines,

    /// The same item appears more than once.
    #[error("item {0} appears more than once")]
    DuplicateItem(ItemId),

    /// Unknown booking status.
    #[error("unknown booking status: {0}")]
    UnknownStatus(String),

    /// Unknown catalog category.
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// Booking code not of the form `TRX-NNNN-YYYY`.
    #[error("malformed booking code: {0}")]
    MalformedBookingCode(String),
}
