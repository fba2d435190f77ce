//! Booking status state machine.
//!
//! ```text
//! Pending ──► Confirmed ──► OutOnRent ──► Completed
//!    │            │
//!    └────────────┴──► Cancelled
//! ```
//!
//! `Completed` and `Cancelled` are terminal. Besides the administrative edges,
//! an `OutOnRent` booking whose return date has passed is completed lazily the
//! next time it is read (see [`BookingStatus::expired`]).

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::ValidationError;

/// Lifecycle state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Created by checkout, awaiting offline payment confirmation ("Menunggu").
    Pending,

    /// Payment confirmed by an admin ("Konfirmasi").
    Confirmed,

    /// Items handed over to the customer ("Sedang Disewa").
    OutOnRent,

    /// Items returned ("Selesai").
    Completed,

    /// Booking cancelled before pickup ("Dibatalkan").
    Cancelled,
}

/// Rejected status change.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TransitionError {
    /// The booking is in a terminal state.
    #[error("booking is {0} and can no longer change")]
    Terminal(BookingStatus),

    /// The edge does not exist in the state machine.
    #[error("cannot move booking from {from} to {to}")]
    Invalid {
        /// Current status.
        from: BookingStatus,
        /// Requested status.
        to: BookingStatus,
    },
}

impl BookingStatus {
    /// Statuses whose bookings hold stock.
    pub const ACTIVE: [BookingStatus; 3] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::OutOnRent,
    ];

    /// Whether bookings in this status hold stock.
    pub const fn is_active(self) -> bool {
        matches!(
            self,
            BookingStatus::Pending | BookingStatus::Confirmed | BookingStatus::OutOnRent
        )
    }

    /// Whether no further transition is possible.
    pub const fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// Whether `next` is reachable from this status in one step.
    pub const fn can_transition_to(self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Confirmed | BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::OutOnRent | BookingStatus::Cancelled)
                | (BookingStatus::OutOnRent, BookingStatus::Completed)
        )
    }

    /// Validates and applies a transition.
    ///
    /// # Errors
    ///
    /// - [`TransitionError::Terminal`]: the current status is terminal.
    /// - [`TransitionError::Invalid`]: `next` is not reachable from the current status.
    pub fn transition_to(self, next: BookingStatus) -> Result<BookingStatus, TransitionError> {
        if self.is_terminal() {
            return Err(TransitionError::Terminal(self));
        }

        if !self.can_transition_to(next) {
            return Err(TransitionError::Invalid {
                from: self,
                to: next,
            });
        }

        Ok(next)
    }

    /// Returns the status a reader must see once the rental period has lapsed.
    ///
    /// Only `OutOnRent` bookings whose `return_date` is strictly before `today`
    /// expire; everything else returns `None`.
    pub fn expired(self, return_date: Date, today: Date) -> Option<BookingStatus> {
        (self == BookingStatus::OutOnRent && return_date < today).then_some(BookingStatus::Completed)
    }

    /// Persisted representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::OutOnRent => "out_on_rent",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Customer-facing label.
    pub const fn label(self) -> &'static str {
        match self {
            BookingStatus::Pending => "Menunggu",
            BookingStatus::Confirmed => "Konfirmasi",
            BookingStatus::OutOnRent => "Sedang Disewa",
            BookingStatus::Completed => "Selesai",
            BookingStatus::Cancelled => "Dibatalkan",
        }
    }
}

impl Display for BookingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalised = value.trim();

        [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::OutOnRent,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ]
        .into_iter()
        .find(|status| {
            status.as_str().eq_ignore_ascii_case(normalised)
                || status.label().eq_ignore_ascii_case(normalised)
        })
        .ok_or_else(|| ValidationError::UnknownStatus(value.to_string()))
    }
}
