//! Availability
//!
//! Sums how many units of each item are committed to bookings around a given
//! day. A booking holds its items from [`LEAD_IN_DAYS`] before pickup (prep and
//! laundry) until its return date, inclusive.

use jiff::{ToSpan, civil::Date};
use rustc_hash::FxHashMap;

use crate::{
    bookings::Booking,
    catalog::{CatalogItem, ItemId},
    stock,
};

/// Days before pickup during which an item is already held for a booking.
pub const LEAD_IN_DAYS: i32 = 5;

/// Booked quantities per item on a given day.
///
/// Sparse: items without overlapping bookings are absent and read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Availability {
    booked: FxHashMap<ItemId, u32>,
}

impl Availability {
    /// Quantity of `item` committed to active bookings.
    pub fn booked_quantity(&self, item: &ItemId) -> u32 {
        self.booked.get(item).copied().unwrap_or(0)
    }

    /// Units of `item` that can still be reserved.
    pub fn effective_stock(&self, item: &CatalogItem) -> u32 {
        stock::effective_stock(item, self.booked_quantity(&item.id))
    }

    /// Iterates over items with a non-zero booked quantity.
    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, u32)> {
        self.booked.iter().map(|(item, quantity)| (item, *quantity))
    }

    /// Number of items with a booked quantity.
    pub fn len(&self) -> usize {
        self.booked.len()
    }

    /// Whether no item is booked.
    pub fn is_empty(&self) -> bool {
        self.booked.is_empty()
    }

    fn add(&mut self, item: &ItemId, quantity: u32) {
        if quantity == 0 {
            return;
        }

        let booked = self.booked.entry(item.clone()).or_insert(0);

        *booked = booked.saturating_add(quantity);
    }
}

/// Whether `booking` holds its items on `as_of`.
pub fn holds_stock(booking: &Booking, as_of: Date) -> bool {
    let held_from = booking
        .period
        .pickup()
        .saturating_sub(LEAD_IN_DAYS.days());

    booking.status.is_active() && held_from <= as_of && booking.period.return_date() >= as_of
}

/// Computes booked quantities for `as_of`, the business-local calendar day.
pub fn availability<'a, I>(bookings: I, as_of: Date) -> Availability
where
    I: IntoIterator<Item = &'a Booking>,
{
    bookings
        .into_iter()
        .filter(|booking| holds_stock(booking, as_of))
        .flat_map(|booking| booking.lines.iter())
        .fold(Availability::default(), |mut availability, line| {
            availability.add(&line.item_id, line.quantity);

            availability
        })
}
