//! Cart
//!
//! A cart holds at most one entry per item. Rental duration is cart-global:
//! every entry carries the same [`RentalDays`], which [`Cart::set_rental_days`]
//! keeps in sync.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    catalog::{CatalogItem, ItemId},
    errors::ValidationError,
    pricing::{self, PricingError, RentalDays},
    stock::{self, StockError},
};

/// Errors raised by cart mutations. The cart is left untouched on error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CartError {
    /// Malformed input.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The stock gate refused the quantity.
    #[error(transparent)]
    Stock(StockError),
}

impl From<StockError> for CartError {
    fn from(error: StockError) -> Self {
        match error {
            StockError::InvalidQuantity => Self::Validation(ValidationError::NonPositiveQuantity),
            StockError::Unavailable { .. } => Self::Stock(error),
        }
    }
}

/// One item in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    /// Item in the cart.
    pub item_id: ItemId,

    /// Number of units, at least 1.
    pub quantity: u32,

    /// Rental duration.
    #[serde(default)]
    pub rental_days: RentalDays,
}

/// A customer's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from entries, enforcing one entry per item and positive quantities.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::DuplicateItem`]: an item appears twice.
    /// - [`ValidationError::NonPositiveQuantity`]: an entry has a zero quantity.
    pub fn from_entries(entries: Vec<CartEntry>) -> Result<Self, ValidationError> {
        let mut seen = FxHashSet::default();

        for entry in &entries {
            if entry.quantity == 0 {
                return Err(ValidationError::NonPositiveQuantity);
            }

            if !seen.insert(&entry.item_id) {
                return Err(ValidationError::DuplicateItem(entry.item_id.clone()));
            }
        }

        Ok(Self { entries })
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Consumes the cart, returning its entries.
    pub fn into_entries(self) -> Vec<CartEntry> {
        self.entries
    }

    /// Entry for `item`, if present.
    pub fn get(&self, item: &ItemId) -> Option<&CartEntry> {
        self.entries.iter().find(|entry| &entry.item_id == item)
    }

    /// Whether the cart has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct items.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Cart-global rental duration.
    pub fn rental_days(&self) -> RentalDays {
        self.entries
            .first()
            .map_or_else(RentalDays::default, |entry| entry.rental_days)
    }

    /// Sets the rental duration for every entry.
    pub fn set_rental_days(&mut self, rental_days: RentalDays) {
        for entry in &mut self.entries {
            entry.rental_days = rental_days;
        }
    }

    /// Adds `quantity` units of `item`, on top of any already in the cart.
    ///
    /// `booked` is the item's booked quantity from the current availability.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a zero quantity, or a stock error if the
    /// resulting quantity exceeds the item's effective stock.
    pub fn add(
        &mut self,
        item: &CatalogItem,
        booked: u32,
        quantity: u32,
    ) -> Result<&CartEntry, CartError> {
        if quantity == 0 {
            return Err(ValidationError::NonPositiveQuantity.into());
        }

        let existing = self.get(&item.id).map_or(0, |entry| entry.quantity);
        let total = existing.saturating_add(quantity);

        stock::reserve(item, booked, total)?;

        Ok(self.upsert(item.id.clone(), total))
    }

    /// Replaces the quantity of `item`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a zero quantity, or a stock error if
    /// `quantity` exceeds the item's effective stock.
    pub fn set_quantity(
        &mut self,
        item: &CatalogItem,
        booked: u32,
        quantity: u32,
    ) -> Result<&CartEntry, CartError> {
        stock::reserve(item, booked, quantity)?;

        Ok(self.upsert(item.id.clone(), quantity))
    }

    /// Removes `item`, returning its entry if it was present.
    pub fn remove(&mut self, item: &ItemId) -> Option<CartEntry> {
        let index = self.entries.iter().position(|entry| &entry.item_id == item)?;

        Some(self.entries.remove(index))
    }

    /// Folds a client-held cart into this one (see [`merge`]).
    ///
    /// When `local` has entries, its duration becomes the cart duration.
    pub fn merge_local(&mut self, local: &[CartEntry]) {
        self.entries = merge(local, &self.entries);

        if let Some(first) = local.first() {
            self.set_rental_days(first.rental_days);
        }
    }

    /// Subtotal for the cart-global duration, looking up base prices with `price_of`.
    ///
    /// Entries whose price cannot be found are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the subtotal cannot be represented.
    pub fn subtotal<F>(&self, price_of: F) -> Result<u64, PricingError>
    where
        F: Fn(&ItemId) -> Option<u64>,
    {
        pricing::subtotal(
            self.entries
                .iter()
                .filter_map(|entry| price_of(&entry.item_id).map(|price| (price, entry.quantity))),
            self.rental_days(),
        )
    }

    fn upsert(&mut self, item_id: ItemId, quantity: u32) -> &CartEntry {
        let rental_days = self.rental_days();

        match self.entries.iter().position(|entry| entry.item_id == item_id) {
            Some(index) => {
                let entry = &mut self.entries[index];

                entry.quantity = quantity;

                entry
            }
            None => {
                let index = self.entries.len();

                self.entries.push(CartEntry {
                    item_id,
                    quantity,
                    rental_days,
                });

                &self.entries[index]
            }
        }
    }
}

/// Merges a client-held cart into a server-held one.
///
/// Entries are keyed by item. Where both carts hold an item, the local entry
/// replaces the server entry in place; server-only entries are kept unchanged
/// and local-only entries are appended in local order.
pub fn merge(local: &[CartEntry], server: &[CartEntry]) -> Vec<CartEntry> {
    let mut merged = server.to_vec();

    for entry in local {
        match merged
            .iter_mut()
            .find(|existing| existing.item_id == entry.item_id)
        {
            Some(existing) => *existing = entry.clone(),
            None => merged.push(entry.clone()),
        }
    }

    merged
}
