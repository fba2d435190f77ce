//! Stock decision gate.

use thiserror::Error;

use crate::catalog::{CatalogItem, ItemId};

/// A reservation the gate refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StockError {
    /// Zero units requested; a validation problem, not a stock problem.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// Not enough free units left for the request.
    #[error("{item} is fully booked: requested {requested}, available {available}")]
    Unavailable {
        /// Requested item.
        item: ItemId,
        /// Requested quantity.
        requested: u32,
        /// Units still free.
        available: u32,
    },
}

/// Units of `item` left once `booked` units are committed, never below zero.
pub fn effective_stock(item: &CatalogItem, booked: u32) -> u32 {
    item.nominal_stock.saturating_sub(booked)
}

/// Whether `requested` units of `item` may be reserved.
pub fn can_reserve(item: &CatalogItem, booked: u32, requested: u32) -> bool {
    reserve(item, booked, requested).is_ok()
}

/// Checks a reservation of `requested` units against the free stock.
///
/// # Errors
///
/// - [`StockError::InvalidQuantity`]: `requested` is zero.
/// - [`StockError::Unavailable`]: `requested` exceeds the effective stock.
pub fn reserve(item: &CatalogItem, booked: u32, requested: u32) -> Result<(), StockError> {
    if requested == 0 {
        return Err(StockError::InvalidQuantity);
    }

    let available = effective_stock(item, booked);

    if requested > available {
        return Err(StockError::Unavailable {
            item: item.id.clone(),
            requested,
            available,
        });
    }

    Ok(())
}
