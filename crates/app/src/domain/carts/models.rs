//! Cart Models

use sewa::{cart::CartEntry, pricing::RentalDays};

/// A cart line with its price for the cart's rental duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedCartLine {
    pub entry: CartEntry,
    pub name: String,
    pub base_price: u64,
    pub rental_price: u64,
    pub line_total: u64,
}

/// A customer's cart, priced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedCart {
    pub lines: Vec<PricedCartLine>,
    pub rental_days: RentalDays,
    pub subtotal: u64,
}
