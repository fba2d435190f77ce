//! Cart Handlers

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use sewa_app::domain::carts::models::{PricedCart, PricedCartLine};

pub(crate) mod add;
pub(crate) mod get;
pub(crate) mod remove;
pub(crate) mod rent_again;
pub(crate) mod rental_days;
pub(crate) mod sync;
pub(crate) mod update;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartLineResponse {
    pub item_id: String,
    pub name: String,
    pub quantity: u32,

    /// Catalog price for a standard rental
    pub base_price: u64,

    /// Unit price for the cart's rental duration
    pub rental_price: u64,

    pub line_total: u64,
}

impl From<PricedCartLine> for CartLineResponse {
    fn from(line: PricedCartLine) -> Self {
        CartLineResponse {
            item_id: line.entry.item_id.to_string(),
            name: line.name,
            quantity: line.entry.quantity,
            base_price: line.base_price,
            rental_price: line.rental_price,
            line_total: line.line_total,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    pub lines: Vec<CartLineResponse>,

    /// Rental duration shared by every line, 1 to 14
    pub rental_days: u32,

    pub subtotal: u64,
}

impl From<PricedCart> for CartResponse {
    fn from(cart: PricedCart) -> Self {
        CartResponse {
            lines: cart.lines.into_iter().map(CartLineResponse::from).collect(),
            rental_days: cart.rental_days.get(),
            subtotal: cart.subtotal,
        }
    }
}
