//! Sewa
//!
//! Sewa is the rental engine behind a costume-rental storefront: rental pricing,
//! stock availability around booked periods, the booking lifecycle and cart
//! reconciliation. Everything here is pure and synchronous; persistence and
//! transport live in the `sewa-app` and `sewa-json` crates.

pub mod availability;
pub mod bookings;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod errors;
pub mod pricing;
pub mod stock;
