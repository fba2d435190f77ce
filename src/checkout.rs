//! Checkout
//!
//! Decides whether a booking request can be accepted against the current
//! availability, and prices it.

use jiff::civil::Date;
use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use crate::{
    availability::Availability,
    bookings::{BookingLine, BookingLines, RentalPeriod},
    catalog::{CatalogItem, ItemId},
    errors::ValidationError,
    pricing::{self, PricingError, RentalDays},
    stock::{self, StockError},
};

/// Reasons a booking request is refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// Malformed request.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A requested item is not in the catalog.
    #[error("unknown item: {0}")]
    UnknownItem(ItemId),

    /// A line exceeds the item's effective stock.
    #[error(transparent)]
    Stock(StockError),

    /// The total could not be computed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

impl From<StockError> for CheckoutError {
    fn from(error: StockError) -> Self {
        match error {
            StockError::InvalidQuantity => Self::Validation(ValidationError::NonPositiveQuantity),
            StockError::Unavailable { .. } => Self::Stock(error),
        }
    }
}

/// A requested line, before pricing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedLine {
    /// Requested item.
    pub item_id: ItemId,

    /// Requested units.
    pub quantity: u32,
}

/// A validated booking request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    period: RentalPeriod,
    rental_days: RentalDays,
    lines: Vec<RequestedLine>,
}

impl BookingRequest {
    /// Validates a booking request.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::ReturnNotAfterPickup`]: `return_date` is not after `pickup`.
    /// - [`ValidationError::RentalDaysOutOfRange`]: the period is longer than the maximum rental.
    /// - [`ValidationError::NoLines`]: no lines were requested.
    /// - [`ValidationError::NonPositiveQuantity`]: a line requests zero units.
    /// - [`ValidationError::DuplicateItem`]: an item is requested on two lines.
    pub fn new(
        pickup: Date,
        return_date: Date,
        lines: Vec<RequestedLine>,
    ) -> Result<Self, ValidationError> {
        let period = RentalPeriod::new(pickup, return_date)?;
        let rental_days = period.rental_days()?;

        if lines.is_empty() {
            return Err(ValidationError::NoLines);
        }

        let mut seen = FxHashSet::default();

        for line in &lines {
            if line.quantity == 0 {
                return Err(ValidationError::NonPositiveQuantity);
            }

            if !seen.insert(&line.item_id) {
                return Err(ValidationError::DuplicateItem(line.item_id.clone()));
            }
        }

        Ok(Self {
            period,
            rental_days,
            lines,
        })
    }

    /// Requested period.
    pub fn period(&self) -> RentalPeriod {
        self.period
    }

    /// Requested duration.
    pub fn rental_days(&self) -> RentalDays {
        self.rental_days
    }

    /// Requested lines.
    pub fn lines(&self) -> &[RequestedLine] {
        &self.lines
    }

    /// Distinct item ids, sorted; the order rows are locked in.
    pub fn item_ids(&self) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = self.lines.iter().map(|line| line.item_id.clone()).collect();

        ids.sort();

        ids
    }
}

/// An accepted, priced booking request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    /// Lines with frozen unit prices.
    pub lines: BookingLines,

    /// Amount to charge for the booking.
    pub total_price: u64,
}

/// Accepts or refuses `request` given the catalog rows and current availability.
///
/// Every line must fit the item's effective stock; the first line that does
/// not is reported.
///
/// # Errors
///
/// Returns [`CheckoutError::UnknownItem`] for items missing from `items`,
/// [`CheckoutError::Stock`] when a line exceeds effective stock, and
/// [`CheckoutError::Pricing`] if the total overflows.
pub fn checkout(
    request: &BookingRequest,
    items: &[CatalogItem],
    availability: &Availability,
) -> Result<Quote, CheckoutError> {
    let catalog: FxHashMap<&ItemId, &CatalogItem> =
        items.iter().map(|item| (&item.id, item)).collect();

    let mut lines = BookingLines::new();
    let mut total_price = 0_u64;

    for requested in request.lines() {
        let item = catalog
            .get(&requested.item_id)
            .ok_or_else(|| CheckoutError::UnknownItem(requested.item_id.clone()))?;

        stock::reserve(
            item,
            availability.booked_quantity(&item.id),
            requested.quantity,
        )?;

        let line_total = pricing::line_total(item.price, request.rental_days(), requested.quantity)?;

        total_price = total_price
            .checked_add(line_total)
            .ok_or(PricingError::Overflow)?;

        lines.push(BookingLine {
            item_id: item.id.clone(),
            quantity: requested.quantity,
            unit_price: item.price,
        });
    }

    Ok(Quote { lines, total_price })
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use crate::catalog::Category;

    use super::*;

    fn item(id: &str, stock: u32, price: u64) -> CatalogItem {
        CatalogItem {
            id: id.into(),
            name: id.to_string(),
            category: Category::Fullset,
            price,
            nominal_stock: stock,
        }
    }

    fn line(item: &str, quantity: u32) -> RequestedLine {
        RequestedLine {
            item_id: item.into(),
            quantity,
        }
    }

    #[test]
    fn request_validation() {
        let pickup = date(2026, 10, 20);

        assert!(matches!(
            BookingRequest::new(pickup, pickup, vec![line("a", 1)]),
            Err(ValidationError::ReturnNotAfterPickup { .. })
        ));
        assert!(matches!(
            BookingRequest::new(pickup, date(2026, 11, 10), vec![line("a", 1)]),
            Err(ValidationError::RentalDaysOutOfRange { days: 21, .. })
        ));
        assert_eq!(
            BookingRequest::new(pickup, date(2026, 10, 23), vec![]),
            Err(ValidationError::NoLines)
        );
        assert_eq!(
            BookingRequest::new(pickup, date(2026, 10, 23), vec![line("a", 0)]),
            Err(ValidationError::NonPositiveQuantity)
        );
        assert_eq!(
            BookingRequest::new(pickup, date(2026, 10, 23), vec![line("a", 1), line("a", 2)]),
            Err(ValidationError::DuplicateItem("a".into()))
        );
    }

    #[test]
    fn prices_lines_with_request_duration() -> TestResult {
        let request = BookingRequest::new(
            date(2026, 10, 20),
            date(2026, 10, 25),
            vec![line("gatotkaca", 2), line("topeng", 1)],
        )?;
        let items = [item("gatotkaca", 5, 350_000), item("topeng", 2, 50_000)];

        let quote = checkout(&request, &items, &Availability::default())?;

        assert_eq!(quote.total_price, 2 * 490_000 + 70_000);
        assert_eq!(quote.lines.len(), 2);
        assert!(quote.lines.iter().any(|l| l.unit_price == 350_000 && l.quantity == 2));

        Ok(())
    }

    #[test]
    fn rejects_unknown_items() -> TestResult {
        let request = BookingRequest::new(
            date(2026, 10, 20),
            date(2026, 10, 22),
            vec![line("missing", 1)],
        )?;

        assert_eq!(
            checkout(&request, &[], &Availability::default()),
            Err(CheckoutError::UnknownItem("missing".into()))
        );

        Ok(())
    }

    #[test]
    fn rejects_lines_beyond_stock() -> TestResult {
        let request = BookingRequest::new(
            date(2026, 10, 20),
            date(2026, 10, 22),
            vec![line("topeng", 3)],
        )?;

        let result = checkout(&request, &[item("topeng", 2, 50_000)], &Availability::default());

        assert!(matches!(
            result,
            Err(CheckoutError::Stock(StockError::Unavailable { available: 2, .. }))
        ));

        Ok(())
    }

    #[test]
    fn item_ids_are_sorted() -> TestResult {
        let request = BookingRequest::new(
            date(2026, 10, 20),
            date(2026, 10, 22),
            vec![line("c", 1), line("a", 1), line("b", 1)],
        )?;

        assert_eq!(request.item_ids(), vec!["a".into(), "b".into(), "c".into()]);

        Ok(())
    }
}
