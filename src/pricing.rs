//! Pricing
//!
//! Rental prices cover a standard window of [`STANDARD_RENTAL_DAYS`]. Every day
//! beyond it adds a flat overtime surcharge of [`OVERTIME_SURCHARGE_PERCENT`]
//! of the *base* price, so the charged price grows linearly with the number of
//! extra days.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::ValidationError;

/// Number of days covered by the base price.
pub const STANDARD_RENTAL_DAYS: u32 = 3;

/// Surcharge per extra day, as a percentage of the base price.
pub const OVERTIME_SURCHARGE_PERCENT: u32 = 20;

/// Errors that can occur while pricing a rental.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PricingError {
    /// The price does not fit in the smallest currency unit representation.
    #[error("rental price overflowed")]
    Overflow,
}

/// A rental duration in whole days, bounded to `[RentalDays::MIN, RentalDays::MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct RentalDays(u32);

impl RentalDays {
    /// Shortest permitted rental.
    pub const MIN: u32 = 1;

    /// Longest permitted rental.
    pub const MAX: u32 = 14;

    /// Duration used when none is chosen.
    pub const DEFAULT: RentalDays = RentalDays(3);

    /// Creates a rental duration, rejecting values outside the permitted bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::RentalDaysOutOfRange`] when `days` is out of bounds.
    pub fn new(days: u32) -> Result<Self, ValidationError> {
        Self::from_days(i64::from(days))
    }

    /// Creates a rental duration from a signed day count (e.g. a date difference).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::RentalDaysOutOfRange`] when `days` is out of bounds.
    pub fn from_days(days: i64) -> Result<Self, ValidationError> {
        if days < i64::from(Self::MIN) || days > i64::from(Self::MAX) {
            return Err(ValidationError::RentalDaysOutOfRange {
                days,
                min: Self::MIN,
                max: Self::MAX,
            });
        }

        u32::try_from(days)
            .map(Self)
            .map_err(|_overflow| ValidationError::RentalDaysOutOfRange {
                days,
                min: Self::MIN,
                max: Self::MAX,
            })
    }

    /// Clamps any day count into the permitted bounds.
    pub fn clamped(days: i64) -> Self {
        let clamped = days.clamp(i64::from(Self::MIN), i64::from(Self::MAX));

        Self(u32::try_from(clamped).unwrap_or(Self::DEFAULT.0))
    }

    /// Number of days.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for RentalDays {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for RentalDays {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RentalDays> for u32 {
    fn from(value: RentalDays) -> Self {
        value.0
    }
}

/// Overtime surcharge for one extra day, rounded half-up to whole currency units.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the surcharge cannot be represented.
pub fn daily_surcharge(base_price: u64) -> Result<u64, PricingError> {
    let rate = Decimal::from(OVERTIME_SURCHARGE_PERCENT) / Decimal::ONE_HUNDRED;

    let applied = Decimal::from(base_price)
        .checked_mul(rate)
        .ok_or(PricingError::Overflow)?;

    applied
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or(PricingError::Overflow)
}

/// Price charged per unit for renting an item for `duration_days`.
///
/// Durations within the standard window cost the base price. The caller is
/// responsible for bounding `duration_days` (see [`RentalDays`]).
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the price cannot be represented.
pub fn rental_price(base_price: u64, duration_days: u32) -> Result<u64, PricingError> {
    let extra_days = duration_days.saturating_sub(STANDARD_RENTAL_DAYS);

    if extra_days == 0 {
        return Ok(base_price);
    }

    daily_surcharge(base_price)?
        .checked_mul(u64::from(extra_days))
        .and_then(|surcharge| base_price.checked_add(surcharge))
        .ok_or(PricingError::Overflow)
}

/// Total for `quantity` units of an item rented for `rental_days`.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the total cannot be represented.
pub fn line_total(
    base_price: u64,
    rental_days: RentalDays,
    quantity: u32,
) -> Result<u64, PricingError> {
    rental_price(base_price, rental_days.get())?
        .checked_mul(u64::from(quantity))
        .ok_or(PricingError::Overflow)
}

/// Sum of `(base_price, quantity)` lines sharing one rental duration.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the subtotal cannot be represented.
pub fn subtotal<I>(lines: I, rental_days: RentalDays) -> Result<u64, PricingError>
where
    I: IntoIterator<Item = (u64, u32)>,
{
    lines.into_iter().try_fold(0_u64, |acc, (price, quantity)| {
        acc.checked_add(line_total(price, rental_days, quantity)?)
            .ok_or(PricingError::Overflow)
    })
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn standard_window_charges_base_price() -> TestResult {
        for days in 1..=STANDARD_RENTAL_DAYS {
            assert_eq!(rental_price(350_000, days)?, 350_000, "days = {days}");
        }

        Ok(())
    }

    #[test]
    fn extra_days_add_twenty_percent_of_base_each() -> TestResult {
        assert_eq!(rental_price(350_000, 4)?, 420_000);
        assert_eq!(rental_price(350_000, 5)?, 490_000);
        assert_eq!(rental_price(350_000, 14)?, 350_000 + 11 * 70_000);

        Ok(())
    }

    #[test]
    fn price_is_linear_in_extra_days() -> TestResult {
        let base = 123_457;
        let surcharge = daily_surcharge(base)?;

        for days in 4..=RentalDays::MAX {
            let extra = u64::from(days - STANDARD_RENTAL_DAYS);

            assert_eq!(rental_price(base, days)?, base + extra * surcharge);
        }

        Ok(())
    }

    #[test]
    fn surcharge_rounds_to_nearest_unit() -> TestResult {
        assert_eq!(daily_surcharge(12)?, 2);
        assert_eq!(daily_surcharge(13)?, 3);
        assert_eq!(daily_surcharge(0)?, 0);

        Ok(())
    }

    #[test]
    fn zero_duration_is_not_clamped_by_calculator() -> TestResult {
        assert_eq!(rental_price(1_000, 0)?, 1_000);

        Ok(())
    }

    #[test]
    fn overflow_is_reported() {
        assert_eq!(rental_price(u64::MAX, 14), Err(PricingError::Overflow));
    }

    #[test]
    fn subtotal_uses_one_duration_for_every_line() -> TestResult {
        let days = RentalDays::new(5)?;

        let total = subtotal([(350_000, 2), (50_000, 1)], days)?;

        assert_eq!(total, 2 * 490_000 + 70_000);

        Ok(())
    }

    #[test]
    fn rental_days_bounds() {
        assert!(RentalDays::new(0).is_err());
        assert!(RentalDays::new(15).is_err());
        assert_eq!(RentalDays::new(14).map(RentalDays::get), Ok(14));
        assert_eq!(RentalDays::default().get(), 3);
    }

    #[test]
    fn rental_days_clamp() {
        assert_eq!(RentalDays::clamped(-4).get(), RentalDays::MIN);
        assert_eq!(RentalDays::clamped(40).get(), RentalDays::MAX);
        assert_eq!(RentalDays::clamped(7).get(), 7);
    }
}
