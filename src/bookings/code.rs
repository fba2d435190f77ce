//! Human-readable booking codes (`TRX-<4 digits>-<year>`).

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    ops::RangeInclusive,
    str::FromStr,
};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

const PREFIX: &str = "TRX";
const SUFFIX_RANGE: RangeInclusive<u16> = 1000..=9999;

/// Booking reference printed on invoices and quoted by customers.
///
/// The random part only spans 9000 values per year, so codes are not unique by
/// construction; persistence must reject collisions and draw again.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BookingCode(String);

impl BookingCode {
    /// Draws a new code for the given year.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, year: i16) -> Self {
        let suffix = rng.gen_range(SUFFIX_RANGE);

        Self(format!("{PREFIX}-{suffix:04}-{year:04}"))
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for BookingCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl FromStr for BookingCode {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let malformed = || ValidationError::MalformedBookingCode(value.to_string());
        let mut parts = value.split('-');

        let (Some(prefix), Some(number), Some(year), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };

        let is_digits = |part: &str, len: usize| {
            part.len() == len && part.chars().all(|c| c.is_ascii_digit())
        };

        if !prefix.eq_ignore_ascii_case(PREFIX) || !is_digits(number, 4) || !is_digits(year, 4) {
            return Err(malformed());
        }

        Ok(Self(format!("{PREFIX}-{number}-{year}")))
    }
}

impl TryFrom<String> for BookingCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BookingCode> for String {
    fn from(value: BookingCode) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn generated_codes_parse_back() -> TestResult {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let code = BookingCode::generate(&mut rng, 2026);

            assert_eq!(code.as_str().parse::<BookingCode>()?, code);
            assert!(code.as_str().starts_with("TRX-"));
            assert!(code.as_str().ends_with("-2026"));
        }

        Ok(())
    }

    #[test]
    fn prefix_is_normalised() -> TestResult {
        assert_eq!("trx-0042-2026".parse::<BookingCode>()?.as_str(), "TRX-0042-2026");

        Ok(())
    }

    #[test]
    fn malformed_codes_are_rejected() {
        for value in ["", "TRX-12-2026", "TRX-1234", "ABC-1234-2026", "TRX-1234-2026-1", "TRX-12a4-2026"] {
            assert!(value.parse::<BookingCode>().is_err(), "{value:?} should be rejected");
        }
    }
}
