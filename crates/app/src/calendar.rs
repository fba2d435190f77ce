//! Business Calendar
//!
//! Availability and expiry are decided on the storefront's local calendar day,
//! not on the server's or the database's clock.

use jiff::{Timestamp, civil::Date, tz::TimeZone};

/// Time zone used when none is configured.
pub const DEFAULT_BUSINESS_TIMEZONE: &str = "Asia/Jakarta";

#[derive(Debug, Clone)]
pub struct BusinessCalendar {
    tz: TimeZone,
}

impl BusinessCalendar {
    #[must_use]
    pub fn new(tz: TimeZone) -> Self {
        Self { tz }
    }

    /// Calendar for an IANA time zone name, e.g. `Asia/Jakarta`.
    ///
    /// # Errors
    ///
    /// Returns an error if the time zone database has no such zone.
    pub fn from_name(name: &str) -> Result<Self, jiff::Error> {
        TimeZone::get(name).map(Self::new)
    }

    /// The business-local date of `timestamp`.
    #[must_use]
    pub fn date_of(&self, timestamp: Timestamp) -> Date {
        timestamp.to_zoned(self.tz.clone()).date()
    }

    /// Today's business-local date.
    #[must_use]
    pub fn today(&self) -> Date {
        self.date_of(Timestamp::now())
    }

    #[must_use]
    pub fn time_zone(&self) -> &TimeZone {
        &self.tz
    }
}

#[cfg(test)]
mod tests {
    use jiff::{civil::date, tz::offset};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn local_date_rolls_over_before_utc() -> TestResult {
        let calendar = BusinessCalendar::new(TimeZone::fixed(offset(7)));
        let late_utc_evening: Timestamp = "2026-10-19T18:30:00Z".parse()?;

        assert_eq!(calendar.date_of(late_utc_evening), date(2026, 10, 20));

        Ok(())
    }

    #[test]
    fn unknown_zone_is_rejected() {
        assert!(BusinessCalendar::from_name("Mars/Olympus_Mons").is_err());
    }
}
