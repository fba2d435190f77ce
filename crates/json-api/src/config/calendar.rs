//! Calendar Config

use clap::Args;
use sewa_app::calendar::{BusinessCalendar, DEFAULT_BUSINESS_TIMEZONE};

/// Business calendar settings.
#[derive(Debug, Args)]
pub struct CalendarConfig {
    /// IANA time zone whose calendar day drives availability and expiry
    #[arg(long, env = "BUSINESS_TIMEZONE", default_value = DEFAULT_BUSINESS_TIMEZONE)]
    pub business_timezone: String,
}

impl CalendarConfig {
    /// Resolve the configured zone.
    ///
    /// # Errors
    ///
    /// Returns an error if the zone is not in the time zone database.
    pub fn calendar(&self) -> Result<BusinessCalendar, jiff::Error> {
        BusinessCalendar::from_name(&self.business_timezone)
    }
}
