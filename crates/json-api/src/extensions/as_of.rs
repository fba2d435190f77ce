//! Business date query parsing.

use jiff::civil::Date;
use salvo::{oapi::extract::QueryParam, prelude::StatusError};
use sewa_app::calendar::BusinessCalendar;

use crate::extensions::*;

pub(crate) trait AsOfExt {
    /// The requested `YYYY-MM-DD` date, or today on the business calendar.
    fn into_as_of(self, calendar: &BusinessCalendar) -> Result<Date, StatusError>;
}

impl AsOfExt for QueryParam<String, false> {
    fn into_as_of(self, calendar: &BusinessCalendar) -> Result<Date, StatusError> {
        self.into_inner()
            .map(|value| value.parse::<Date>())
            .transpose()
            .or_400("could not parse \"as_of\" query parameter")
            .map(|as_of| as_of.unwrap_or_else(|| calendar.today()))
    }
}
