use crate::CalendarError;
use crate::consts::{
    CENTURY_CYCLE, DAYS_IN_MONTH, FEBRUARY, FEBRUARY_DAYS_LEAP, GREGORIAN_CYCLE, LEAP_YEAR_CYCLE,
    MAX_MONTH,
};
use crate::prelude::*;
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// A Gregorian (AD) calendar date.
///
/// Components are stored as given and are not checked on construction, so a value
/// may name a day that does not exist (e.g. February 30). Use [`EnglishDate::is_valid`]
/// or [`EnglishDate::to_naive`] before relying on it; conversions reject such values
/// with [`CalendarError::InvalidAdDate`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    From,
    Into,
    Serialize,
    Deserialize,
)]
#[display(fmt = "{:04}-{:02}-{:02}", year, month, day)]
pub struct EnglishDate {
    pub year:  i32,
    pub month: u8,
    pub day:   u8,
}

impl EnglishDate {
    /// Creates a date from raw components without validation
    pub const fn new(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Returns true if the components name a real proleptic Gregorian day
    pub fn is_valid(&self) -> bool {
        self.to_naive().is_ok()
    }

    /// Converts to a `chrono` calendar date.
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidAdDate` if the triple does not round-trip through
    /// the Gregorian calendar.
    pub fn to_naive(&self) -> Result<NaiveDate, CalendarError> {
        NaiveDate::from_ymd_opt(self.year, u32::from(self.month), u32::from(self.day)).ok_or(
            CalendarError::InvalidAdDate {
                year:  self.year,
                month: self.month,
                day:   self.day,
            },
        )
    }

    /// Day of week, `0` for Sunday through `6` for Saturday.
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidAdDate` if the date does not exist.
    #[allow(clippy::cast_possible_truncation)]
    pub fn day_of_week(&self) -> Result<u8, CalendarError> {
        Ok(self.to_naive()?.weekday().num_days_from_sunday() as u8)
    }

    /// The host's current local calendar date, time of day dropped
    pub fn today() -> Self {
        let today = Local::now().date_naive();
        tracing::trace!(%today, "read host local date");
        Self::from(today)
    }
}

impl From<NaiveDate> for EnglishDate {
    #[allow(clippy::cast_possible_truncation)]
    fn from(date: NaiveDate) -> Self {
        // chrono keeps month in 1..=12 and day in 1..=31
        Self {
            year:  date.year(),
            month: date.month() as u8,
            day:   date.day() as u8,
        }
    }
}

impl TryFrom<EnglishDate> for NaiveDate {
    type Error = CalendarError;

    fn try_from(date: EnglishDate) -> Result<Self, Self::Error> {
        date.to_naive()
    }
}

// Helper functions

pub const fn is_leap_year(year: i32) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

/// Length of a Gregorian month; `0` for a month outside `1..=12`
pub const fn days_in_gregorian_month(year: i32, month: u8) -> u8 {
    if month == 0 || month > MAX_MONTH {
        return 0;
    }

    if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}
