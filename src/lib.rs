mod consts;
mod convert;
mod error;
mod format;
mod prelude;
mod range;
mod table;
mod types;

#[cfg(test)]
mod test_utils;

pub use consts::*;
pub use convert::{ad_to_bs, bs_to_ad, today_bs};
pub use error::CalendarError;
pub use format::{
    DatePattern, Language, ad_month_name, bs_month_name, bs_month_names, format_ad_date,
    format_bs_date, localize_digits, to_localized_digits, weekday_name, weekday_short_name,
};
pub use range::{BsDateRange, RangeError, compare_bs_dates, is_bs_date_in_range};
pub use table::{
    CalendarTable, ReferenceAnchor, days_in_month, days_since_bs_reference, is_valid_bs_date,
    total_days_in_year,
};
pub use types::{EnglishDate, days_in_gregorian_month, is_leap_year};

use crate::prelude::*;
use std::str::FromStr;

/// A Bikram Sambat calendar date.
///
/// Components are plain numbers and [`NepaliDate::new`] does not check them; use
/// [`NepaliDate::try_new`] or [`NepaliDate::from_str`] when the value has to name a
/// day that exists in the calendar table. Ordering is lexicographic on
/// `(year, month, day)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into)]
#[display(fmt = "{:04}-{:02}-{:02}", year, month, day)]
pub struct NepaliDate {
    pub year:  u16,
    pub month: u8,
    pub day:   u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be {}-{})", "_0", BS_MIN_YEAR, BS_MAX_YEAR)]
    InvalidYear(u16),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { year: u16, month: u8, day: u8 },
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

impl NepaliDate {
    /// Creates a date from raw components without validation
    pub const fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Creates a date checked against the standard calendar table.
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidBsDate` if the day does not exist.
    pub fn try_new(year: u16, month: u8, day: u8) -> Result<Self, CalendarError> {
        if is_valid_bs_date(year, month, day) {
            Ok(Self::new(year, month, day))
        } else {
            Err(CalendarError::InvalidBsDate { year, month, day })
        }
    }

    /// Returns true if the standard calendar table has this day
    pub fn is_valid(&self) -> bool {
        CalendarTable::standard().is_valid_date(*self)
    }

    /// Converts to the Gregorian calendar using the standard table.
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidBsDate` if the date does not exist.
    pub fn to_ad(&self) -> Result<EnglishDate, CalendarError> {
        bs_to_ad(*self)
    }

    /// Converts a Gregorian date using the standard table.
    ///
    /// # Errors
    /// Fails if `date` is not a real day, precedes the reference anchor, or lands
    /// past the last table year.
    pub fn from_ad(date: EnglishDate) -> Result<Self, CalendarError> {
        ad_to_bs(date)
    }

    pub fn today() -> Result<Self, CalendarError> {
        today_bs()
    }

    /// Day of week, `0` for Sunday through `6` for Saturday.
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidBsDate` if the date does not exist.
    pub fn weekday(&self) -> Result<u8, CalendarError> {
        CalendarTable::standard().day_of_week(*self)
    }
}

/// Reads a `YYYY-M-D` or `YYYY-MM-DD` string.
///
/// Only the shape is checked: four ASCII digits, then one or two, then one or two,
/// separated by single hyphens. Surrounding whitespace is not accepted and the
/// numbers are not checked against the calendar, so `"2082-13-45"` parses.
pub fn parse_bs_date(text: &str) -> Option<NepaliDate> {
    let mut parts = text.split(DATE_SEPARATOR);
    let year = parts.next().filter(|p| is_digits(p, 4..=4))?;
    let month = parts.next().filter(|p| is_digits(p, 1..=2))?;
    let day = parts.next().filter(|p| is_digits(p, 1..=2))?;
    if parts.next().is_some() {
        return None;
    }

    Some(NepaliDate::new(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?))
}

fn is_digits(part: &str, len: std::ops::RangeInclusive<usize>) -> bool {
    len.contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
}

impl FromStr for NepaliDate {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let separators = trimmed.matches(DATE_SEPARATOR).count();
        if separators != 2 {
            return Err(ParseError::InvalidFormat(format!(
                "Expected 2 '{DATE_SEPARATOR}' separators, found {separators}: {trimmed}"
            )));
        }

        let date = parse_bs_date(trimmed).ok_or_else(|| ParseError::InvalidFormat(trimmed.to_owned()))?;

        if !(BS_MIN_YEAR..=BS_MAX_YEAR).contains(&date.year) {
            return Err(ParseError::InvalidYear(date.year));
        }
        if !(FIRST_MONTH..=MAX_MONTH).contains(&date.month) {
            return Err(ParseError::InvalidMonth(date.month));
        }
        if !date.is_valid() {
            return Err(ParseError::InvalidDay {
                year:  date.year,
                month: date.month,
                day:   date.day,
            });
        }

        Ok(date)
    }
}

impl serde::Serialize for NepaliDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Reads the canonical string through [`NepaliDate::from_str`], so only days present in
/// [`CalendarTable::standard`] are accepted. For a date that exists only in an alternate
/// table, deserialize the string, read it with [`parse_bs_date`] and check it with
/// [`CalendarTable::is_valid_date`].
impl<'de> serde::Deserialize<'de> for NepaliDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
