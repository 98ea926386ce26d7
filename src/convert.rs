//! Conversion between Bikram Sambat and Gregorian dates.
//!
//! Both directions count whole days from the table's [`ReferenceAnchor`] and then walk
//! forward month by month through the other calendar until the count is used up. The
//! walk never moves backwards, so dates before the anchor are rejected rather than
//! extrapolated.
//!
//! [`ReferenceAnchor`]: crate::ReferenceAnchor

use tracing::trace;

use crate::consts::{FIRST_MONTH, MAX_MONTH, MIN_DAY};
use crate::types::days_in_gregorian_month;
use crate::{CalendarError, CalendarTable, EnglishDate, NepaliDate};

const fn next_gregorian_month(year: i32, month: u8) -> (i32, u8) {
    if month == MAX_MONTH {
        (year + 1, FIRST_MONTH)
    } else {
        (year, month + 1)
    }
}

impl CalendarTable {
    /// Converts a Bikram Sambat date to its Gregorian equivalent.
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidBsDate` if the date is not in this table, or
    /// `CalendarError::DateBeforeSupportedRange` if it precedes the anchor.
    #[allow(clippy::cast_possible_truncation)]
    pub fn bs_to_ad(&self, date: NepaliDate) -> Result<EnglishDate, CalendarError> {
        if !self.is_valid_date(date) {
            return Err(CalendarError::InvalidBsDate {
                year:  date.year,
                month: date.month,
                day:   date.day,
            });
        }

        let mut remaining = self.days_since_reference(date)?;
        let EnglishDate {
            mut year,
            mut month,
            mut day,
        } = self.anchor().ad;

        loop {
            let left_in_month = u32::from(days_in_gregorian_month(year, month).saturating_sub(day));
            if remaining <= left_in_month {
                // bounded by the month length
                day += remaining as u8;
                break;
            }
            remaining -= left_in_month + 1;
            day = MIN_DAY;
            (year, month) = next_gregorian_month(year, month);
        }

        let converted = EnglishDate::new(year, month, day);
        trace!(bs = %date, ad = %converted, "converted BS to AD");
        Ok(converted)
    }

    /// Converts a Gregorian date to its Bikram Sambat equivalent.
    ///
    /// The distance from the anchor is taken between calendar days with no time zone
    /// attached, so local clock offsets can never shift the result.
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidAdDate` if the date does not exist,
    /// `CalendarError::DateBeforeSupportedRange` if it precedes the anchor, or
    /// `CalendarError::BsYearOverflow` if it falls after the last table year.
    #[allow(clippy::cast_possible_truncation)]
    pub fn ad_to_bs(&self, date: EnglishDate) -> Result<NepaliDate, CalendarError> {
        let target = date.to_naive()?;
        let anchor = self.anchor();
        let origin = anchor.ad.to_naive()?;

        let offset = target.signed_duration_since(origin).num_days();
        if offset < 0 {
            return Err(CalendarError::DateBeforeSupportedRange {
                date: date.to_string(),
            });
        }
        let overflow = CalendarError::BsYearOverflow {
            max: self.max_year(),
        };
        let mut remaining = u32::try_from(offset).map_err(|_| overflow.clone())?;

        let NepaliDate {
            mut year,
            mut month,
            mut day,
        } = anchor.bs;

        loop {
            let left_in_month = u32::from(self.days_in_month(year, month)?.saturating_sub(day));
            if remaining <= left_in_month {
                // bounded by the month length
                day += remaining as u8;
                break;
            }
            remaining -= left_in_month + 1;
            day = MIN_DAY;
            if month == MAX_MONTH {
                if year >= self.max_year() {
                    return Err(overflow);
                }
                year += 1;
                month = FIRST_MONTH;
            } else {
                month += 1;
            }
        }

        let converted = NepaliDate::new(year, month, day);
        trace!(ad = %date, bs = %converted, "converted AD to BS");
        Ok(converted)
    }

    /// Today's Bikram Sambat date according to the host's local calendar.
    ///
    /// # Errors
    /// Returns `CalendarError::DateBeforeSupportedRange` or
    /// `CalendarError::BsYearOverflow` if the host date lies outside the table.
    pub fn today_bs(&self) -> Result<NepaliDate, CalendarError> {
        self.ad_to_bs(EnglishDate::today())
    }

    /// Day of week of a Bikram Sambat date, `0` for Sunday through `6` for Saturday.
    ///
    /// # Errors
    /// Same as [`CalendarTable::bs_to_ad`].
    pub fn day_of_week(&self, date: NepaliDate) -> Result<u8, CalendarError> {
        self.bs_to_ad(date)?.day_of_week()
    }

    /// Day of week on which `month` of `year` starts, `0` for Sunday.
    ///
    /// # Errors
    /// Returns `CalendarError::UnsupportedYear` or `CalendarError::InvalidMonth` for a
    /// month outside the table.
    pub fn month_start_weekday(&self, year: u16, month: u8) -> Result<u8, CalendarError> {
        self.days_in_month(year, month)?;
        self.day_of_week(NepaliDate::new(year, month, MIN_DAY))
    }
}

/// Converts a BS date to AD through the standard table.
///
/// # Errors
/// See [`CalendarTable::bs_to_ad`].
pub fn bs_to_ad(date: NepaliDate) -> Result<EnglishDate, CalendarError> {
    CalendarTable::standard().bs_to_ad(date)
}

/// Converts an AD date to BS through the standard table.
///
/// # Errors
/// See [`CalendarTable::ad_to_bs`].
pub fn ad_to_bs(date: EnglishDate) -> Result<NepaliDate, CalendarError> {
    CalendarTable::standard().ad_to_bs(date)
}

/// Today's BS date through the standard table.
///
/// # Errors
/// See [`CalendarTable::today_bs`].
pub fn today_bs() -> Result<NepaliDate, CalendarError> {
    CalendarTable::standard().today_bs()
}
