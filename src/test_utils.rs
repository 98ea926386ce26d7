use crate::{EnglishDate, NepaliDate};

/// Shorthand for an unchecked Bikram Sambat date
pub(crate) const fn bs(year: u16, month: u8, day: u8) -> NepaliDate {
    NepaliDate::new(year, month, day)
}

/// Shorthand for an unchecked Gregorian date
pub(crate) const fn ad(year: i32, month: u8, day: u8) -> EnglishDate {
    EnglishDate::new(year, month, day)
}
