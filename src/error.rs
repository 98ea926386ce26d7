//! Error types for calendar lookups, conversions and formatting.

/// Error type for every fallible calendar operation.
///
/// Each variant names the input that was rejected so callers can branch on the
/// kind of failure instead of matching on the message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    /// The Bikram Sambat year is outside the table's supported range.
    #[error("unsupported Bikram Sambat year {year} (supported {min}-{max})")]
    UnsupportedYear {
        /// The rejected year.
        year: u16,
        /// First supported year.
        min: u16,
        /// Last supported year.
        max: u16,
    },

    /// The month is outside `1..=12`.
    #[error("invalid month {month} (must be 1-12)")]
    InvalidMonth {
        /// The rejected month.
        month: u8,
    },

    /// The triple is not a real Bikram Sambat date.
    #[error("invalid Bikram Sambat date {year}-{month:02}-{day:02}")]
    InvalidBsDate {
        /// Year component.
        year: u16,
        /// Month component.
        month: u8,
        /// Day component.
        day: u8,
    },

    /// The triple is not a real Gregorian date.
    #[error("invalid Gregorian date {year}-{month:02}-{day:02}")]
    InvalidAdDate {
        /// Year component.
        year: i32,
        /// Month component.
        month: u8,
        /// Day component.
        day: u8,
    },

    /// The date precedes the reference anchor, where day counting starts.
    #[error("date {date} is before the supported range")]
    DateBeforeSupportedRange {
        /// Canonical rendering of the rejected date.
        date: String,
    },

    /// Walking forward would step past the last year of the table.
    #[error("conversion exceeds the last supported Bikram Sambat year {max}")]
    BsYearOverflow {
        /// Last supported year.
        max: u16,
    },

    /// An alternate calendar table was rejected at construction.
    #[error("invalid calendar table: {0}")]
    InvalidTable(String),

    /// The language code is not one of `en`/`ne`.
    #[error("unknown language code: {0}")]
    UnknownLanguage(String),
}
