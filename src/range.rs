use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{NepaliDate, OPEN_BOUND, ParseError, RANGE_SEPARATOR};

/// Three-way comparison of two BS dates by year, then month, then day.
///
/// Returns `-1`, `0` or `1`.
pub fn compare_bs_dates(a: NepaliDate, b: NepaliDate) -> i8 {
    a.cmp(&b) as i8
}

/// Returns true unless `date` falls before `min` or after `max`.
/// Both bounds are inclusive and either may be absent.
pub fn is_bs_date_in_range(date: NepaliDate, min: Option<NepaliDate>, max: Option<NepaliDate>) -> bool {
    min.is_none_or(|min| compare_bs_dates(date, min) >= 0)
        && max.is_none_or(|max| compare_bs_dates(date, max) <= 0)
}

/// An inclusive range of BS dates where either end may be open.
/// When both ends are present, `min` is less than or equal to `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BsDateRange {
    min: Option<NepaliDate>,
    max: Option<NepaliDate>,
}

/// Error type for date range operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// Lower bound is after upper bound.
    #[error("Invalid date range: min ({min}) is after max ({max})")]
    InvalidRange { min: NepaliDate, max: NepaliDate },

    /// Error parsing date component.
    #[error(transparent)]
    ParseError(#[from] ParseError),

    /// Invalid range format.
    #[error("Invalid range format: {0}")]
    InvalidFormat(String),
}

impl BsDateRange {
    /// Creates a new range with validation.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidRange` if both bounds are present and min > max.
    pub fn new(min: Option<NepaliDate>, max: Option<NepaliDate>) -> Result<Self, RangeError> {
        match (min, max) {
            (Some(min), Some(max)) if min > max => Err(RangeError::InvalidRange { min, max }),
            _ => Ok(Self { min, max }),
        }
    }

    /// A range with no bounds; contains every date
    pub const fn unbounded() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    /// Returns the lower bound, if any
    pub const fn start(&self) -> Option<NepaliDate> {
        self.min
    }

    /// Returns the upper bound, if any
    pub const fn end(&self) -> Option<NepaliDate> {
        self.max
    }

    /// Returns both bounds as a tuple
    pub const fn bounds(&self) -> (Option<NepaliDate>, Option<NepaliDate>) {
        (self.min, self.max)
    }

    /// Checks if the range contains a given date (bounds inclusive)
    pub fn contains(&self, date: NepaliDate) -> bool {
        is_bs_date_in_range(date, self.min, self.max)
    }

    /// Checks if this range shares at least one date with another range
    pub fn overlaps(&self, other: &Self) -> bool {
        starts_before_end(self.min, other.max) && starts_before_end(other.min, self.max)
    }

    /// Checks if this range is completely contained within another range
    pub fn is_within(&self, other: &Self) -> bool {
        let lower_ok = match (other.min, self.min) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(outer), Some(inner)) => outer <= inner,
        };
        let upper_ok = match (other.max, self.max) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(outer), Some(inner)) => inner <= outer,
        };
        lower_ok && upper_ok
    }
}

/// An absent lower or upper bound never excludes anything.
fn starts_before_end(start: Option<NepaliDate>, end: Option<NepaliDate>) -> bool {
    match (start, end) {
        (Some(start), Some(end)) => start <= end,
        _ => true,
    }
}

fn write_bound(f: &mut fmt::Formatter<'_>, bound: Option<NepaliDate>) -> fmt::Result {
    match bound {
        Some(date) => write!(f, "{date}"),
        None => f.write_str(OPEN_BOUND),
    }
}

impl fmt::Display for BsDateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_bound(f, self.min)?;
        write!(f, "{RANGE_SEPARATOR}")?;
        write_bound(f, self.max)
    }
}

fn parse_bound(s: &str) -> Result<Option<NepaliDate>, RangeError> {
    let s = s.trim();
    if s == OPEN_BOUND {
        Ok(None)
    } else {
        Ok(Some(s.parse::<NepaliDate>()?))
    }
}

impl FromStr for BsDateRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        let separator_count = trimmed.matches(RANGE_SEPARATOR).count();

        match separator_count {
            0 => Err(RangeError::InvalidFormat(format!(
                "No range separator found (expected '{RANGE_SEPARATOR}'): {s}"
            ))),
            1 => {
                let (min_str, max_str) = trimmed.split_once(RANGE_SEPARATOR).ok_or_else(|| {
                    RangeError::InvalidFormat(format!("Separator '{RANGE_SEPARATOR}' not found despite count == 1"))
                })?;
                Self::new(parse_bound(min_str)?, parse_bound(max_str)?)
            },
            _ => Err(RangeError::InvalidFormat(format!(
                "Too many '{RANGE_SEPARATOR}' separators: expected 1, found {separator_count}"
            ))),
        }
    }
}

impl PartialOrd for BsDateRange {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BsDateRange {
    fn cmp(&self, other: &Self) -> Ordering {
        // open lower bounds first, open upper bounds last
        let max_key = |max: Option<NepaliDate>| (max.is_none(), max);
        match self.min.cmp(&other.min) {
            Ordering::Equal => max_key(self.max).cmp(&max_key(other.max)),
            ord => ord,
        }
    }
}

impl Serialize for BsDateRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for BsDateRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
