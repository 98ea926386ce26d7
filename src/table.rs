//! Bikram Sambat month-length table and the lookups built on it.
//!
//! Month lengths in Bikram Sambat vary from year to year and are published as data,
//! so every BS computation in this crate goes through a [`CalendarTable`]. The shipped
//! table is available from [`CalendarTable::standard`]; alternate tables (for instance
//! with an extended year range) are built with [`CalendarTable::new`] or deserialized
//! from configuration.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{
    AD_REFERENCE, BS_MAX_YEAR, BS_MIN_YEAR, BS_MONTH_DAYS, BS_REFERENCE, FIRST_MONTH, MAX_MONTH,
    MAX_MONTH_DAYS, MIN_DAY, MONTHS_PER_YEAR,
};
use crate::{CalendarError, EnglishDate, NepaliDate};

static STANDARD: LazyLock<CalendarTable> = LazyLock::new(CalendarTable::shipped);

/// A pinned pair of dates, one in each calendar, that denote the same absolute day.
///
/// Both conversion directions walk forward from this pair. The two halves must agree
/// (same day of week, same absolute offset); this is not checked at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReferenceAnchor {
    pub bs: NepaliDate,
    pub ad: EnglishDate,
}

impl ReferenceAnchor {
    /// 1 Baisakh 2000 BS = 14 April 1943 AD
    pub const fn standard() -> Self {
        Self {
            bs: NepaliDate::new(BS_REFERENCE.0, BS_REFERENCE.1, BS_REFERENCE.2),
            ad: EnglishDate::new(AD_REFERENCE.0, AD_REFERENCE.1, AD_REFERENCE.2),
        }
    }
}

/// Read-only Bikram Sambat calendar data: the month lengths of every supported year
/// and the reference anchor conversions pivot on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCalendarTable", into = "RawCalendarTable")]
pub struct CalendarTable {
    first_year: u16,
    months:     Vec<[u8; 12]>,
    anchor:     ReferenceAnchor,
}

/// Serialized form of a [`CalendarTable`]; dates are `[year, month, day]` arrays.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawCalendarTable {
    first_year: u16,
    months:     Vec<[u8; 12]>,
    anchor_bs:  (u16, u8, u8),
    anchor_ad:  (i32, u8, u8),
}

impl TryFrom<RawCalendarTable> for CalendarTable {
    type Error = CalendarError;

    fn try_from(raw: RawCalendarTable) -> Result<Self, Self::Error> {
        let anchor = ReferenceAnchor {
            bs: raw.anchor_bs.into(),
            ad: raw.anchor_ad.into(),
        };
        Self::new(raw.first_year, raw.months, anchor)
    }
}

impl From<CalendarTable> for RawCalendarTable {
    fn from(table: CalendarTable) -> Self {
        Self {
            first_year: table.first_year,
            months:     table.months,
            anchor_bs:  table.anchor.bs.into(),
            anchor_ad:  table.anchor.ad.into(),
        }
    }
}

impl CalendarTable {
    /// The shipped table, covering [`BS_MIN_YEAR`]..=[`BS_MAX_YEAR`].
    ///
    /// Built on first use and shared by every caller for the rest of the process.
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    fn shipped() -> Self {
        debug!(
            first_year = BS_MIN_YEAR,
            last_year = BS_MAX_YEAR,
            "loading shipped calendar table"
        );
        Self {
            first_year: BS_MIN_YEAR,
            months:     BS_MONTH_DAYS.to_vec(),
            anchor:     ReferenceAnchor::standard(),
        }
    }

    /// Builds an alternate table starting at `first_year`, one row of twelve month
    /// lengths per consecutive year.
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidTable` if there are no rows, the year range does
    /// not fit, a month length is outside `1..=32`, or the anchor does not name a real
    /// day on both sides.
    pub fn new(
        first_year: u16,
        months: Vec<[u8; 12]>,
        anchor: ReferenceAnchor,
    ) -> Result<Self, CalendarError> {
        if months.is_empty() {
            return Err(CalendarError::InvalidTable("no years given".to_owned()));
        }
        u16::try_from(months.len() - 1)
            .ok()
            .and_then(|span| first_year.checked_add(span))
            .ok_or_else(|| {
                CalendarError::InvalidTable(format!(
                    "{} years starting at {first_year} overflow the year range",
                    months.len()
                ))
            })?;

        for (offset, row) in months.iter().enumerate() {
            if let Some(pos) = row.iter().position(|&len| len == 0 || len > MAX_MONTH_DAYS) {
                return Err(CalendarError::InvalidTable(format!(
                    "year {} month {} has {} days (must be 1-{MAX_MONTH_DAYS})",
                    usize::from(first_year) + offset,
                    pos + 1,
                    row[pos]
                )));
            }
        }

        let table = Self {
            first_year,
            months,
            anchor,
        };

        if !table.is_valid_date(anchor.bs) {
            return Err(CalendarError::InvalidTable(format!(
                "anchor {} is not a date in the table",
                anchor.bs
            )));
        }
        if !anchor.ad.is_valid() {
            return Err(CalendarError::InvalidTable(format!(
                "anchor {} is not a Gregorian date",
                anchor.ad
            )));
        }

        debug!(
            first_year,
            last_year = table.max_year(),
            anchor_bs = %anchor.bs,
            anchor_ad = %anchor.ad,
            "built calendar table"
        );
        Ok(table)
    }

    /// First supported year (inclusive)
    pub const fn min_year(&self) -> u16 {
        self.first_year
    }

    /// Last supported year (inclusive)
    #[allow(clippy::cast_possible_truncation)]
    pub fn max_year(&self) -> u16 {
        // length was checked to fit at construction
        self.first_year + (self.months.len() - 1) as u16
    }

    /// The reference anchor conversions pivot on
    pub const fn anchor(&self) -> ReferenceAnchor {
        self.anchor
    }

    /// 1 Baisakh of the first supported year
    pub const fn first_date(&self) -> NepaliDate {
        NepaliDate::new(self.first_year, FIRST_MONTH, MIN_DAY)
    }

    /// Last day of Chaitra in the last supported year
    pub fn last_date(&self) -> NepaliDate {
        let last_row = self.months.last().copied().unwrap_or_default();
        NepaliDate::new(self.max_year(), MAX_MONTH, last_row[usize::from(MAX_MONTH - 1)])
    }

    fn year_row(&self, year: u16) -> Result<&[u8; 12], CalendarError> {
        year.checked_sub(self.first_year)
            .and_then(|offset| self.months.get(usize::from(offset)))
            .ok_or_else(|| CalendarError::UnsupportedYear {
                year,
                min: self.min_year(),
                max: self.max_year(),
            })
    }

    /// Number of days in `month` of `year`.
    ///
    /// # Errors
    /// Returns `CalendarError::UnsupportedYear` if the year is outside the table, or
    /// `CalendarError::InvalidMonth` if the month is outside `1..=12`.
    pub fn days_in_month(&self, year: u16, month: u8) -> Result<u8, CalendarError> {
        let row = self.year_row(year)?;
        if month == 0 || month > MONTHS_PER_YEAR {
            return Err(CalendarError::InvalidMonth { month });
        }
        Ok(row[usize::from(month - 1)])
    }

    /// Number of days in `year`.
    ///
    /// # Errors
    /// Returns `CalendarError::UnsupportedYear` if the year is outside the table.
    pub fn total_days_in_year(&self, year: u16) -> Result<u32, CalendarError> {
        Ok(self.year_row(year)?.iter().copied().map(u32::from).sum())
    }

    /// Returns true if the triple is a real date in this table. Never fails.
    pub fn is_valid(&self, year: u16, month: u8, day: u8) -> bool {
        self.days_in_month(year, month)
            .is_ok_and(|len| (MIN_DAY..=len).contains(&day))
    }

    /// Same as [`CalendarTable::is_valid`] on a [`NepaliDate`]
    pub fn is_valid_date(&self, date: NepaliDate) -> bool {
        self.is_valid(date.year, date.month, date.day)
    }

    /// Days from 1 Baisakh of the first table year to `date`.
    fn ordinal_from_start(&self, date: NepaliDate) -> Result<u32, CalendarError> {
        if !self.is_valid_date(date) {
            return Err(CalendarError::InvalidBsDate {
                year:  date.year,
                month: date.month,
                day:   date.day,
            });
        }

        let mut days = 0;
        for year in self.first_year..date.year {
            days += self.total_days_in_year(year)?;
        }
        let row = self.year_row(date.year)?;
        days += row[..usize::from(date.month - 1)]
            .iter()
            .copied()
            .map(u32::from)
            .sum::<u32>();
        Ok(days + u32::from(date.day - MIN_DAY))
    }

    /// Whole days between the reference anchor and `date`.
    ///
    /// Sums whole years, then whole months, then the day remainder, so cost is linear
    /// in the distance from the anchor year. Only defined on or after the anchor: the
    /// counter never produces negative offsets.
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidBsDate` if the date is not in the table, or
    /// `CalendarError::DateBeforeSupportedRange` if it precedes the anchor.
    pub fn days_since_reference(&self, date: NepaliDate) -> Result<u32, CalendarError> {
        let target = self.ordinal_from_start(date)?;
        let origin = self.ordinal_from_start(self.anchor.bs)?;
        target
            .checked_sub(origin)
            .ok_or_else(|| CalendarError::DateBeforeSupportedRange {
                date: date.to_string(),
            })
    }
}

/// Number of days in a BS month of the standard table.
///
/// # Errors
/// See [`CalendarTable::days_in_month`].
pub fn days_in_month(year: u16, month: u8) -> Result<u8, CalendarError> {
    CalendarTable::standard().days_in_month(year, month)
}

/// Number of days in a BS year of the standard table.
///
/// # Errors
/// See [`CalendarTable::total_days_in_year`].
pub fn total_days_in_year(year: u16) -> Result<u32, CalendarError> {
    CalendarTable::standard().total_days_in_year(year)
}

/// Returns true if the triple is a real BS date in the standard table. Never fails.
pub fn is_valid_bs_date(year: u16, month: u8, day: u8) -> bool {
    CalendarTable::standard().is_valid(year, month, day)
}

/// Days between the standard reference anchor (1 Baisakh 2000) and the given BS date.
///
/// # Errors
/// See [`CalendarTable::days_since_reference`].
pub fn days_since_bs_reference(year: u16, month: u8, day: u8) -> Result<u32, CalendarError> {
    CalendarTable::standard().days_since_reference(NepaliDate::new(year, month, day))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ad, bs};

    fn small_table() -> CalendarTable {
        CalendarTable::new(
            2080,
            vec![
                [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 30],
                [31, 31, 32, 32, 31, 30, 30, 30, 29, 30, 30, 30],
            ],
            ReferenceAnchor {
                bs: bs(2080, 1, 1),
                ad: ad(2023, 4, 14),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_standard_range() {
        let table = CalendarTable::standard();
        assert_eq!(table.min_year(), BS_MIN_YEAR);
        assert_eq!(table.max_year(), BS_MAX_YEAR);
        assert_eq!(table.first_date(), bs(2000, 1, 1));
        assert_eq!(table.last_date(), bs(2090, 12, 30));
        assert_eq!(table.anchor(), ReferenceAnchor::standard());
    }

    #[test]
    fn test_standard_month_lengths_in_observed_range() {
        let table = CalendarTable::standard();
        for year in BS_MIN_YEAR..=BS_MAX_YEAR {
            for month in 1..=12 {
                let len = table.days_in_month(year, month).unwrap();
                assert!(
                    (29..=32).contains(&len),
                    "{year}-{month:02} has {len} days"
                );
            }
        }
    }

    #[test]
    fn test_days_in_month_lookup() {
        assert_eq!(days_in_month(2000, 1), Ok(30));
        assert_eq!(days_in_month(2000, 2), Ok(32));
        assert_eq!(days_in_month(2081, 12), Ok(30));
        assert_eq!(days_in_month(2082, 10), Ok(30));
    }

    #[test]
    fn test_days_in_month_errors() {
        assert_eq!(
            days_in_month(1999, 1),
            Err(CalendarError::UnsupportedYear {
                year: 1999,
                min:  BS_MIN_YEAR,
                max:  BS_MAX_YEAR,
            })
        );
        assert!(matches!(
            days_in_month(2091, 1),
            Err(CalendarError::UnsupportedYear { year: 2091, .. })
        ));
        assert_eq!(
            days_in_month(2082, 0),
            Err(CalendarError::InvalidMonth { month: 0 })
        );
        assert_eq!(
            days_in_month(2082, 13),
            Err(CalendarError::InvalidMonth { month: 13 })
        );
        // year is checked before month
        assert!(matches!(
            days_in_month(3000, 13),
            Err(CalendarError::UnsupportedYear { .. })
        ));
    }

    #[test]
    fn test_total_days_in_year() {
        assert_eq!(total_days_in_year(2000), Ok(365));
        assert_eq!(total_days_in_year(2080), Ok(365));
        assert_eq!(total_days_in_year(2081), Ok(366));
        assert!(total_days_in_year(1999).is_err());
    }

    #[test]
    fn test_year_totals_match_month_sums() {
        let table = CalendarTable::standard();
        for year in BS_MIN_YEAR..=BS_MAX_YEAR {
            let sum: u32 = (1..=12)
                .map(|m| u32::from(table.days_in_month(year, m).unwrap()))
                .sum();
            assert_eq!(table.total_days_in_year(year), Ok(sum));
            assert!((365..=366).contains(&sum), "year {year} has {sum} days");
        }
    }

    #[test]
    fn test_is_valid_bs_date_cases() {
        struct TestCase {
            year:        u16,
            month:       u8,
            day:         u8,
            valid:       bool,
            description: &'static str,
        }

        let cases = [
            TestCase {
                year:        2082,
                month:       10,
                day:         6,
                valid:       true,
                description: "ordinary date",
            },
            TestCase {
                year:        2082,
                month:       13,
                day:         1,
                valid:       false,
                description: "month above range",
            },
            TestCase {
                year:        2082,
                month:       0,
                day:         1,
                valid:       false,
                description: "month zero",
            },
            TestCase {
                year:        2082,
                month:       10,
                day:         0,
                valid:       false,
                description: "day zero",
            },
            TestCase {
                year:        2000,
                month:       2,
                day:         32,
                valid:       true,
                description: "32-day month",
            },
            TestCase {
                year:        2000,
                month:       1,
                day:         31,
                valid:       false,
                description: "past a 30-day month",
            },
            TestCase {
                year:        1999,
                month:       12,
                day:         30,
                valid:       false,
                description: "year before table",
            },
            TestCase {
                year:        2091,
                month:       1,
                day:         1,
                valid:       false,
                description: "year after table",
            },
        ];

        for case in &cases {
            assert_eq!(
                is_valid_bs_date(case.year, case.month, case.day),
                case.valid,
                "{}-{}-{} ({})",
                case.year,
                case.month,
                case.day,
                case.description
            );
        }
    }

    #[test]
    fn test_validator_month_boundaries() {
        let table = CalendarTable::standard();
        for year in [2000, 2045, 2081, 2090] {
            for month in 1..=12 {
                let len = table.days_in_month(year, month).unwrap();
                assert!(table.is_valid(year, month, len));
                assert!(!table.is_valid(year, month, len + 1));
            }
        }
    }

    #[test]
    fn test_days_since_reference() {
        assert_eq!(days_since_bs_reference(2000, 1, 1), Ok(0));
        assert_eq!(days_since_bs_reference(2000, 1, 30), Ok(29));
        assert_eq!(days_since_bs_reference(2000, 2, 1), Ok(30));
        assert_eq!(days_since_bs_reference(2001, 1, 1), Ok(365));
    }

    #[test]
    fn test_days_since_reference_rejects_invalid() {
        assert!(matches!(
            days_since_bs_reference(2082, 13, 1),
            Err(CalendarError::InvalidBsDate { .. })
        ));
        assert!(matches!(
            days_since_bs_reference(1999, 12, 30),
            Err(CalendarError::InvalidBsDate { .. })
        ));
    }

    #[test]
    fn test_days_since_reference_before_anchor() {
        let table = CalendarTable::new(
            2080,
            vec![[31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 30]],
            ReferenceAnchor {
                bs: bs(2080, 2, 1),
                ad: ad(2023, 5, 15),
            },
        )
        .unwrap();
        assert_eq!(table.days_since_reference(bs(2080, 2, 1)), Ok(0));
        assert_eq!(table.days_since_reference(bs(2080, 3, 1)), Ok(32));
        assert_eq!(
            table.days_since_reference(bs(2080, 1, 31)),
            Err(CalendarError::DateBeforeSupportedRange {
                date: "2080-01-31".to_owned(),
            })
        );
    }

    #[test]
    fn test_alternate_table_is_independent() {
        let table = small_table();
        assert_eq!(table.min_year(), 2080);
        assert_eq!(table.max_year(), 2081);
        assert!(table.is_valid(2081, 1, 31));
        assert!(!table.is_valid(2082, 1, 1));
        // the shared table is untouched
        assert!(is_valid_bs_date(2082, 1, 1));
    }

    #[test]
    fn test_new_rejects_bad_tables() {
        let anchor = ReferenceAnchor {
            bs: bs(2080, 1, 1),
            ad: ad(2023, 4, 14),
        };
        let row = [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 30];

        let result = CalendarTable::new(2080, vec![], anchor);
        assert!(matches!(result, Err(CalendarError::InvalidTable(_))));

        let mut bad_row = row;
        bad_row[4] = 33;
        let result = CalendarTable::new(2080, vec![bad_row], anchor);
        assert!(matches!(result, Err(CalendarError::InvalidTable(msg)) if msg.contains("month 5")));

        let result = CalendarTable::new(2081, vec![row], anchor);
        assert!(matches!(result, Err(CalendarError::InvalidTable(msg)) if msg.contains("anchor")));

        let result = CalendarTable::new(
            2080,
            vec![row],
            ReferenceAnchor {
                bs: bs(2080, 1, 1),
                ad: ad(2023, 2, 30),
            },
        );
        assert!(matches!(result, Err(CalendarError::InvalidTable(_))));

        let result = CalendarTable::new(u16::MAX, vec![row, row], anchor);
        assert!(matches!(result, Err(CalendarError::InvalidTable(msg)) if msg.contains("overflow")));
    }

    #[test]
    fn test_serde_round_trip() {
        let table = small_table();
        let json = serde_json::to_string(&table).unwrap();
        assert!(json.contains(r#""anchor_bs":[2080,1,1]"#));
        assert!(json.contains(r#""anchor_ad":[2023,4,14]"#));

        let parsed: CalendarTable = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, table);
    }

    #[test]
    fn test_serde_validation() {
        let json = r#"{
            "first_year": 2080,
            "months": [[31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 30]],
            "anchor_bs": [2080, 1, 1],
            "anchor_ad": [2023, 4, 14]
        }"#;
        let table: CalendarTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.total_days_in_year(2080), Ok(365));

        // anchor outside the table
        let json = r#"{
            "first_year": 2080,
            "months": [[31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 30]],
            "anchor_bs": [2079, 1, 1],
            "anchor_ad": [2022, 4, 14]
        }"#;
        let result: Result<CalendarTable, _> = serde_json::from_str(json);
        assert!(result.is_err());

        // month length of zero
        let json = r#"{
            "first_year": 2080,
            "months": [[0, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 30]],
            "anchor_bs": [2080, 1, 1],
            "anchor_ad": [2023, 4, 14]
        }"#;
        let result: Result<CalendarTable, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
