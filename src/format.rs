//! Token-pattern formatting of BS and AD dates, localized names and numerals.
//!
//! A pattern is scanned once, left to right, into literal text and date fields. Runs of
//! `Y`, `M` or `D` are split greedily into the longest token that fits, so `MMMM` is a
//! month name and never four month numbers. Every other character is literal.
//!
//! | Token  | Output                                   |
//! |--------|------------------------------------------|
//! | `YYYY` | full year                                |
//! | `YY`   | year modulo 100, two digits              |
//! | `MMMM` | month name                               |
//! | `MMM`  | first three characters of the month name |
//! | `MM`   | month number, two digits                 |
//! | `M`    | month number                             |
//! | `DD`   | day, two digits                          |
//! | `D`    | day                                      |

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{
    AD_MONTHS, BS_MONTHS_EN, BS_MONTHS_NE, MAX_MONTH, NEPALI_DIGITS, WEEKDAYS_EN, WEEKDAYS_NE,
    WEEKDAYS_SHORT_EN, WEEKDAYS_SHORT_NE,
};
use crate::prelude::*;
use crate::{CalendarError, EnglishDate, NepaliDate};

/// Output language for names and numerals.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English names, ASCII digits
    #[default]
    #[display(fmt = "en")]
    En,
    /// Nepali names, Devanagari digits
    #[display(fmt = "ne")]
    Ne,
}

impl FromStr for Language {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "ne" => Ok(Self::Ne),
            other => Err(CalendarError::UnknownLanguage(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Year,
    YearShort,
    MonthName,
    MonthAbbr,
    MonthPadded,
    Month,
    DayPadded,
    Day,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// Longest token starting a run of `run` copies of `letter`, with its width.
const fn longest_field(letter: char, run: usize) -> Option<(Field, usize)> {
    match (letter, run) {
        ('Y', 4..) => Some((Field::Year, 4)),
        ('Y', 2..) => Some((Field::YearShort, 2)),
        ('M', 4..) => Some((Field::MonthName, 4)),
        ('M', 3) => Some((Field::MonthAbbr, 3)),
        ('M', 2) => Some((Field::MonthPadded, 2)),
        ('M', 1) => Some((Field::Month, 1)),
        ('D', 2..) => Some((Field::DayPadded, 2)),
        ('D', 1) => Some((Field::Day, 1)),
        _ => None,
    }
}

/// A formatting pattern, tokenized once and reusable for any number of dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
    segments: Vec<Segment>,
}

impl DatePattern {
    /// Tokenizes `pattern`. Any text is accepted; characters that do not form a token
    /// are copied through unchanged.
    pub fn new(pattern: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            if !matches!(c, 'Y' | 'M' | 'D') {
                literal.push(c);
                continue;
            }

            let mut run = 1;
            while chars.next_if_eq(&c).is_some() {
                run += 1;
            }
            while run > 0 {
                if let Some((field, width)) = longest_field(c, run) {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(field));
                    run -= width;
                } else {
                    literal.push(c);
                    run -= 1;
                }
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self { segments }
    }

    /// Renders a Bikram Sambat date with month names from `language`.
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidBsDate` if the standard table does not have the day.
    pub fn format_bs(&self, date: NepaliDate, language: Language) -> Result<String, CalendarError> {
        if !date.is_valid() {
            return Err(CalendarError::InvalidBsDate {
                year:  date.year,
                month: date.month,
                day:   date.day,
            });
        }
        let month_name = bs_month_name(date.month, language)?;
        Ok(self.render(i64::from(date.year), date.month, date.day, month_name, language))
    }

    /// Renders a Gregorian date. Month names are always English; digits follow
    /// `language`.
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidAdDate` if the date is not a real Gregorian day.
    pub fn format_ad(&self, date: EnglishDate, language: Language) -> Result<String, CalendarError> {
        date.to_naive()?;
        let month_name = ad_month_name(date.month)?;
        Ok(self.render(i64::from(date.year), date.month, date.day, month_name, language))
    }

    fn render(&self, year: i64, month: u8, day: u8, month_name: &str, language: Language) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(Field::MonthName) => out.push_str(month_name),
                Segment::Field(Field::MonthAbbr) => out.extend(month_name.chars().take(3)),
                Segment::Field(field) => {
                    let digits = match field {
                        Field::Year => year.to_string(),
                        Field::YearShort => format!("{:02}", year.rem_euclid(100)),
                        Field::MonthPadded => format!("{month:02}"),
                        Field::Month => month.to_string(),
                        Field::DayPadded => format!("{day:02}"),
                        Field::Day => day.to_string(),
                        Field::MonthName | Field::MonthAbbr => String::new(),
                    };
                    out.push_str(&localize_digits(&digits, language));
                }
            }
        }
        out
    }
}

impl From<&str> for DatePattern {
    fn from(pattern: &str) -> Self {
        Self::new(pattern)
    }
}

/// Formats a Bikram Sambat date through a token pattern.
///
/// # Errors
/// See [`DatePattern::format_bs`].
pub fn format_bs_date(
    date: NepaliDate,
    pattern: &str,
    language: Language,
) -> Result<String, CalendarError> {
    DatePattern::new(pattern).format_bs(date, language)
}

/// Formats a Gregorian date through a token pattern.
///
/// # Errors
/// See [`DatePattern::format_ad`].
pub fn format_ad_date(
    date: EnglishDate,
    pattern: &str,
    language: Language,
) -> Result<String, CalendarError> {
    DatePattern::new(pattern).format_ad(date, language)
}

/// Renders an integer with each ASCII digit replaced by its Devanagari glyph.
///
/// Digit order and count are preserved; a leading minus sign is kept as is.
pub fn to_localized_digits(n: impl Into<i64>) -> String {
    localize_digits(&n.into().to_string(), Language::Ne)
}

/// Replaces ASCII digits in `text` with the digits of `language`, leaving every other
/// character untouched.
pub fn localize_digits(text: &str, language: Language) -> String {
    match language {
        Language::En => text.to_owned(),
        Language::Ne => text
            .chars()
            .map(|c| c.to_digit(10).map_or(c, |d| NEPALI_DIGITS[d as usize]))
            .collect(),
    }
}

/// All twelve Bikram Sambat month names in `language`, Baisakh first
pub const fn bs_month_names(language: Language) -> &'static [&'static str; 12] {
    match language {
        Language::En => &BS_MONTHS_EN,
        Language::Ne => &BS_MONTHS_NE,
    }
}

/// Name of a Bikram Sambat month in `language`.
///
/// # Errors
/// Returns `CalendarError::InvalidMonth` if the month is outside `1..=12`.
pub fn bs_month_name(month: u8, language: Language) -> Result<&'static str, CalendarError> {
    month_index(month).map(|i| bs_month_names(language)[i])
}

/// English name of a Gregorian month.
///
/// # Errors
/// Returns `CalendarError::InvalidMonth` if the month is outside `1..=12`.
pub fn ad_month_name(month: u8) -> Result<&'static str, CalendarError> {
    month_index(month).map(|i| AD_MONTHS[i])
}

/// Full weekday name, `0` for Sunday
pub fn weekday_name(weekday: u8, language: Language) -> Option<&'static str> {
    let names = match language {
        Language::En => &WEEKDAYS_EN,
        Language::Ne => &WEEKDAYS_NE,
    };
    names.get(usize::from(weekday)).copied()
}

/// Abbreviated weekday name, `0` for Sunday
pub fn weekday_short_name(weekday: u8, language: Language) -> Option<&'static str> {
    let names = match language {
        Language::En => &WEEKDAYS_SHORT_EN,
        Language::Ne => &WEEKDAYS_SHORT_NE,
    };
    names.get(usize::from(weekday)).copied()
}

const fn month_index(month: u8) -> Result<usize, CalendarError> {
    if month == 0 || month > MAX_MONTH {
        return Err(CalendarError::InvalidMonth { month });
    }
    Ok((month - 1) as usize)
}
