//! ISO week keys and the inclusive week windows used to filter both datasets.

use crate::normalize::error::NormalizeError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

/// An ISO-8601 (year, week) pair, the aggregation and join grain of every table.
///
/// Ordering is lexicographic: first by ISO year, then by week number.
///
/// # Examples
///
/// ```
/// use fireweather::WeekKey;
/// use chrono::NaiveDate;
///
/// // 2021-01-03 is a Sunday that still belongs to ISO week 53 of 2020.
/// let date = NaiveDate::from_ymd_opt(2021, 1, 3).unwrap();
/// assert_eq!(WeekKey::from_date(date), WeekKey::new(2020, 53));
/// assert!(WeekKey::new(2019, 52) < WeekKey::new(2020, 1));
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct WeekKey {
    pub year: i32,
    pub week: u32,
}

impl WeekKey {
    pub fn new(year: i32, week: u32) -> Self {
        Self { year, week }
    }

    /// Derives the ISO year and ISO week of a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// ISO years have either 52 or 53 weeks.
    pub fn is_valid_week(week: u32) -> bool {
        (1..=53).contains(&week)
    }
}

impl Display for WeekKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week)
    }
}

/// An inclusive window of ISO weeks, `[start, end]`.
///
/// Both datasets are restricted to the same window before aggregation. The window is always
/// passed explicitly; [`WeekRange::default`] returns the historical study period
/// `[2018-W41, 2022-W41]`.
///
/// # Examples
///
/// ```
/// use fireweather::{WeekKey, WeekRange};
///
/// let window = WeekRange::new(WeekKey::new(2018, 41), WeekKey::new(2022, 41)).unwrap();
/// assert!(window.contains(WeekKey::new(2018, 41)));
/// assert!(window.contains(WeekKey::new(2022, 41)));
/// assert!(!window.contains(WeekKey::new(2018, 40)));
/// assert!(!window.contains(WeekKey::new(2022, 42)));
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWeekRange")]
pub struct WeekRange {
    start: WeekKey,
    end: WeekKey,
}

impl WeekRange {
    /// Creates a window after checking that both week numbers are valid ISO weeks and that
    /// `start` does not come after `end`.
    pub fn new(start: WeekKey, end: WeekKey) -> Result<Self, NormalizeError> {
        if !WeekKey::is_valid_week(start.week)
            || !WeekKey::is_valid_week(end.week)
            || start > end
        {
            return Err(NormalizeError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> WeekKey {
        self.start
    }

    pub fn end(&self) -> WeekKey {
        self.end
    }

    pub fn contains(&self, key: WeekKey) -> bool {
        key >= self.start && key <= self.end
    }
}

impl Default for WeekRange {
    fn default() -> Self {
        Self {
            start: WeekKey::new(2018, 41),
            end: WeekKey::new(2022, 41),
        }
    }
}

impl Display for WeekRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

// Deserialization goes through `new` so a config file can't smuggle in a reversed window.
#[derive(Deserialize)]
struct RawWeekRange {
    start: WeekKey,
    end: WeekKey,
}

impl TryFrom<RawWeekRange> for WeekRange {
    type Error = NormalizeError;

    fn try_from(raw: RawWeekRange) -> Result<Self, Self::Error> {
        WeekRange::new(raw.start, raw.end)
    }
}
