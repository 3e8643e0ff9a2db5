//! Calendar-month arithmetic used for bucketing and range selection.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

// ── YearMonth ─────────────────────────────────────────────────────────────────

/// A calendar month, ordered chronologically and formatted as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Build a month, returning `None` when `month` is outside `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// The month containing `ts`.
    pub fn of(ts: NaiveDateTime) -> Self {
        Self {
            year: ts.year(),
            month: ts.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The following calendar month.
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Month-start boundary: midnight on the first day of the month.
    pub fn first_instant(&self) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or(NaiveDateTime::MIN)
    }

    /// `true` when `ts` falls inside this month.
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        Self::of(ts) == *self
    }

    /// Every month from `start` through `end`, inclusive.
    ///
    /// Returns an empty list when `start > end`.
    pub fn range_inclusive(start: YearMonth, end: YearMonth) -> Vec<YearMonth> {
        let mut months = Vec::new();
        let mut current = start;
        while current <= end {
            months.push(current);
            current = current.next();
        }
        months
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DashboardError::InvalidMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        YearMonth::new(year, month).ok_or_else(invalid)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = DashboardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

// ── MonthRange ────────────────────────────────────────────────────────────────

/// An inclusive range of calendar months as picked by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRange {
    pub start: YearMonth,
    pub end: YearMonth,
}

impl MonthRange {
    pub fn new(start: YearMonth, end: YearMonth) -> Self {
        Self { start, end }
    }

    /// `true` when the start month lies after the end month.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    /// `true` when `other` lies entirely inside `self`.
    pub fn contains_range(&self, other: &MonthRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for MonthRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
