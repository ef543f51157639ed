//! Calendar periods and date-range filtering
//!
//! Time-indexed tables are keyed by a `YYYY-MM` period. Filtering compares
//! [`YearMonth`] values directly instead of their string form, so ordering
//! never depends on zero padding.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("invalid period '{0}': expected YYYY-MM")]
    Format(String),

    #[error("invalid period '{0}': month must be between 01 and 12")]
    Month(String),
}

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::Month(format!("{:04}-{:02}", year, month)));
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl From<NaiveDate> for YearMonth {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl FromStr for YearMonth {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (year, month) = trimmed
            .split_once('-')
            .ok_or_else(|| PeriodError::Format(s.to_string()))?;

        if year.len() != 4 || month.len() != 2 {
            return Err(PeriodError::Format(s.to_string()));
        }

        let year: i32 = year.parse().map_err(|_| PeriodError::Format(s.to_string()))?;
        let month: u32 = month.parse().map_err(|_| PeriodError::Format(s.to_string()))?;

        Self::new(year, month)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Rows that belong to a single calendar month.
pub trait Periodic {
    fn period(&self) -> YearMonth;
}

/// Inclusive date range picked in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Start and end bounds reduced to their months
    pub fn periods(&self) -> (YearMonth, YearMonth) {
        (YearMonth::from(self.start), YearMonth::from(self.end))
    }

    /// True when the range cannot match any period.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    /// Whether `period` falls between the start and end months, inclusive.
    pub fn contains(&self, period: YearMonth) -> bool {
        if self.is_inverted() {
            return false;
        }
        let (start, end) = self.periods();
        start <= period && period <= end
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2017, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2018, 8, 31).unwrap_or_default(),
        }
    }
}

/// Keep the rows whose period lies inside `range`, in input order.
///
/// An inverted range (start after end) yields an empty view, even when both
/// dates fall in the same month.
pub fn filter_by_period<'a, T: Periodic>(rows: &'a [T], range: &DateRange) -> Vec<&'a T> {
    rows.iter()
        .filter(|row| range.contains(row.period()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(s: &str) -> YearMonth {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let period = ym("2017-03");
        assert_eq!(period.year(), 2017);
        assert_eq!(period.month(), 3);
        assert_eq!(period.to_string(), "2017-03");
    }

    #[test]
    fn test_rejects_bad_periods() {
        assert!(matches!("2017-13".parse::<YearMonth>(), Err(PeriodError::Month(_))));
        assert!(matches!("2017-00".parse::<YearMonth>(), Err(PeriodError::Month(_))));
        assert!(matches!("2017-3".parse::<YearMonth>(), Err(PeriodError::Format(_))));
        assert!(matches!("201703".parse::<YearMonth>(), Err(PeriodError::Format(_))));
        assert!(matches!("".parse::<YearMonth>(), Err(PeriodError::Format(_))));
        assert!(YearMonth::new(2018, 0).is_err());
    }

    #[test]
    fn test_ordering_is_chronological() {
        assert!(ym("2016-12") < ym("2017-01"));
        assert!(ym("2017-09") < ym("2017-10"));
        assert!(ym("2018-01") > ym("2017-12"));
    }

    #[test]
    fn test_from_date_drops_day() {
        let date = NaiveDate::from_ymd_opt(2018, 8, 31).unwrap();
        assert_eq!(YearMonth::from(date), ym("2018-08"));
    }

    #[test]
    fn test_default_range() {
        let range = DateRange::default();
        assert_eq!(range.periods(), (ym("2017-01"), ym("2018-08")));
        assert!(!range.is_inverted());
    }

    struct Row(YearMonth);

    impl Periodic for Row {
        fn period(&self) -> YearMonth {
            self.0
        }
    }

    #[test]
    fn test_filter_is_inclusive() {
        let rows: Vec<Row> = ["2016-12", "2017-01", "2017-06", "2017-07"]
            .iter()
            .map(|s| Row(ym(s)))
            .collect();
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2017, 1, 15).unwrap(),
            NaiveDate::from_ymd_opt(2017, 6, 1).unwrap(),
        );

        let kept: Vec<String> = filter_by_period(&rows, &range)
            .iter()
            .map(|r| r.0.to_string())
            .collect();
        assert_eq!(kept, vec!["2017-01", "2017-06"]);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let rows = vec![Row(ym("2017-01")), Row(ym("2017-02"))];
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2017, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2017, 1, 1).unwrap(),
        );
        assert!(range.is_inverted());
        assert!(filter_by_period(&rows, &range).is_empty());
    }

    #[test]
    fn test_same_month_range_with_inverted_days() {
        let rows = vec![Row(ym("2017-05"))];
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2017, 5, 20).unwrap(),
            NaiveDate::from_ymd_opt(2017, 5, 3).unwrap(),
        );
        assert!(!range.contains(ym("2017-05")));
        assert!(filter_by_period(&rows, &range).is_empty());
    }

    #[test]
    fn test_single_month_range() {
        let rows = vec![Row(ym("2017-04")), Row(ym("2017-05")), Row(ym("2017-06"))];
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2017, 5, 3).unwrap(),
            NaiveDate::from_ymd_opt(2017, 5, 20).unwrap(),
        );
        let kept = filter_by_period(&rows, &range);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].0, ym("2017-05"));
    }
}
