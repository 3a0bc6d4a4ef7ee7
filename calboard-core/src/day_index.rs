//! Day bucketing and month grid layout.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::entry::CalendarEntry;

/// A local calendar date, stripped of time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn new(date: NaiveDate) -> Self {
        DayKey(date)
    }

    /// The local calendar day an instant falls on.
    pub fn of(instant: &DateTime<Local>) -> Self {
        DayKey(instant.date_naive())
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(DayKey)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        DayKey(date)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DayKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(DayKey)
            .map_err(|_| format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
    }
}

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| YearMonth { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        // Constructors only admit valid months
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn days_in_month(&self) -> u32 {
        let first = self.first_day();
        match first.checked_add_months(Months::new(1)) {
            Some(next) => (next - first).num_days() as u32,
            None => 31,
        }
    }

    /// Weekday of the 1st, counted from Sunday = 0.
    pub fn first_weekday(&self) -> u32 {
        self.first_day().weekday().num_days_from_sunday()
    }

    /// Shift by a number of months, carrying across year boundaries.
    pub fn offset(&self, delta: i32) -> Self {
        let index = self.year * 12 + (self.month as i32 - 1) + delta;
        YearMonth {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("Invalid month '{}'. Expected YYYY-MM", s);
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        YearMonth::new(year, month).ok_or_else(invalid)
    }
}

/// Entry ids bucketed by the local calendar day of their start time.
///
/// Every entry sits in exactly one bucket; multi-day entries are not split.
/// Within a bucket, ids keep the order of the aggregate they came from.
#[derive(Debug, Clone, Default)]
pub struct DayIndex {
    buckets: BTreeMap<DayKey, Vec<String>>,
}

impl DayIndex {
    pub fn build(entries: &[CalendarEntry]) -> Self {
        let mut buckets: BTreeMap<DayKey, Vec<String>> = BTreeMap::new();
        for entry in entries {
            buckets.entry(entry.day_key()).or_default().push(entry.id.clone());
        }
        DayIndex { buckets }
    }

    pub fn entries_on(&self, day: DayKey) -> &[String] {
        self.buckets.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Lay out a month as Sunday-first grid cells.
    pub fn month_grid(&self, month: YearMonth) -> MonthGrid {
        let leading = month.first_weekday() as usize;
        let mut cells = Vec::with_capacity(leading + month.days_in_month() as usize);
        cells.extend(std::iter::repeat_n(GridCell::Blank, leading));

        let first = month.first_day();
        for date in first.iter_days().take(month.days_in_month() as usize) {
            let day = DayKey(date);
            cells.push(GridCell::Day {
                day,
                entry_ids: self.entries_on(day).to_vec(),
            });
        }

        MonthGrid { month, cells }
    }
}

/// Convenience wrapper around [`DayIndex::build`].
pub fn index_by_day(entries: &[CalendarEntry]) -> DayIndex {
    DayIndex::build(entries)
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridCell {
    /// Padding for days of the previous month.
    Blank,
    Day { day: DayKey, entry_ids: Vec<String> },
}

#[derive(Debug, Clone)]
pub struct MonthGrid {
    pub month: YearMonth,
    pub cells: Vec<GridCell>,
}

impl MonthGrid {
    pub const COLUMNS: usize = 7;

    pub fn leading_blanks(&self) -> usize {
        self.cells
            .iter()
            .take_while(|cell| matches!(cell, GridCell::Blank))
            .count()
    }

    /// Cells chunked into week rows. The last row may be short.
    pub fn weeks(&self) -> impl Iterator<Item = &[GridCell]> {
        self.cells.chunks(Self::COLUMNS)
    }
}
