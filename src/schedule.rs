use chrono::{Datelike, NaiveDate};
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Days between 0001-01-01 (CE day 1) and the unix epoch, which polars uses
/// as day zero for `Date` columns.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// One study day in a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledDay {
    pub date: NaiveDate,
    pub items: u32,
}

impl ScheduledDay {
    pub fn new(date: NaiveDate, items: u32) -> Self {
        Self { date, items }
    }
}

/// Chronological list of study days. Rest days never appear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DaySchedule {
    days: Vec<ScheduledDay>,
}

impl DaySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            days: Vec::with_capacity(capacity),
        }
    }

    /// Append a day. Days must be pushed in chronological order.
    pub(crate) fn push(&mut self, day: ScheduledDay) {
        debug_assert!(self.days.last().is_none_or(|last| last.date < day.date));
        self.days.push(day);
    }

    pub fn days(&self) -> &[ScheduledDay] {
        &self.days
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScheduledDay> {
        self.days.iter()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn first(&self) -> Option<&ScheduledDay> {
        self.days.first()
    }

    pub fn last(&self) -> Option<&ScheduledDay> {
        self.days.last()
    }

    pub fn total_items(&self) -> u64 {
        self.days.iter().map(|day| u64::from(day.items)).sum()
    }

    /// Two-column frame: `date` (Date) and `items` (UInt32).
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let dates: Vec<i32> = self
            .days
            .iter()
            .map(|day| Self::date_to_i32(day.date))
            .collect();
        let items: Vec<u32> = self.days.iter().map(|day| day.items).collect();

        let date_col = Series::new(PlSmallStr::from_static("date"), dates)
            .cast(&DataType::Date)?
            .into_column();
        let items_col = Series::new(PlSmallStr::from_static("items"), items).into_column();
        DataFrame::new(vec![date_col, items_col])
    }

    fn date_to_i32(date: NaiveDate) -> i32 {
        date.num_days_from_ce() - EPOCH_DAYS_FROM_CE
    }
}

impl<'a> IntoIterator for &'a DaySchedule {
    type Item = &'a ScheduledDay;
    type IntoIter = std::slice::Iter<'a, ScheduledDay>;

    fn into_iter(self) -> Self::IntoIter {
        self.days.iter()
    }
}
