use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Decides which calendar days count as study days.
///
/// Weekdays (Mon-Fri) are always study days; Saturday and Sunday only when
/// weekends are included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyCalendar {
    include_weekends: bool,
}

impl Default for StudyCalendar {
    fn default() -> Self {
        Self::every_day()
    }
}

impl StudyCalendar {
    /// Monday=0 .. Friday=4 are weekdays.
    const LAST_WEEKDAY_INDEX: u32 = 4;

    pub fn new(include_weekends: bool) -> Self {
        Self { include_weekends }
    }

    pub fn every_day() -> Self {
        Self::new(true)
    }

    pub fn weekdays_only() -> Self {
        Self::new(false)
    }

    pub fn includes_weekends(&self) -> bool {
        self.include_weekends
    }

    pub fn is_weekday(weekday: Weekday) -> bool {
        weekday.num_days_from_monday() <= Self::LAST_WEEKDAY_INDEX
    }

    /// Check if a date is a study day under this calendar
    pub fn is_study_day(&self, date: NaiveDate) -> bool {
        self.include_weekends || Self::is_weekday(date.weekday())
    }

    /// Date `offset` days after `start`, or `None` past chrono's supported range
    pub fn day_at(start: NaiveDate, offset: u64) -> Option<NaiveDate> {
        start.checked_add_days(Days::new(offset))
    }

    /// Study days on or after `start`, paired with their offset from `start`.
    pub fn study_days(&self, start: NaiveDate) -> StudyDays {
        StudyDays {
            calendar: *self,
            start,
            offset: 0,
            window: None,
        }
    }

    /// Study days in `[start, start + len - 1]`.
    pub fn study_days_in_window(&self, start: NaiveDate, len: u32) -> StudyDays {
        StudyDays {
            calendar: *self,
            start,
            offset: 0,
            window: Some(u64::from(len)),
        }
    }

    /// Count study days in `[start, start + len - 1]`
    pub fn count_study_days(&self, start: NaiveDate, len: u32) -> u32 {
        if self.include_weekends {
            return len;
        }
        self.study_days_in_window(start, len).count() as u32
    }

    /// Upper bound on the calendar days needed to collect `study_days` study
    /// days from any start date.
    pub fn max_span_for(&self, study_days: u64) -> u64 {
        if self.include_weekends {
            study_days
        } else {
            // at most two rest days before the first study day, then 5 per 7
            study_days.div_ceil(5).saturating_mul(7).saturating_add(2)
        }
    }
}

/// Iterator over study days, yielding `(offset, date)`.
///
/// Stops at the end of the window (when bounded) or at the end of chrono's
/// supported date range.
#[derive(Debug, Clone)]
pub struct StudyDays {
    calendar: StudyCalendar,
    start: NaiveDate,
    offset: u64,
    window: Option<u64>,
}

impl Iterator for StudyDays {
    type Item = (u64, NaiveDate);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(len) = self.window {
                if self.offset >= len {
                    return None;
                }
            }
            let offset = self.offset;
            let date = StudyCalendar::day_at(self.start, offset)?;
            self.offset += 1;
            if self.calendar.is_study_day(date) {
                return Some((offset, date));
            }
        }
    }
}
