use crate::config::FormDefaults;
use crate::error::PlanError;
use crate::request::{PlanMode, PlanRequest};
use chrono::NaiveDate;
use std::ops::RangeInclusive;

pub const TOTAL_ITEMS_RANGE: RangeInclusive<u32> = 1..=999_999;
pub const DURATION_DAYS_RANGE: RangeInclusive<u32> = 1..=9_999;
pub const RATE_PER_DAY_RANGE: RangeInclusive<u32> = 1..=9_999;

/// Editable input state for an interactive front end.
///
/// Holds both the duration and the rate so switching modes keeps the user's
/// values; [`PlanForm::to_request`] only forwards the one the mode needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanForm {
    pub mode: PlanMode,
    total_items: u32,
    duration_days: u32,
    rate_per_day: u32,
    pub start_date: NaiveDate,
    pub include_weekends: bool,
    pub verbose: bool,
    pub deck_id: Option<i64>,
}

impl PlanForm {
    pub fn new(defaults: &FormDefaults, start_date: NaiveDate) -> Self {
        Self {
            mode: defaults.mode,
            total_items: defaults.total_items,
            duration_days: defaults.duration_days,
            rate_per_day: defaults.rate_per_day,
            start_date,
            include_weekends: defaults.include_weekends,
            verbose: defaults.verbose,
            deck_id: None,
        }
    }

    pub fn total_items(&self) -> u32 {
        self.total_items
    }

    pub fn duration_days(&self) -> u32 {
        self.duration_days
    }

    pub fn rate_per_day(&self) -> u32 {
        self.rate_per_day
    }

    pub fn set_total_items(&mut self, value: u32) -> Result<(), PlanError> {
        self.total_items = checked("total items", value, &TOTAL_ITEMS_RANGE)?;
        Ok(())
    }

    pub fn set_duration_days(&mut self, value: u32) -> Result<(), PlanError> {
        self.duration_days = checked("duration", value, &DURATION_DAYS_RANGE)?;
        Ok(())
    }

    pub fn set_rate_per_day(&mut self, value: u32) -> Result<(), PlanError> {
        self.rate_per_day = checked("rate", value, &RATE_PER_DAY_RANGE)?;
        Ok(())
    }

    /// Applying a limit to a deck only makes sense when the rate is derived.
    pub fn can_apply_to_deck(&self) -> bool {
        self.mode == PlanMode::RateFromDuration
    }

    pub fn to_request(&self) -> Result<PlanRequest, PlanError> {
        let (duration, rate) = match self.mode {
            PlanMode::RateFromDuration => (Some(self.duration_days), None),
            PlanMode::DurationFromRate => (None, Some(self.rate_per_day)),
        };
        let request =
            PlanRequest::from_parts(self.mode, self.total_items, self.start_date, duration, rate)?
                .with_weekends(self.include_weekends)
                .with_verbose(self.verbose);
        Ok(request)
    }
}

pub(crate) fn checked(
    field: &str,
    value: u32,
    range: &RangeInclusive<u32>,
) -> Result<u32, PlanError> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(PlanError::invalid(format!(
            "{field} must be between {} and {} (got {value})",
            range.start(),
            range.end()
        )))
    }
}
