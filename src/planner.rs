use crate::calendar::StudyCalendar;
use crate::error::PlanError;
use crate::request::{PlanMode, PlanRequest, PlanTarget};
use crate::schedule::{DaySchedule, ScheduledDay};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Roughly ten thousand years of calendar days.
pub const DEFAULT_MAX_CALENDAR_DAYS: u64 = 3_660_000;

/// Outcome of one planning call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanResult {
    pub mode: PlanMode,
    pub total_items: u32,
    pub start_date: NaiveDate,
    pub include_weekends: bool,
    /// Pace derived from the duration (rate_from_duration only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computed_rate_per_day: Option<u32>,
    /// Pace supplied by the caller (duration_from_rate only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_rate_per_day: Option<u32>,
    pub study_days_needed: u32,
    pub end_date: NaiveDate,
    /// Rate times study days; may exceed `total_items` (rate_from_duration only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_scheduled: Option<u64>,
    /// Inclusive calendar days from start to end (duration_from_rate only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_days_span: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<DaySchedule>,
}

impl PlanResult {
    /// Items per study day, whichever mode produced the result.
    pub fn pace_per_day(&self) -> u32 {
        self.computed_rate_per_day
            .or(self.target_rate_per_day)
            .unwrap_or(0)
    }
}

/// Stateless pacing calculator. The only knob is the calendar-day cap that
/// bounds every walk, both the fixed window and the open-ended one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulePlanner {
    max_calendar_days: u64,
}

impl Default for SchedulePlanner {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CALENDAR_DAYS)
    }
}

impl SchedulePlanner {
    pub fn new(max_calendar_days: u64) -> Self {
        Self { max_calendar_days }
    }

    pub fn max_calendar_days(&self) -> u64 {
        self.max_calendar_days
    }

    pub fn plan(&self, request: &PlanRequest) -> Result<PlanResult, PlanError> {
        match request.target {
            PlanTarget::RateFromDuration { duration_days } => self.compute_rate_from_duration(
                request.total_items,
                request.start_date,
                duration_days,
                request.include_weekends,
                request.verbose,
            ),
            PlanTarget::DurationFromRate { rate_per_day } => self.compute_duration_from_rate(
                request.total_items,
                request.start_date,
                rate_per_day,
                request.include_weekends,
                request.verbose,
            ),
        }
    }

    /// Spread `total_items` over a fixed window of `duration_days` calendar days.
    pub fn compute_rate_from_duration(
        &self,
        total_items: u32,
        start_date: NaiveDate,
        duration_days: u32,
        include_weekends: bool,
        verbose: bool,
    ) -> Result<PlanResult, PlanError> {
        if duration_days == 0 {
            return Err(PlanError::invalid("duration must be positive"));
        }
        if u64::from(duration_days) > self.max_calendar_days {
            return Err(PlanError::invalid(format!(
                "plan spans {duration_days} calendar days, above the limit of {}",
                self.max_calendar_days
            )));
        }
        let calendar = StudyCalendar::new(include_weekends);
        StudyCalendar::day_at(start_date, u64::from(duration_days) - 1)
            .ok_or_else(out_of_range)?;

        let study_days = calendar.count_study_days(start_date, duration_days);
        if study_days == 0 {
            return Err(PlanError::invalid("no study days in range"));
        }

        let rate = total_items.div_ceil(study_days);
        let total_scheduled = u64::from(rate) * u64::from(study_days);

        let mut schedule = verbose.then(|| DaySchedule::with_capacity(study_days as usize));
        let mut end_date = start_date;
        let mut last_visited = start_date;
        let mut scheduled = 0u32;
        for offset in 0..u64::from(duration_days) {
            if scheduled >= study_days {
                break;
            }
            let day = StudyCalendar::day_at(start_date, offset).ok_or_else(out_of_range)?;
            last_visited = day;
            if calendar.is_study_day(day) {
                scheduled += 1;
                end_date = day;
                if let Some(schedule) = schedule.as_mut() {
                    schedule.push(ScheduledDay::new(day, rate));
                }
            }
        }
        if scheduled < study_days {
            end_date = last_visited;
        }

        debug!(
            total_items,
            duration_days, study_days, rate, %end_date, "computed rate from duration"
        );

        Ok(PlanResult {
            mode: PlanMode::RateFromDuration,
            total_items,
            start_date,
            include_weekends,
            computed_rate_per_day: Some(rate),
            target_rate_per_day: None,
            study_days_needed: study_days,
            end_date,
            total_scheduled: Some(total_scheduled),
            calendar_days_span: None,
            schedule,
        })
    }

    /// Study `rate_per_day` items per study day until `total_items` are covered.
    pub fn compute_duration_from_rate(
        &self,
        total_items: u32,
        start_date: NaiveDate,
        rate_per_day: u32,
        include_weekends: bool,
        verbose: bool,
    ) -> Result<PlanResult, PlanError> {
        if rate_per_day == 0 {
            return Err(PlanError::invalid("rate must be positive"));
        }
        let calendar = StudyCalendar::new(include_weekends);
        let study_days_needed = if total_items > 0 {
            total_items.div_ceil(rate_per_day)
        } else {
            0
        };

        let mut schedule = verbose.then(DaySchedule::new);

        if study_days_needed == 0 {
            let end_date = start_date.pred_opt().ok_or_else(out_of_range)?;
            debug!(%start_date, "nothing to study; plan ends before it starts");
            return Ok(PlanResult {
                mode: PlanMode::DurationFromRate,
                total_items,
                start_date,
                include_weekends,
                computed_rate_per_day: None,
                target_rate_per_day: Some(rate_per_day),
                study_days_needed: 0,
                end_date,
                total_scheduled: None,
                calendar_days_span: Some(0),
                schedule,
            });
        }

        let walk_bound = calendar.max_span_for(u64::from(study_days_needed));
        if walk_bound > self.max_calendar_days {
            return Err(PlanError::invalid(format!(
                "plan may span up to {walk_bound} calendar days, above the limit of {}",
                self.max_calendar_days
            )));
        }

        let mut end_date = start_date;
        let mut counted = 0u32;
        let mut days = calendar.study_days(start_date);
        while counted < study_days_needed {
            let (offset, day) = days.next().ok_or_else(out_of_range)?;
            if offset >= walk_bound {
                return Err(PlanError::internal(format!(
                    "study-day walk passed {walk_bound} calendar days with {counted} of {study_days_needed} days counted"
                )));
            }
            counted += 1;
            end_date = day;
            if let Some(schedule) = schedule.as_mut() {
                schedule.push(ScheduledDay::new(day, rate_per_day));
            }
        }

        let calendar_days_span = u64::try_from((end_date - start_date).num_days() + 1)
            .map_err(|_| PlanError::internal("end date precedes start date"))?;

        debug!(
            total_items,
            rate_per_day, study_days_needed, calendar_days_span, %end_date,
            "computed duration from rate"
        );

        Ok(PlanResult {
            mode: PlanMode::DurationFromRate,
            total_items,
            start_date,
            include_weekends,
            computed_rate_per_day: None,
            target_rate_per_day: Some(rate_per_day),
            study_days_needed,
            end_date,
            total_scheduled: None,
            calendar_days_span: Some(calendar_days_span),
            schedule,
        })
    }
}

fn out_of_range() -> PlanError {
    PlanError::invalid("date out of range")
}

/// [`SchedulePlanner::compute_rate_from_duration`] with the default planner.
pub fn compute_rate_from_duration(
    total_items: u32,
    start_date: NaiveDate,
    duration_days: u32,
    include_weekends: bool,
    verbose: bool,
) -> Result<PlanResult, PlanError> {
    SchedulePlanner::default().compute_rate_from_duration(
        total_items,
        start_date,
        duration_days,
        include_weekends,
        verbose,
    )
}

/// [`SchedulePlanner::compute_duration_from_rate`] with the default planner.
pub fn compute_duration_from_rate(
    total_items: u32,
    start_date: NaiveDate,
    rate_per_day: u32,
    include_weekends: bool,
    verbose: bool,
) -> Result<PlanResult, PlanError> {
    SchedulePlanner::default().compute_duration_from_rate(
        total_items,
        start_date,
        rate_per_day,
        include_weekends,
        verbose,
    )
}
