use crate::form::{DURATION_DAYS_RANGE, RATE_PER_DAY_RANGE, TOTAL_ITEMS_RANGE, checked};
use crate::persistence::{PersistenceError, PersistenceResult};
use crate::planner::{DEFAULT_MAX_CALENDAR_DAYS, SchedulePlanner};
use crate::request::PlanMode;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Starting values for a fresh planning form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormDefaults {
    pub mode: PlanMode,
    pub total_items: u32,
    pub duration_days: u32,
    pub rate_per_day: u32,
    pub include_weekends: bool,
    pub verbose: bool,
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            mode: PlanMode::RateFromDuration,
            total_items: 1000,
            duration_days: 30,
            rate_per_day: 20,
            include_weekends: true,
            verbose: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub max_calendar_days: u64,
    pub defaults: FormDefaults,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_calendar_days: DEFAULT_MAX_CALENDAR_DAYS,
            defaults: FormDefaults::default(),
        }
    }
}

impl PlannerConfig {
    pub fn planner(&self) -> SchedulePlanner {
        SchedulePlanner::new(self.max_calendar_days)
    }

    pub fn validate(&self) -> PersistenceResult<()> {
        if self.max_calendar_days == 0 {
            return Err(PersistenceError::InvalidData(
                "max_calendar_days must be positive".to_string(),
            ));
        }
        let defaults = &self.defaults;
        checked("total items", defaults.total_items, &TOTAL_ITEMS_RANGE)
            .and_then(|_| checked("duration", defaults.duration_days, &DURATION_DAYS_RANGE))
            .and_then(|_| checked("rate", defaults.rate_per_day, &RATE_PER_DAY_RANGE))
            .map_err(|err| {
                PersistenceError::InvalidData(format!("defaults: {}", err.message()))
            })?;
        Ok(())
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        let file = File::open(path)?;
        let config: PlannerConfig = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> PersistenceResult<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}
