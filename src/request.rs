use crate::error::PlanError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which quantity the planner derives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanMode {
    /// Fixed duration in, daily rate out.
    RateFromDuration,
    /// Fixed daily rate in, end date out.
    DurationFromRate,
}

impl PlanMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanMode::RateFromDuration => "rate_from_duration",
            PlanMode::DurationFromRate => "duration_from_rate",
        }
    }
}

impl fmt::Display for PlanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanMode {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rate" | "rate_from_duration" => Ok(PlanMode::RateFromDuration),
            "date" | "end_date" | "duration_from_rate" => Ok(PlanMode::DurationFromRate),
            other => Err(PlanError::invalid(format!("unknown plan mode '{other}'"))),
        }
    }
}

/// The target the caller fixes. The variant determines the mode, so a request
/// always carries exactly one of duration or rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PlanTarget {
    RateFromDuration { duration_days: u32 },
    DurationFromRate { rate_per_day: u32 },
}

impl PlanTarget {
    pub fn mode(&self) -> PlanMode {
        match self {
            PlanTarget::RateFromDuration { .. } => PlanMode::RateFromDuration,
            PlanTarget::DurationFromRate { .. } => PlanMode::DurationFromRate,
        }
    }
}

fn default_include_weekends() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub total_items: u32,
    pub start_date: NaiveDate,
    #[serde(default = "default_include_weekends")]
    pub include_weekends: bool,
    #[serde(default)]
    pub verbose: bool,
    pub target: PlanTarget,
}

impl PlanRequest {
    pub fn rate_from_duration(total_items: u32, start_date: NaiveDate, duration_days: u32) -> Self {
        Self {
            total_items,
            start_date,
            include_weekends: true,
            verbose: false,
            target: PlanTarget::RateFromDuration { duration_days },
        }
    }

    pub fn duration_from_rate(total_items: u32, start_date: NaiveDate, rate_per_day: u32) -> Self {
        Self {
            total_items,
            start_date,
            include_weekends: true,
            verbose: false,
            target: PlanTarget::DurationFromRate { rate_per_day },
        }
    }

    /// Build a request from loose form values. Exactly one of `duration_days`
    /// and `rate_per_day` must be supplied, and it must match `mode`.
    pub fn from_parts(
        mode: PlanMode,
        total_items: u32,
        start_date: NaiveDate,
        duration_days: Option<u32>,
        rate_per_day: Option<u32>,
    ) -> Result<Self, PlanError> {
        let target = match (mode, duration_days, rate_per_day) {
            (PlanMode::RateFromDuration, Some(duration_days), None) => {
                PlanTarget::RateFromDuration { duration_days }
            }
            (PlanMode::DurationFromRate, None, Some(rate_per_day)) => {
                PlanTarget::DurationFromRate { rate_per_day }
            }
            (_, Some(_), Some(_)) => {
                return Err(PlanError::invalid(
                    "supply either a duration or a rate, not both",
                ));
            }
            (PlanMode::RateFromDuration, None, _) => {
                return Err(PlanError::invalid("duration is required for rate_from_duration"));
            }
            (PlanMode::DurationFromRate, _, None) => {
                return Err(PlanError::invalid("rate is required for duration_from_rate"));
            }
        };
        Ok(Self {
            total_items,
            start_date,
            include_weekends: true,
            verbose: false,
            target,
        })
    }

    pub fn with_weekends(mut self, include_weekends: bool) -> Self {
        self.include_weekends = include_weekends;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn mode(&self) -> PlanMode {
        self.target.mode()
    }

    pub fn duration_days(&self) -> Option<u32> {
        match self.target {
            PlanTarget::RateFromDuration { duration_days } => Some(duration_days),
            PlanTarget::DurationFromRate { .. } => None,
        }
    }

    pub fn rate_per_day(&self) -> Option<u32> {
        match self.target {
            PlanTarget::DurationFromRate { rate_per_day } => Some(rate_per_day),
            PlanTarget::RateFromDuration { .. } => None,
        }
    }
}
