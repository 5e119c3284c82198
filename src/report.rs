use crate::planner::PlanResult;
use crate::request::PlanMode;
use crate::schedule::ScheduledDay;
use chrono::NaiveDate;
use std::fmt::Write;

/// `2024-01-01 (Mon)`
pub fn format_day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d (%a)").to_string()
}

impl ScheduledDay {
    pub fn to_line(&self) -> String {
        format!("{} — {} items", format_day(self.date), self.items)
    }
}

impl PlanResult {
    /// Short human summary of the plan, one fact per line.
    pub fn to_summary(&self) -> String {
        let mut out = String::new();
        match self.mode {
            PlanMode::RateFromDuration => {
                let _ = writeln!(out, "--- MODE: CALCULATE DAILY RATE ---");
                let _ = writeln!(out, "Required pace: {} items/day", self.pace_per_day());
                let _ = writeln!(out, "Total study days: {}", self.study_days_needed);
                let _ = writeln!(out, "Calculated End Date: {}", format_day(self.end_date));
                let _ = writeln!(
                    out,
                    "Total items scheduled: {} (of {})",
                    self.total_scheduled.unwrap_or_default(),
                    self.total_items
                );
            }
            PlanMode::DurationFromRate => {
                let _ = writeln!(out, "--- MODE: CALCULATE END DATE ---");
                let _ = writeln!(out, "Target pace: {} items/day", self.pace_per_day());
                let _ = writeln!(out, "Total study days needed: {}", self.study_days_needed);
                let _ = writeln!(out, "You will finish on: {}", format_day(self.end_date));
                let _ = writeln!(
                    out,
                    "Total calendar time: {} days",
                    self.calendar_days_span.unwrap_or_default()
                );
            }
        }
        out
    }

    /// Summary followed by the daily schedule, when one was requested and is
    /// non-empty.
    pub fn to_report(&self) -> String {
        let mut out = self.to_summary();
        if let Some(schedule) = self.schedule.as_ref().filter(|s| !s.is_empty()) {
            out.push_str("\nDaily Schedule:\n");
            for day in schedule {
                out.push_str(&day.to_line());
                out.push('\n');
            }
        }
        out
    }
}
