pub mod calendar;
pub mod config;
pub mod deck;
pub mod error;
pub mod form;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod persistence;
pub mod planner;
pub mod report;
pub mod request;
pub mod schedule;

pub use calendar::StudyCalendar;
pub use config::{FormDefaults, PlannerConfig};
pub use deck::{
    ApplyOutcome, DeckEntry, DeckNode, DeckRecord, LimitUpdate, apply_limit_with_confirmation,
    flatten_tree,
};
pub use error::PlanError;
pub use form::PlanForm;
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteDeckStore;
pub use persistence::{
    DeckConfigStore, JsonDeckStore, MemoryDeckStore, PersistenceError, load_plan_from_json,
    load_schedule_from_csv, save_plan_to_json, save_schedule_to_csv,
};
pub use planner::{
    DEFAULT_MAX_CALENDAR_DAYS, PlanResult, SchedulePlanner, compute_duration_from_rate,
    compute_rate_from_duration,
};
pub use request::{PlanMode, PlanRequest, PlanTarget};
pub use schedule::{DaySchedule, ScheduledDay};
