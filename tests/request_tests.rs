use chrono::NaiveDate;
use study_pacer::{FormDefaults, PlanError, PlanForm, PlanMode, PlanRequest, PlanTarget, PlannerConfig};
use std::str::FromStr;
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn from_parts_accepts_value_matching_mode() {
    let request =
        PlanRequest::from_parts(PlanMode::RateFromDuration, 1000, d(2024, 1, 1), Some(30), None)
            .unwrap();
    assert_eq!(request.mode(), PlanMode::RateFromDuration);
    assert_eq!(request.duration_days(), Some(30));
    assert_eq!(request.rate_per_day(), None);

    let request =
        PlanRequest::from_parts(PlanMode::DurationFromRate, 1000, d(2024, 1, 1), None, Some(20))
            .unwrap();
    assert_eq!(request.target, PlanTarget::DurationFromRate { rate_per_day: 20 });
}

#[test]
fn from_parts_rejects_missing_or_extra_values() {
    let both =
        PlanRequest::from_parts(PlanMode::RateFromDuration, 10, d(2024, 1, 1), Some(3), Some(4));
    assert!(matches!(both, Err(PlanError::InvalidInput(_))));

    let wrong = PlanRequest::from_parts(PlanMode::RateFromDuration, 10, d(2024, 1, 1), None, Some(4));
    assert!(matches!(wrong, Err(PlanError::InvalidInput(_))));

    let missing = PlanRequest::from_parts(PlanMode::DurationFromRate, 10, d(2024, 1, 1), None, None);
    assert!(matches!(missing, Err(PlanError::InvalidInput(_))));
}

#[test]
fn request_json_uses_tagged_target_and_defaults() {
    let json = r#"{
        "total_items": 100,
        "start_date": "2024-01-01",
        "target": { "mode": "duration_from_rate", "rate_per_day": 20 }
    }"#;
    let request: PlanRequest = serde_json::from_str(json).unwrap();
    assert_eq!(request.total_items, 100);
    assert!(request.include_weekends);
    assert!(!request.verbose);
    assert_eq!(request.rate_per_day(), Some(20));

    let value = serde_json::to_value(PlanRequest::rate_from_duration(5, d(2024, 1, 1), 9)).unwrap();
    assert_eq!(value["target"]["mode"], "rate_from_duration");
    assert_eq!(value["target"]["duration_days"], 9);
}

#[test]
fn plan_mode_parses_short_and_long_names() {
    assert_eq!(PlanMode::from_str("rate").unwrap(), PlanMode::RateFromDuration);
    assert_eq!(PlanMode::from_str("DATE").unwrap(), PlanMode::DurationFromRate);
    assert_eq!(
        PlanMode::from_str("duration_from_rate").unwrap(),
        PlanMode::DurationFromRate
    );
    assert!(PlanMode::from_str("weekly").is_err());
    assert_eq!(PlanMode::RateFromDuration.to_string(), "rate_from_duration");
}

#[test]
fn form_starts_from_defaults() {
    let form = PlanForm::new(&FormDefaults::default(), d(2024, 1, 1));
    assert_eq!(form.mode, PlanMode::RateFromDuration);
    assert_eq!(form.total_items(), 1000);
    assert_eq!(form.duration_days(), 30);
    assert_eq!(form.rate_per_day(), 20);
    assert!(form.include_weekends);
    assert!(!form.verbose);
    assert!(form.can_apply_to_deck());
}

#[test]
fn form_enforces_input_bounds() {
    let mut form = PlanForm::new(&FormDefaults::default(), d(2024, 1, 1));
    assert!(form.set_total_items(0).is_err());
    assert!(form.set_total_items(1_000_000).is_err());
    assert!(form.set_duration_days(10_000).is_err());
    assert!(form.set_rate_per_day(0).is_err());
    assert_eq!(form.total_items(), 1000);

    form.set_total_items(999_999).unwrap();
    form.set_duration_days(9_999).unwrap();
    form.set_rate_per_day(1).unwrap();
    assert_eq!(form.total_items(), 999_999);
}

#[test]
fn form_builds_request_for_current_mode_only() {
    let mut form = PlanForm::new(&FormDefaults::default(), d(2024, 1, 1));
    form.include_weekends = false;
    form.verbose = true;
    let request = form.to_request().unwrap();
    assert_eq!(request.target, PlanTarget::RateFromDuration { duration_days: 30 });
    assert!(!request.include_weekends);
    assert!(request.verbose);

    form.mode = PlanMode::DurationFromRate;
    assert!(!form.can_apply_to_deck());
    let request = form.to_request().unwrap();
    assert_eq!(request.target, PlanTarget::DurationFromRate { rate_per_day: 20 });

    // switching back keeps the duration the user typed
    form.mode = PlanMode::RateFromDuration;
    assert_eq!(form.to_request().unwrap().duration_days(), Some(30));
}

#[test]
fn planner_config_round_trips_and_fills_defaults() {
    let tmp = NamedTempFile::new().unwrap();
    std::fs::write(tmp.path(), r#"{ "max_calendar_days": 500 }"#).unwrap();
    let config = PlannerConfig::load_json(tmp.path()).unwrap();
    assert_eq!(config.max_calendar_days, 500);
    assert_eq!(config.defaults, FormDefaults::default());
    assert_eq!(config.planner().max_calendar_days(), 500);

    let mut custom = PlannerConfig::default();
    custom.defaults.rate_per_day = 35;
    custom.defaults.mode = PlanMode::DurationFromRate;
    custom.save_json(tmp.path()).unwrap();
    assert_eq!(PlannerConfig::load_json(tmp.path()).unwrap(), custom);
}

#[test]
fn planner_config_rejects_zero_cap() {
    let tmp = NamedTempFile::new().unwrap();
    std::fs::write(tmp.path(), r#"{ "max_calendar_days": 0 }"#).unwrap();
    assert!(PlannerConfig::load_json(tmp.path()).is_err());
}

#[test]
fn planner_config_rejects_defaults_outside_form_bounds() {
    let tmp = NamedTempFile::new().unwrap();
    std::fs::write(
        tmp.path(),
        r#"{ "defaults": { "total_items": 0, "duration_days": 50000, "rate_per_day": 1 } }"#,
    )
    .unwrap();
    let err = PlannerConfig::load_json(tmp.path()).unwrap_err();
    assert!(err.to_string().contains("total items must be between 1 and 999999 (got 0)"));

    std::fs::write(tmp.path(), r#"{ "defaults": { "duration_days": 50000 } }"#).unwrap();
    let err = PlannerConfig::load_json(tmp.path()).unwrap_err();
    assert!(err.to_string().contains("duration must be between 1 and 9999 (got 50000)"));

    std::fs::write(tmp.path(), r#"{ "defaults": { "rate_per_day": 10000 } }"#).unwrap();
    assert!(PlannerConfig::load_json(tmp.path()).is_err());
}
