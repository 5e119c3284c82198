use chrono::{Datelike, NaiveDate, Weekday};
use study_pacer::StudyCalendar;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn weekdays_only_calendar_skips_saturday_and_sunday() {
    let cal = StudyCalendar::weekdays_only();
    // 2024-01-06 is a Saturday, 2024-01-07 is a Sunday
    assert!(!cal.is_study_day(d(2024, 1, 6)));
    assert!(!cal.is_study_day(d(2024, 1, 7)));
    assert!(cal.is_study_day(d(2024, 1, 5)));
    assert!(cal.is_study_day(d(2024, 1, 8)));
}

#[test]
fn every_day_calendar_accepts_weekends() {
    let cal = StudyCalendar::every_day();
    assert!(cal.is_study_day(d(2024, 1, 6)));
    assert!(cal.is_study_day(d(2024, 1, 7)));
    assert_eq!(StudyCalendar::default(), cal);
}

#[test]
fn is_weekday_uses_monday_zero_indexing() {
    assert!(StudyCalendar::is_weekday(Weekday::Mon));
    assert!(StudyCalendar::is_weekday(Weekday::Fri));
    assert!(!StudyCalendar::is_weekday(Weekday::Sat));
    assert!(!StudyCalendar::is_weekday(Weekday::Sun));
}

#[test]
fn count_study_days_in_january_window() {
    let start = d(2024, 1, 1); // Monday
    assert_eq!(StudyCalendar::weekdays_only().count_study_days(start, 30), 22);
    assert_eq!(StudyCalendar::every_day().count_study_days(start, 30), 30);
    assert_eq!(StudyCalendar::weekdays_only().count_study_days(start, 0), 0);
}

#[test]
fn weekend_only_window_has_no_study_days() {
    let sat = d(2024, 1, 6);
    assert_eq!(StudyCalendar::weekdays_only().count_study_days(sat, 2), 0);
    assert_eq!(StudyCalendar::weekdays_only().count_study_days(sat, 3), 1);
}

#[test]
fn study_days_iterator_reports_offsets() {
    let fri = d(2024, 1, 5);
    let days: Vec<(u64, NaiveDate)> = StudyCalendar::weekdays_only()
        .study_days(fri)
        .take(3)
        .collect();
    assert_eq!(
        days,
        vec![(0, d(2024, 1, 5)), (3, d(2024, 1, 8)), (4, d(2024, 1, 9))]
    );
}

#[test]
fn window_iterator_stops_at_window_end() {
    let start = d(2024, 1, 1);
    let days: Vec<NaiveDate> = StudyCalendar::weekdays_only()
        .study_days_in_window(start, 7)
        .map(|(_, date)| date)
        .collect();
    assert_eq!(days.len(), 5);
    assert_eq!(days.last().copied(), Some(d(2024, 1, 5)));
    assert!(days.iter().all(|day| day.weekday() != Weekday::Sat));
}

#[test]
fn study_days_iterator_ends_at_calendar_limit() {
    let days: Vec<_> = StudyCalendar::every_day()
        .study_days(NaiveDate::MAX)
        .collect();
    assert_eq!(days, vec![(0, NaiveDate::MAX)]);
}

#[test]
fn max_span_bounds_actual_walk() {
    let cal = StudyCalendar::weekdays_only();
    assert_eq!(StudyCalendar::every_day().max_span_for(12), 12);
    // every start weekday, a range of study-day counts
    for start_day in 1..=7 {
        let start = d(2024, 1, start_day);
        for needed in 1..=40u64 {
            let (offset, _) = cal
                .study_days(start)
                .nth(needed as usize - 1)
                .unwrap();
            assert!(offset < cal.max_span_for(needed));
        }
    }
}

#[test]
fn day_at_guards_overflow() {
    assert_eq!(StudyCalendar::day_at(d(2024, 2, 28), 2), Some(d(2024, 3, 1)));
    assert_eq!(StudyCalendar::day_at(NaiveDate::MAX, 1), None);
}
