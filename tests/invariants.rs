#![forbid(unsafe_code)]
//! Invariants universels du grafik, exerces sur des scenarios synthetiques
//! construits directement via les types publics du crate.

use chrono::{Datelike, NaiveDate};
use grafik::{
    calendar, AbsenceReason, Doctor, DoctorId, EngineConfig, OnCallEngine, PrefStatus,
    PreferenceRecord, PreferenceTable, SettlementPeriod,
};
use std::collections::HashMap;

fn all_rotation(names: &[&str]) -> Vec<Doctor> {
    names.iter().map(|n| Doctor::rotation(*n)).collect()
}

fn flat_limits(doctors: &[Doctor], each: u32) -> HashMap<DoctorId, u32> {
    doctors.iter().map(|d| (d.id.clone(), each)).collect()
}

#[test]
fn one_per_day_every_date_has_an_entry() {
    let period = SettlementPeriod::new(2026, 1).unwrap();
    let dates = period.dates();
    let doctors = all_rotation(&["Jedrzej", "Filip", "Ihab", "Kacper", "Jakub", "Tymoteusz"]);
    let limits = flat_limits(&doctors, 10);
    let prefs = PreferenceTable::default().project();
    let config = EngineConfig::new(doctors.clone()).with_trials(30).with_seed(1);

    let result = OnCallEngine::run(&dates, &doctors, &prefs, &limits, None, period.start_date(), &config);

    for date in &dates {
        assert!(result.roster.get(*date).is_some(), "missing entry for {date}");
    }
}

#[test]
fn no_back_to_back_assignment_for_the_same_doctor() {
    let period = SettlementPeriod::new(2026, 1).unwrap();
    let dates = period.dates();
    let doctors = all_rotation(&["Jedrzej", "Filip", "Ihab"]);
    let limits = flat_limits(&doctors, 31);
    let prefs = PreferenceTable::default().project();
    let config = EngineConfig::new(doctors.clone()).with_trials(30).with_seed(2);

    let result = OnCallEngine::run(&dates, &doctors, &prefs, &limits, None, period.start_date(), &config);

    for window in dates.windows(2) {
        let (a, b) = (result.roster.doctor_on(window[0]), result.roster.doctor_on(window[1]));
        if let (Some(a), Some(b)) = (a, b) {
            assert_ne!(a, b, "back-to-back assignment on {} / {}", window[0], window[1]);
        }
    }
}

#[test]
fn availability_is_respected() {
    let period = SettlementPeriod::new(2026, 1).unwrap();
    let dates = period.dates();
    let doctors = all_rotation(&["Jedrzej", "Filip", "Ihab"]);
    let limits = flat_limits(&doctors, 31);
    let off_day = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
    let table = PreferenceTable::new(vec![PreferenceRecord::new(
        off_day,
        DoctorId::new("Ihab"),
        PrefStatus::Unavailable,
        None,
    )
    .unwrap()]);
    let prefs = table.project();
    let config = EngineConfig::new(doctors.clone()).with_trials(30).with_seed(3);

    let result = OnCallEngine::run(&dates, &doctors, &prefs, &limits, None, period.start_date(), &config);

    assert_ne!(result.roster.doctor_on(off_day), Some(&DoctorId::new("Ihab")));
}

#[test]
fn weekly_cap_holds_for_no_optout_doctors() {
    let period = SettlementPeriod::new(2026, 1).unwrap();
    let dates = period.dates();
    let doctors = vec![
        Doctor::rotation("Ihab").with_no_optout(true),
        Doctor::rotation("Kacper").with_no_optout(true),
        Doctor::rotation("Filip").with_no_optout(true),
    ];
    let limits = flat_limits(&doctors, 31);
    let prefs = PreferenceTable::default().project();
    let config = EngineConfig::new(doctors.clone()).with_trials(30).with_seed(4);

    let result = OnCallEngine::run(&dates, &doctors, &prefs, &limits, None, period.start_date(), &config);

    let mut per_week: HashMap<(i64, DoctorId), u32> = HashMap::new();
    for date in &dates {
        if let Some(doc) = result.roster.doctor_on(*date) {
            let week = calendar::week_key(*date, period.start_date()).0;
            *per_week.entry((week, doc.clone())).or_insert(0) += 1;
        }
    }
    for count in per_week.values() {
        assert!(*count <= 2, "weekly cap exceeded: {count}");
    }
}

#[test]
fn target_limits_are_never_exceeded() {
    let period = SettlementPeriod::new(2026, 1).unwrap();
    let dates = period.dates();
    let doctors = all_rotation(&["Jedrzej", "Filip", "Ihab", "Kacper"]);
    let mut limits = flat_limits(&doctors, 3);
    limits.insert(DoctorId::new("Jedrzej"), 3);
    let prefs = PreferenceTable::default().project();
    let config = EngineConfig::new(doctors.clone()).with_trials(30).with_seed(5);

    let result = OnCallEngine::run(&dates, &doctors, &prefs, &limits, None, period.start_date(), &config);

    for doctor in &doctors {
        let total = result.stats.get(&doctor.id).map(|s| s.total).unwrap_or(0);
        assert!(total <= limits[&doctor.id], "{} exceeded target", doctor.id);
    }
}

#[test]
fn saturday_rule_forbids_the_following_monday() {
    let period = SettlementPeriod::new(2026, 1).unwrap();
    let dates = period.dates();
    let doctors = vec![
        Doctor::rotation("Daniel").with_saturday_rule(true),
        Doctor::rotation("Ihab"),
    ];
    let limits = flat_limits(&doctors, 31);
    let prefs = PreferenceTable::default().project();
    let config = EngineConfig::new(doctors.clone()).with_trials(30).with_seed(6);

    let result = OnCallEngine::run(&dates, &doctors, &prefs, &limits, None, period.start_date(), &config);

    for date in &dates {
        if date.weekday() != chrono::Weekday::Sat {
            continue;
        }
        if result.roster.doctor_on(*date) == Some(&DoctorId::new("Daniel")) {
            let monday = *date + chrono::Duration::days(2);
            assert_ne!(result.roster.doctor_on(monday), Some(&DoctorId::new("Daniel")));
        }
    }
}

#[test]
fn pre_leave_prevents_on_call_the_day_before_a_scheduled_absence() {
    let period = SettlementPeriod::new(2026, 1).unwrap();
    let dates = period.dates();
    let doctors = all_rotation(&["Ihab", "Kacper", "Filip"]);
    let limits = flat_limits(&doctors, 31);
    let leave_day = NaiveDate::from_ymd_opt(2026, 1, 20).unwrap();
    let table = PreferenceTable::new(vec![PreferenceRecord::new(
        leave_day,
        DoctorId::new("Ihab"),
        PrefStatus::Unavailable,
        Some(AbsenceReason::Urlop),
    )
    .unwrap()]);
    let prefs = table.project();
    let config = EngineConfig::new(doctors.clone()).with_trials(30).with_seed(7);

    let result = OnCallEngine::run(&dates, &doctors, &prefs, &limits, None, period.start_date(), &config);

    let day_before = leave_day - chrono::Duration::days(1);
    assert_ne!(result.roster.doctor_on(day_before), Some(&DoctorId::new("Ihab")));
}

#[test]
fn fixed_priority_wins_over_rotation_fill() {
    let period = SettlementPeriod::new(2026, 1).unwrap();
    let dates = period.dates();
    let doctors = vec![Doctor::fixed("Jakub Sz."), Doctor::rotation("Ihab")];
    let claim_day = NaiveDate::from_ymd_opt(2026, 1, 12).unwrap();
    let table = PreferenceTable::new(vec![PreferenceRecord::new(
        claim_day,
        DoctorId::new("Jakub Sz."),
        PrefStatus::Fixed,
        None,
    )
    .unwrap()]);
    let prefs = table.project();
    let mut limits = HashMap::new();
    limits.insert(DoctorId::new("Jakub Sz."), 31);
    limits.insert(DoctorId::new("Ihab"), 31);
    let config = EngineConfig::new(doctors.clone()).with_trials(10).with_seed(8);

    let result = OnCallEngine::run(&dates, &doctors, &prefs, &limits, None, period.start_date(), &config);

    assert_eq!(result.roster.doctor_on(claim_day), Some(&DoctorId::new("Jakub Sz.")));
}
