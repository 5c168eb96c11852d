// ABOUTME: Integration tests for the longitudinal load model and history summaries
// ABOUTME: Exercises CTL/ATL/TSB, ACWR gating, PMC, Eddington and streaks over synthetic history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainlab

//! Longitudinal Load Model Tests

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use chrono::{Datelike, Duration, NaiveDate, TimeZone, Utc};
use trainlab::models::{CompletedActivity, Sport};
use trainlab::training_load::{
    eddington_number, fitness_status, global_summary, longest_streak, pmc_series,
};

fn run_on(year: i32, month: u32, day: u32, distance_km: f64, suffer: Option<u32>) -> CompletedActivity {
    let start = Utc
        .with_ymd_and_hms(year, month, day, 7, 0, 0)
        .single()
        .unwrap();
    let mut a = CompletedActivity::new(Sport::Run, start, distance_km, 50);
    a.suffer_score = suffer;
    a
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn test_consistent_training_raises_ctl_above_fresh_atl_decay() {
    // six weeks of identical daily load, then one rest week
    let start = date(2025, 3, 1);
    let history: Vec<_> = (0..42)
        .map(|i| {
            let d = start + Duration::days(i);
            run_on(d.year(), d.month(), d.day(), 10.0, Some(60))
        })
        .collect();

    let at_peak = fitness_status(&history, start + Duration::days(41));
    let after_rest = fitness_status(&history, start + Duration::days(48));
    // ATL decays much faster than CTL, so a rest week turns TSB positive
    assert!(after_rest.atl < at_peak.atl);
    assert!(after_rest.tsb > at_peak.tsb);
}

#[test]
fn test_acwr_needs_established_fitness() {
    let history = vec![run_on(2025, 5, 1, 10.0, Some(50))];
    let status = fitness_status(&history, date(2025, 5, 1));
    // one session cannot push CTL over the guard threshold
    assert!(status.acwr.is_none());
}

#[test]
fn test_empty_history_is_all_zero() {
    let status = fitness_status(&[], date(2025, 5, 1));
    assert!(status.ctl.abs() < f64::EPSILON);
    assert!(status.atl.abs() < f64::EPSILON);
    assert!(status.tsb.abs() < f64::EPSILON);
    assert!(status.acwr.is_none());
    assert!(pmc_series(&[], date(2025, 5, 1)).is_empty());
}

#[test]
fn test_pmc_series_is_capped_and_ends_today() {
    let mut history = Vec::new();
    for day in 1..=28 {
        for month in 1..=5 {
            history.push(run_on(2025, month, day, 8.0, Some(40)));
        }
    }
    let today = date(2025, 6, 15);
    let series = pmc_series(&history, today);
    assert!(series.len() <= 90);
    assert_eq!(series.last().unwrap().date, today);
    for pair in series.windows(2) {
        assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
    }
}

#[test]
fn test_eddington_number_example() {
    let distances = [12.0, 8.0, 7.0, 5.0, 3.0, 1.0];
    let history: Vec<_> = distances
        .iter()
        .enumerate()
        .map(|(i, &km)| run_on(2025, 4, i as u32 + 1, km, None))
        .collect();
    assert_eq!(eddington_number(&history), 4);
}

#[test]
fn test_eddington_property_holds() {
    let history: Vec<_> = (1..=20)
        .map(|day| run_on(2025, 4, day, f64::from(day), None))
        .collect();
    let e = eddington_number(&history);
    let days_at_least_e = history
        .iter()
        .filter(|a| a.distance_km >= f64::from(e))
        .count();
    assert!(days_at_least_e >= e as usize);
}

#[test]
fn test_streak_broken_by_gap() {
    let history = vec![
        run_on(2025, 4, 1, 5.0, None),
        run_on(2025, 4, 2, 5.0, None),
        run_on(2025, 4, 3, 5.0, None),
        // gap on the 4th
        run_on(2025, 4, 5, 5.0, None),
        run_on(2025, 4, 6, 5.0, None),
    ];
    assert_eq!(longest_streak(&history), 3);
}

#[test]
fn test_global_summary_totals() {
    let history = vec![
        run_on(2025, 4, 1, 10.0, None),
        run_on(2025, 4, 2, 12.0, None),
    ];
    let summary = global_summary(&history);
    assert_eq!(summary.activity_count, 2);
    assert!((summary.total_distance_km - 22.0).abs() < 1e-9);
    assert!((summary.total_duration_h - 100.0 / 60.0).abs() < 1e-9);
}
