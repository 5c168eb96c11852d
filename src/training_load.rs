// ABOUTME: Longitudinal load model - CTL/ATL/TSB/ACWR, PMC series, Eddington, streaks
// ABOUTME: Day-bucketed EWMA over an activity history; empty history yields zeroed results
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainlab

//! # Longitudinal Load Model
//!
//! Banister impulse-response tracking over an activity history. Loads are
//! bucketed by calendar day; chronic (42 d) and acute (7 d) loads are
//! exponentially weighted moving averages iterated day by day from the first
//! activity, so rest days decay fitness and fatigue like any other day.
//!
//! All functions take the history in any order and never fail: an empty
//! history produces zeroed values.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::CompletedActivity;
use crate::physiological_constants::longitudinal;

/// Point-in-time fitness/fatigue/form summary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessStatus {
    /// Chronic training load (fitness), 42-day EWMA
    pub ctl: f64,
    /// Acute training load (fatigue), 7-day EWMA
    pub atl: f64,
    /// Training stress balance (form): CTL - ATL
    pub tsb: f64,
    /// Acute:chronic workload ratio; absent while CTL is too small to be
    /// meaningful
    pub acwr: Option<f64>,
}

/// One day of the performance management chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PmcPoint {
    /// Calendar day
    pub date: NaiveDate,
    /// Chronic training load that day
    pub ctl: f64,
    /// Acute training load that day
    pub atl: f64,
    /// Form (CTL - ATL) that day
    pub tsb: f64,
}

/// Lifetime aggregates over a history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSummary {
    /// Total distance in kilometers
    pub total_distance_km: f64,
    /// Total duration in hours
    pub total_duration_h: f64,
    /// Total elevation gain in meters
    pub total_elevation_m: u64,
    /// Number of recorded activities
    pub activity_count: usize,
    /// Eddington number over daily kilometers
    pub eddington_number: u32,
    /// Longest run of consecutive active days
    pub max_streak_days: u32,
}

/// Training load of one activity: the provider's relative-effort score when
/// present, otherwise `duration * avgHR / 100` with a 140 bpm default HR.
#[must_use]
pub fn activity_load(activity: &CompletedActivity) -> f64 {
    activity.suffer_score.map_or_else(
        || {
            let hr = activity
                .avg_hr
                .map_or(longitudinal::DEFAULT_AVG_HR, f64::from);
            f64::from(activity.duration_min) * hr / 100.0
        },
        f64::from,
    )
}

/// Sum of activity loads per calendar day
#[must_use]
pub fn daily_loads(history: &[CompletedActivity]) -> BTreeMap<NaiveDate, f64> {
    let mut loads = BTreeMap::new();
    for activity in history {
        *loads.entry(activity.start.date_naive()).or_insert(0.0) += activity_load(activity);
    }
    loads
}

/// Fitness/fatigue/form at a given day.
///
/// Iterates the classic EWMA (`ctl += load/42 - ctl/42`) daily from the
/// first activity through `today` inclusive. ACWR is reported only once
/// CTL exceeds 10; a near-zero chronic load makes the ratio meaningless.
#[must_use]
pub fn fitness_status(history: &[CompletedActivity], today: NaiveDate) -> FitnessStatus {
    let loads = daily_loads(history);
    let Some((&first_day, _)) = loads.first_key_value() else {
        return FitnessStatus {
            ctl: 0.0,
            atl: 0.0,
            tsb: 0.0,
            acwr: None,
        };
    };

    let ctl_alpha = 1.0 / longitudinal::CTL_DAYS;
    let atl_alpha = 1.0 / longitudinal::ATL_DAYS;
    let mut ctl = 0.0;
    let mut atl = 0.0;

    let mut day = first_day;
    while day <= today {
        let load = loads.get(&day).copied().unwrap_or(0.0);
        ctl = load * ctl_alpha + ctl * (1.0 - ctl_alpha);
        atl = load * atl_alpha + atl * (1.0 - atl_alpha);
        day += Duration::days(1);
    }

    let acwr = if ctl > longitudinal::ACWR_MIN_CTL {
        Some(atl / ctl)
    } else {
        None
    };
    debug!(ctl, atl, ?acwr, "computed fitness status");

    FitnessStatus {
        ctl,
        atl,
        tsb: ctl - atl,
        acwr,
    }
}

/// Performance-management-chart series from the first activity through
/// `today`, trimmed to the last 90 days.
///
/// Uses the `2/(N+1)` smoothing variant of the EWMA constants.
#[must_use]
pub fn pmc_series(history: &[CompletedActivity], today: NaiveDate) -> Vec<PmcPoint> {
    let loads = daily_loads(history);
    let Some((&first_day, _)) = loads.first_key_value() else {
        return Vec::new();
    };

    let ctl_alpha = 2.0 / (longitudinal::CTL_DAYS + 1.0);
    let atl_alpha = 2.0 / (longitudinal::ATL_DAYS + 1.0);
    let mut ctl = 0.0;
    let mut atl = 0.0;
    let mut points = Vec::new();

    let mut day = first_day;
    while day <= today {
        let load = loads.get(&day).copied().unwrap_or(0.0);
        ctl = load * ctl_alpha + ctl * (1.0 - ctl_alpha);
        atl = load * atl_alpha + atl * (1.0 - atl_alpha);
        points.push(PmcPoint {
            date: day,
            ctl,
            atl,
            tsb: ctl - atl,
        });
        day += Duration::days(1);
    }

    if points.len() > longitudinal::PMC_MAX_POINTS {
        points.split_off(points.len() - longitudinal::PMC_MAX_POINTS)
    } else {
        points
    }
}

/// Eddington number: the largest E such that at least E days each covered
/// at least E (whole) kilometers. Multiple activities on one day sum.
#[must_use]
pub fn eddington_number(history: &[CompletedActivity]) -> u32 {
    let mut daily_km: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for activity in history {
        *daily_km.entry(activity.start.date_naive()).or_insert(0.0) += activity.distance_km;
    }

    let mut distances: Vec<u64> = daily_km.values().map(|&km| km as u64).collect();
    distances.sort_unstable_by(|a, b| b.cmp(a));

    let mut eddington = 0;
    for (i, &km) in distances.iter().enumerate() {
        let rank = (i + 1) as u64;
        if km >= rank {
            eddington = rank as u32;
        } else {
            break;
        }
    }
    eddington
}

/// Longest run of consecutive calendar days with at least one activity
#[must_use]
pub fn longest_streak(history: &[CompletedActivity]) -> u32 {
    let mut dates: Vec<NaiveDate> = history.iter().map(|a| a.start.date_naive()).collect();
    dates.sort_unstable();
    dates.dedup();

    let mut best = 0u32;
    let mut current = 0u32;
    let mut prev: Option<NaiveDate> = None;
    for date in dates {
        current = match prev {
            Some(p) if date == p + Duration::days(1) => current + 1,
            _ => 1,
        };
        best = best.max(current);
        prev = Some(date);
    }
    best
}

/// Lifetime totals plus Eddington number and longest streak
#[must_use]
pub fn global_summary(history: &[CompletedActivity]) -> GlobalSummary {
    GlobalSummary {
        total_distance_km: history.iter().map(|a| a.distance_km).sum(),
        total_duration_h: history
            .iter()
            .map(|a| f64::from(a.duration_min))
            .sum::<f64>()
            / 60.0,
        total_elevation_m: history
            .iter()
            .map(|a| u64::from(a.elevation_gain_m.unwrap_or(0)))
            .sum(),
        activity_count: history.len(),
        eddington_number: eddington_number(history),
        max_streak_days: longest_streak(history),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sport;
    use chrono::{TimeZone, Utc};

    fn run_on(year: i32, month: u32, day: u32, distance_km: f64, load: u32) -> CompletedActivity {
        let start = Utc
            .with_ymd_and_hms(year, month, day, 9, 0, 0)
            .single()
            .unwrap();
        let mut a = CompletedActivity::new(Sport::Run, start, distance_km, 60);
        a.suffer_score = Some(load);
        a
    }

    #[test]
    fn test_empty_history_is_zeroed() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let status = fitness_status(&[], today);
        assert!((status.ctl).abs() < f64::EPSILON);
        assert!(status.acwr.is_none());
        assert!(pmc_series(&[], today).is_empty());
        assert_eq!(eddington_number(&[]), 0);
        assert_eq!(longest_streak(&[]), 0);
    }

    #[test]
    fn test_load_falls_back_to_duration_times_hr() {
        let start = Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).single().unwrap();
        let mut a = CompletedActivity::new(Sport::Run, start, 10.0, 50);
        assert!((activity_load(&a) - 50.0 * 140.0 / 100.0).abs() < 1e-9);
        a.avg_hr = Some(160);
        assert!((activity_load(&a) - 80.0).abs() < 1e-9);
        a.suffer_score = Some(42);
        assert!((activity_load(&a) - 42.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_day_ewma_step() {
        let history = vec![run_on(2025, 5, 1, 10.0, 84)];
        let today = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let status = fitness_status(&history, today);
        assert!((status.ctl - 2.0).abs() < 1e-9);
        assert!((status.atl - 12.0).abs() < 1e-9);
        assert!((status.tsb + 10.0).abs() < 1e-9);
        // CTL of 2 is below the ACWR guard
        assert!(status.acwr.is_none());
    }

    #[test]
    fn test_rest_days_decay_loads() {
        let history = vec![run_on(2025, 5, 1, 10.0, 84)];
        let later = NaiveDate::from_ymd_opt(2025, 5, 15).unwrap();
        let at_once = fitness_status(&history, NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
        let after_rest = fitness_status(&history, later);
        assert!(after_rest.ctl < at_once.ctl);
        assert!(after_rest.atl < at_once.atl);
    }

    #[test]
    fn test_pmc_series_capped_at_90_points() {
        let history = vec![run_on(2025, 1, 1, 10.0, 80)];
        let today = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let series = pmc_series(&history, today);
        assert_eq!(series.len(), 90);
        assert_eq!(series.last().unwrap().date, today);
    }

    #[test]
    fn test_eddington_reference_example() {
        // daily distances 12, 8, 7, 5, 3, 1 -> E = 4
        let distances = [12.0, 8.0, 7.0, 5.0, 3.0, 1.0];
        let history: Vec<_> = distances
            .iter()
            .enumerate()
            .map(|(i, &km)| run_on(2025, 5, (i + 1) as u32, km, 50))
            .collect();
        let e = eddington_number(&history);
        assert_eq!(e, 4);
        let at_least = |x: u32| {
            history
                .iter()
                .filter(|a| a.distance_km >= f64::from(x))
                .count() as u32
        };
        assert!(at_least(e) >= e);
        assert!(at_least(e + 1) < e + 1);
    }

    #[test]
    fn test_eddington_sums_same_day_activities() {
        let history = vec![
            run_on(2025, 5, 1, 0.6, 10),
            run_on(2025, 5, 1, 0.6, 10),
        ];
        assert_eq!(eddington_number(&history), 1);
    }

    #[test]
    fn test_longest_streak_with_gap() {
        let history = vec![
            run_on(2025, 5, 1, 5.0, 40),
            run_on(2025, 5, 2, 5.0, 40),
            run_on(2025, 5, 3, 5.0, 40),
            run_on(2025, 5, 10, 5.0, 40),
            run_on(2025, 5, 11, 5.0, 40),
        ];
        assert_eq!(longest_streak(&history), 3);
    }

    #[test]
    fn test_global_summary_totals() {
        let mut a = run_on(2025, 5, 1, 12.0, 60);
        a.elevation_gain_m = Some(300);
        let b = run_on(2025, 5, 2, 8.0, 40);
        let summary = global_summary(&[a, b]);
        assert!((summary.total_distance_km - 20.0).abs() < 1e-9);
        assert!((summary.total_duration_h - 2.0).abs() < 1e-9);
        assert_eq!(summary.total_elevation_m, 300);
        assert_eq!(summary.activity_count, 2);
        assert_eq!(summary.max_streak_days, 2);
    }
}
