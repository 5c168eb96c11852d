// ABOUTME: Pace analysis - Minetti grade-adjusted pace series and split consistency stats
// ABOUTME: Pure functions over speed/elevation samples and per-km splits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainlab

//! Pace and grade-adjusted pace analysis.

use serde::{Deserialize, Serialize};

use crate::models::{ElevationSample, SpeedSample, Split};
use crate::physiological_constants::gap;

/// One grade-adjusted speed sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapPoint {
    /// Seconds since activity start
    pub offset_sec: u32,
    /// Grade-adjusted speed in m/s
    pub mps: f64,
}

/// Grade-adjusted speed series (Minetti cost-of-transport correction).
///
/// For each speed sample, the grade is estimated from the elevation change
/// across a +/-5 s window (nearest elevation sample when no exact offset
/// match exists), clamped to +/-40%, and the speed is scaled by the ratio of
/// the Minetti quintic running cost at that grade to the flat cost. Windows
/// covering less than 5 m of ground fall back to the raw speed.
#[must_use]
pub fn gap_series(
    speed_samples: &[SpeedSample],
    elevation_samples: &[ElevationSample],
) -> Vec<GapPoint> {
    if speed_samples.is_empty() || elevation_samples.is_empty() {
        return Vec::new();
    }

    speed_samples
        .iter()
        .map(|sample| {
            let t = sample.offset_sec;
            let t_prev = t.saturating_sub(gap::ELEVATION_WINDOW_SEC);
            let t_next = t + gap::ELEVATION_WINDOW_SEC;

            let alt_prev = altitude_near(elevation_samples, t_prev);
            let alt_next = altitude_near(elevation_samples, t_next);
            let dt = (t_next - t_prev).max(1);
            let dist = sample.mps * f64::from(dt);

            let mps = if dist > gap::MIN_WINDOW_DISTANCE_M {
                let grade = ((alt_next - alt_prev) / dist).clamp(-gap::GRADE_CLAMP, gap::GRADE_CLAMP);
                sample.mps * minetti_cost(grade) / gap::FLAT_COST
            } else {
                sample.mps
            };
            GapPoint {
                offset_sec: t,
                mps,
            }
        })
        .collect()
}

/// Minetti energy cost of running (J/kg/m) at a grade in [-0.4, 0.4]
fn minetti_cost(grade: f64) -> f64 {
    let [c5, c4, c3, c2, c1, c0] = gap::MINETTI_COEFFS;
    c5 * grade.powi(5) + c4 * grade.powi(4) + c3 * grade.powi(3) + c2 * grade.powi(2) + c1 * grade
        + c0
}

/// Altitude at (or nearest to) an offset
fn altitude_near(samples: &[ElevationSample], offset_sec: u32) -> f64 {
    samples
        .iter()
        .min_by_key(|s| s.offset_sec.abs_diff(offset_sec))
        .map_or(0.0, |s| s.altitude_m)
}

/// Per-split pacing statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaceAnalysis {
    /// Mean split time in minutes
    pub mean_min: f64,
    /// Standard deviation of split times in minutes
    pub std_dev_min: f64,
    /// Coefficient of variation in percent
    pub cv_percent: f64,
    /// Textual consistency verdict
    pub consistency: String,
    /// True when the second half was faster than the first
    pub negative_split: bool,
    /// Relative first-half minus second-half pace difference in percent
    pub split_diff_percent: f64,
}

/// Pacing consistency over per-km splits.
///
/// Empty input yields a zeroed analysis (never an error).
#[must_use]
pub fn analyze_pace_consistency(splits: &[Split]) -> PaceAnalysis {
    if splits.is_empty() {
        return PaceAnalysis {
            mean_min: 0.0,
            std_dev_min: 0.0,
            cv_percent: 0.0,
            consistency: "No split data".to_owned(),
            negative_split: false,
            split_diff_percent: 0.0,
        };
    }

    let paces: Vec<f64> = splits.iter().map(|s| s.duration_sec / 60.0).collect();
    let mean = paces.iter().sum::<f64>() / paces.len() as f64;
    let variance = paces.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / paces.len() as f64;
    let std_dev = variance.sqrt();
    let cv = if mean > 0.0 { std_dev / mean * 100.0 } else { 0.0 };

    let consistency = if cv < 5.0 {
        "Excellent - very even pacing"
    } else if cv < 10.0 {
        "Good - stable pacing"
    } else if cv < 15.0 {
        "Fair - variable pacing"
    } else {
        "Poor - irregular pacing (hilly terrain?)"
    };

    let mid = paces.len() / 2;
    let first_half = slice_mean(&paces[..mid]);
    let second_half = slice_mean(&paces[mid..]);
    let negative_split = second_half < first_half;
    let split_diff_percent = if first_half > 0.0 {
        (first_half - second_half) / first_half * 100.0
    } else {
        0.0
    };

    PaceAnalysis {
        mean_min: mean,
        std_dev_min: std_dev,
        cv_percent: cv,
        consistency: consistency.to_owned(),
        negative_split,
        split_diff_percent,
    }
}

fn slice_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(duration_sec: f64) -> Split {
        Split {
            distance_m: 1000.0,
            duration_sec,
            avg_hr: None,
        }
    }

    #[test]
    fn test_gap_equals_raw_speed_on_flat_ground() {
        let speed: Vec<_> = (0..60)
            .map(|i| SpeedSample {
                offset_sec: i,
                mps: 3.0,
            })
            .collect();
        let elev: Vec<_> = (0..60)
            .map(|i| ElevationSample {
                offset_sec: i,
                altitude_m: 100.0,
            })
            .collect();
        let gap = gap_series(&speed, &elev);
        assert_eq!(gap.len(), 60);
        for point in &gap {
            assert!((point.mps - 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_gap_faster_than_raw_uphill() {
        // steady 3 m/s climbing 1 m per second of ground
        let speed: Vec<_> = (0..60)
            .map(|i| SpeedSample {
                offset_sec: i,
                mps: 3.0,
            })
            .collect();
        let elev: Vec<_> = (0..60)
            .map(|i| ElevationSample {
                offset_sec: i,
                altitude_m: 100.0 + f64::from(i),
            })
            .collect();
        let gap = gap_series(&speed, &elev);
        // mid-series points see a positive grade, so adjusted speed > raw
        assert!(gap[30].mps > 3.0);
    }

    #[test]
    fn test_gap_slow_window_falls_back_to_raw() {
        let speed = [SpeedSample {
            offset_sec: 10,
            mps: 0.3,
        }];
        let elev = [
            ElevationSample {
                offset_sec: 5,
                altitude_m: 100.0,
            },
            ElevationSample {
                offset_sec: 15,
                altitude_m: 110.0,
            },
        ];
        let gap = gap_series(&speed, &elev);
        assert!((gap[0].mps - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_pace_consistency_even_splits() {
        let splits: Vec<_> = (0..10).map(|_| split(300.0)).collect();
        let analysis = analyze_pace_consistency(&splits);
        assert!(analysis.cv_percent < 1e-9);
        assert!(analysis.consistency.starts_with("Excellent"));
        assert!(!analysis.negative_split);
    }

    #[test]
    fn test_pace_consistency_negative_split() {
        let mut splits: Vec<_> = (0..5).map(|_| split(320.0)).collect();
        splits.extend((0..5).map(|_| split(290.0)));
        let analysis = analyze_pace_consistency(&splits);
        assert!(analysis.negative_split);
        assert!(analysis.split_diff_percent > 0.0);
    }

    #[test]
    fn test_pace_consistency_empty() {
        let analysis = analyze_pace_consistency(&[]);
        assert!((analysis.mean_min).abs() < f64::EPSILON);
        assert_eq!(analysis.consistency, "No split data");
    }
}
