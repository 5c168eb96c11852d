// ABOUTME: Heart-rate series analysis - zone distribution, anomalies, decoupling, drift
// ABOUTME: Also hosts the fatigue scorer combining drift, pace variability and decoupling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainlab

//! Heart-rate time-series analysis.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::models::{HeartRateSample, SpeedSample, Split};
use crate::physiological_constants::{fatigue, heart_rate_analysis};

/// Karvonen zone distribution and quality summary for one HR series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HrZoneAnalysis {
    /// Seconds spent per zone (1-5); key 0 collects out-of-band samples
    pub distribution: BTreeMap<u8, u32>,
    /// Percent of time in the target zones Z3-Z4
    pub target_zone_percent: f64,
    /// Detected spikes and drops
    pub anomalies: Vec<HrAnomaly>,
    /// Percent of time in the productive zones Z2-Z4
    pub efficiency: f64,
    /// Textual training guidance
    pub recommendation: String,
}

/// Kind of short-window HR anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalyKind {
    Spike,
    Drop,
}

/// A sudden HR change flagged over a 3-sample window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HrAnomaly {
    /// Offset of the window's middle sample
    pub offset_sec: u32,
    /// Spike or drop
    pub kind: AnomalyKind,
    /// Signed bpm change across the window
    pub magnitude: i32,
    /// Human-readable description
    pub description: String,
}

/// Karvonen zone distribution over an HR series.
///
/// Buckets each sample into one of five heart-rate-reserve bands; samples
/// below zone 1 land in bucket 0. Empty input yields a zeroed analysis with
/// a "no data" recommendation rather than an error.
#[must_use]
pub fn analyze_hr_zones(
    samples: &[HeartRateSample],
    max_hr: u32,
    resting_hr: u32,
) -> HrZoneAnalysis {
    if samples.is_empty() {
        return HrZoneAnalysis {
            distribution: BTreeMap::new(),
            target_zone_percent: 0.0,
            anomalies: Vec::new(),
            efficiency: 0.0,
            recommendation: "No heart-rate data".to_owned(),
        };
    }

    let hrr = f64::from(max_hr) - f64::from(resting_hr);
    let bound = |frac: f64| resting_hr + (hrr * frac).max(0.0) as u32;
    // (min, max) per zone; zone 5 tops out at max HR
    let bands: [(u32, u32); 5] = [
        (bound(0.5), bound(0.6)),
        (bound(0.6), bound(0.7)),
        (bound(0.7), bound(0.8)),
        (bound(0.8), bound(0.9)),
        (bound(0.9), max_hr),
    ];

    let mut distribution: BTreeMap<u8, u32> = BTreeMap::new();
    for sample in samples {
        let zone = bands
            .iter()
            .position(|&(min, max)| sample.bpm >= min && sample.bpm <= max)
            .map_or(0, |i| (i + 1) as u8);
        *distribution.entry(zone).or_insert(0) += 1;
    }

    let total = samples.len() as f64;
    let seconds = |zone: u8| f64::from(distribution.get(&zone).copied().unwrap_or(0));
    let target_zone_percent = (seconds(3) + seconds(4)) / total * 100.0;
    let efficiency = (seconds(2) + seconds(3) + seconds(4)) / total * 100.0;

    let recommendation = if target_zone_percent > 70.0 {
        "Excellent - most of the session in the target zones (Z3-Z4)"
    } else if target_zone_percent > 50.0 {
        "Good work in the intensity zones"
    } else if efficiency > 80.0 {
        "Well-controlled effort in the productive zones"
    } else if seconds(1) > total / 2.0 {
        "Session too easy - raise the intensity"
    } else if seconds(5) > total / 3.0 {
        "Caution: a lot of time in Z5 (overreaching risk)"
    } else {
        "Mix zones for a balanced training stimulus"
    };

    trace!(
        samples = samples.len(),
        target_zone_percent,
        "analyzed HR zone distribution"
    );

    HrZoneAnalysis {
        distribution,
        target_zone_percent,
        anomalies: detect_hr_anomalies(samples),
        efficiency,
        recommendation: recommendation.to_owned(),
    }
}

/// Flag sudden HR changes over a sliding 3-sample window.
///
/// The middle sample is scored against the window's first: a rise of more
/// than +20 bpm is a spike, a fall of more than 15 bpm a drop, stamped at
/// the middle sample. A transient that returns to baseline (150, 175, 150)
/// is therefore still caught.
#[must_use]
pub fn detect_hr_anomalies(samples: &[HeartRateSample]) -> Vec<HrAnomaly> {
    if samples.len() < 3 {
        return Vec::new();
    }
    let mut anomalies = Vec::new();
    for window in samples.windows(3) {
        let change = i64::from(window[1].bpm) - i64::from(window[0].bpm);
        if change > i64::from(heart_rate_analysis::SPIKE_DELTA_BPM) {
            anomalies.push(HrAnomaly {
                offset_sec: window[1].offset_sec,
                kind: AnomalyKind::Spike,
                magnitude: change as i32,
                description: format!("Sudden rise of +{change} bpm (hard effort or sensor artifact)"),
            });
        }
        if change < i64::from(heart_rate_analysis::DROP_DELTA_BPM) {
            anomalies.push(HrAnomaly {
                offset_sec: window[1].offset_sec,
                kind: AnomalyKind::Drop,
                magnitude: change as i32,
                description: format!("Sudden fall of {change} bpm (recovery or sensor dropout)"),
            });
        }
    }
    anomalies
}

/// Aerobic decoupling (Pa:Hr) in percent.
///
/// Splits the session into halves, computes efficiency (speed/HR) per half
/// and returns the relative efficiency loss. Uses per-km splits when at
/// least two exist, otherwise the raw speed series. Needs at least 120 HR
/// samples; returns `None` below that, or when the first-half efficiency is
/// not positive.
#[must_use]
pub fn aerobic_decoupling(
    hr_samples: &[HeartRateSample],
    splits: &[Split],
    speed_samples: &[SpeedSample],
) -> Option<f64> {
    if hr_samples.len() < heart_rate_analysis::DECOUPLING_MIN_SAMPLES {
        return None;
    }
    let mid = hr_samples.len() / 2;
    let h1_hr = mean(hr_samples[..mid].iter().map(|s| f64::from(s.bpm)));
    let h2_hr = mean(hr_samples[mid..].iter().map(|s| f64::from(s.bpm)));

    let (h1_ef, h2_ef) = if splits.len() >= 2 {
        let split_mid = splits.len() / 2;
        let split_speed = |s: &Split| {
            if s.duration_sec > 0.0 {
                // per-km splits: 1000 m over the split duration
                1000.0 / s.duration_sec
            } else {
                0.0
            }
        };
        let s1 = mean(splits[..split_mid].iter().map(split_speed));
        let s2 = mean(splits[split_mid..].iter().map(split_speed));
        (efficiency(s1, h1_hr), efficiency(s2, h2_hr))
    } else if speed_samples.len() >= heart_rate_analysis::DECOUPLING_MIN_SAMPLES {
        let speed_mid = speed_samples.len() / 2;
        let s1 = mean(speed_samples[..speed_mid].iter().map(|s| s.mps));
        let s2 = mean(speed_samples[speed_mid..].iter().map(|s| s.mps));
        (efficiency(s1, h1_hr), efficiency(s2, h2_hr))
    } else {
        return None;
    };

    if h1_ef <= 0.0 {
        return None;
    }
    // positive when efficiency degrades in the second half
    Some((h1_ef - h2_ef) / h1_ef * 100.0)
}

/// Cardiac drift in percent: second-half mean HR against first-half mean.
///
/// Requires at least 600 samples (~10 min at 1 Hz); `None` otherwise.
#[must_use]
pub fn hr_drift(samples: &[HeartRateSample]) -> Option<f64> {
    if samples.len() < heart_rate_analysis::DRIFT_MIN_SAMPLES {
        return None;
    }
    let half = samples.len() / 2;
    let first = mean(samples[..half].iter().map(|s| f64::from(s.bpm)));
    let second = mean(samples[samples.len() - half..].iter().map(|s| f64::from(s.bpm)));
    if first <= 0.0 {
        return None;
    }
    Some((second - first) / first * 100.0)
}

/// Overall session fatigue level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FatigueLevel {
    Low,
    Moderate,
    High,
}

/// Rule-scored fatigue assessment over drift, pace variability and decoupling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FatigueAnalysis {
    /// Aggregate level from the indicator score
    pub level: FatigueLevel,
    /// Raw indicator score
    pub score: u32,
    /// Triggered indicator descriptions
    pub indicators: Vec<String>,
}

/// Score session fatigue from HR drift, pace variability (CV %) and
/// aerobic decoupling. Absent inputs simply contribute nothing.
#[must_use]
pub fn detect_fatigue(
    hr_drift: Option<f64>,
    pace_cv: f64,
    decoupling: Option<f64>,
) -> FatigueAnalysis {
    let mut score = 0;
    let mut indicators = Vec::new();

    if let Some(drift) = hr_drift {
        if drift > fatigue::DRIFT_HIGH_PCT {
            score += 3;
            indicators.push(format!("High HR drift ({drift:.0}%)"));
        } else if drift > fatigue::DRIFT_MODERATE_PCT {
            score += 1;
            indicators.push(format!("Moderate HR drift ({drift:.0}%)"));
        }
    }

    if pace_cv > fatigue::PACE_CV_HIGH_PCT {
        score += 2;
        indicators.push(format!("Very irregular pace (CV {pace_cv:.0}%)"));
    } else if pace_cv > fatigue::PACE_CV_MODERATE_PCT {
        score += 1;
        indicators.push(format!("Variable pace (CV {pace_cv:.0}%)"));
    }

    if let Some(dec) = decoupling {
        if dec > fatigue::DECOUPLING_HIGH_PCT {
            score += 3;
            indicators.push(format!("Strong aerobic decoupling ({dec:.0}%)"));
        } else if dec > fatigue::DECOUPLING_MODERATE_PCT {
            score += 1;
            indicators.push(format!("Moderate aerobic decoupling ({dec:.0}%)"));
        }
    }

    let level = if score >= fatigue::HIGH_SCORE {
        FatigueLevel::High
    } else if score >= fatigue::MODERATE_SCORE {
        FatigueLevel::Moderate
    } else {
        FatigueLevel::Low
    };

    FatigueAnalysis {
        level,
        score,
        indicators,
    }
}

fn efficiency(speed_mps: f64, avg_hr: f64) -> f64 {
    if avg_hr > 40.0 {
        speed_mps / avg_hr
    } else {
        0.0
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hr(offset_sec: u32, bpm: u32) -> HeartRateSample {
        HeartRateSample { offset_sec, bpm }
    }

    #[test]
    fn test_single_spike_at_middle_timestamp() {
        let samples = [hr(0, 150), hr(1, 175), hr(2, 150)];
        let anomalies = detect_hr_anomalies(&samples);
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].kind, AnomalyKind::Spike);
        assert_eq!(anomalies[0].magnitude, 25);
        assert_eq!(anomalies[0].offset_sec, 1);
    }

    #[test]
    fn test_drop_detection() {
        let samples = [hr(0, 170), hr(1, 150), hr(2, 148)];
        let anomalies = detect_hr_anomalies(&samples);
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].kind, AnomalyKind::Drop);
        assert_eq!(anomalies[0].magnitude, -20);
        assert_eq!(anomalies[0].offset_sec, 1);
    }

    #[test]
    fn test_transient_spike_in_steady_series() {
        // a sensor blip that returns to baseline must still register
        let mut samples: Vec<_> = (0..20).map(|i| hr(i, 150)).collect();
        samples[10].bpm = 175;
        let anomalies = detect_hr_anomalies(&samples);
        let spike = anomalies
            .iter()
            .find(|a| a.kind == AnomalyKind::Spike)
            .unwrap();
        assert_eq!(spike.magnitude, 25);
        assert_eq!(spike.offset_sec, 10);
    }

    #[test]
    fn test_no_anomaly_below_thresholds() {
        let samples = [hr(0, 150), hr(1, 160), hr(2, 168)];
        assert!(detect_hr_anomalies(&samples).is_empty());
    }

    #[test]
    fn test_zone_analysis_empty_input() {
        let analysis = analyze_hr_zones(&[], 190, 60);
        assert!(analysis.distribution.is_empty());
        assert!((analysis.efficiency).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zone_analysis_buckets_by_karvonen_band() {
        // max 190, rest 60, hrr 130: zone 3 is [151, 164]
        let samples: Vec<_> = (0..100).map(|i| hr(i, 155)).collect();
        let analysis = analyze_hr_zones(&samples, 190, 60);
        assert_eq!(analysis.distribution.get(&3), Some(&100));
        assert!((analysis.target_zone_percent - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_decoupling_requires_min_samples() {
        let samples: Vec<_> = (0..119).map(|i| hr(i, 150)).collect();
        assert!(aerobic_decoupling(&samples, &[], &[]).is_none());
    }

    #[test]
    fn test_decoupling_positive_when_efficiency_drops() {
        // constant speed, rising HR: second half less efficient
        let hr_samples: Vec<_> = (0..200)
            .map(|i| hr(i, if i < 100 { 140 } else { 160 }))
            .collect();
        let speed: Vec<_> = (0..200)
            .map(|i| SpeedSample {
                offset_sec: i,
                mps: 3.0,
            })
            .collect();
        let dec = aerobic_decoupling(&hr_samples, &[], &speed).unwrap();
        assert!(dec > 0.0);
    }

    #[test]
    fn test_hr_drift_requires_ten_minutes() {
        let samples: Vec<_> = (0..500).map(|i| hr(i, 150)).collect();
        assert!(hr_drift(&samples).is_none());
    }

    #[test]
    fn test_hr_drift_detects_rise() {
        let samples: Vec<_> = (0..600)
            .map(|i| hr(i, if i < 300 { 140 } else { 154 }))
            .collect();
        let drift = hr_drift(&samples).unwrap();
        assert!((drift - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_fatigue_levels() {
        let low = detect_fatigue(None, 0.0, None);
        assert_eq!(low.level, FatigueLevel::Low);

        let moderate = detect_fatigue(Some(7.0), 12.0, Some(6.0));
        assert_eq!(moderate.score, 3);
        assert_eq!(moderate.level, FatigueLevel::Moderate);

        let high = detect_fatigue(Some(12.0), 16.0, Some(11.0));
        assert_eq!(high.score, 8);
        assert_eq!(high.level, FatigueLevel::High);
    }
}
