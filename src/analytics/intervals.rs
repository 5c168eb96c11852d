// ABOUTME: Interval discovery and peak-effort search over power/speed series
// ABOUTME: Rolling-window threshold crossings emit contiguous WORK/REST segments
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainlab

//! Automated interval discovery and peak-effort search.

use serde::{Deserialize, Serialize};

use crate::models::{HeartRateSample, PowerSample, SpeedSample};
use crate::physiological_constants::intervals;

/// Segment classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntervalKind {
    Work,
    Rest,
}

/// One discovered interval segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProInterval {
    /// Work or rest
    pub kind: IntervalKind,
    /// Segment start offset in seconds
    pub start_sec: u32,
    /// Segment end offset in seconds
    pub end_sec: u32,
    /// Mean power over the closing window (pseudo-power for speed-based
    /// discovery: speed * 70 kg)
    pub avg_power: Option<f64>,
    /// Mean HR over the segment, when HR samples cover it
    pub avg_hr: Option<f64>,
}

/// Discover workout structure from threshold crossings.
///
/// Scans a 30-sample rolling average in steps of 5, against 115% of the
/// session mean for power (110% for the speed fallback), emitting a segment
/// each time the work/rest state flips. Needs more than 100 samples of
/// power or speed; segments shorter than 15 s are dropped as noise.
#[must_use]
pub fn discover_intervals(
    power_samples: &[PowerSample],
    hr_samples: &[HeartRateSample],
    speed_samples: &[SpeedSample],
) -> Vec<ProInterval> {
    let discovered = if power_samples.len() > 100 {
        let values: Vec<(u32, f64)> = power_samples.iter().map(|s| (s.offset_sec, s.watts)).collect();
        scan(&values, intervals::POWER_WORK_THRESHOLD, hr_samples, 1.0)
    } else if speed_samples.len() > 100 {
        let values: Vec<(u32, f64)> = speed_samples.iter().map(|s| (s.offset_sec, s.mps)).collect();
        // pseudo-power: speed times a 70 kg reference weight
        scan(&values, intervals::SPEED_WORK_THRESHOLD, hr_samples, 70.0)
    } else {
        Vec::new()
    };

    discovered
        .into_iter()
        .filter(|i| i.end_sec - i.start_sec > intervals::MIN_SEGMENT_SEC)
        .collect()
}

fn scan(
    values: &[(u32, f64)],
    threshold_factor: f64,
    hr_samples: &[HeartRateSample],
    power_scale: f64,
) -> Vec<ProInterval> {
    let mean = values.iter().map(|&(_, v)| v).sum::<f64>() / values.len() as f64;
    let threshold = mean * threshold_factor;

    let mut result = Vec::new();
    let mut segment_start = 0usize;
    let mut in_work = false;

    let mut i = intervals::WINDOW_SAMPLES;
    while i < values.len() {
        let window = &values[i - intervals::WINDOW_SAMPLES..i];
        let window_avg = window.iter().map(|&(_, v)| v).sum::<f64>() / window.len() as f64;
        let now_work = window_avg > threshold;
        if now_work != in_work {
            let start_sec = values[segment_start].0;
            let end_sec = values[i].0;
            result.push(ProInterval {
                kind: if in_work {
                    IntervalKind::Work
                } else {
                    IntervalKind::Rest
                },
                start_sec,
                end_sec,
                avg_power: Some(window_avg * power_scale),
                avg_hr: mean_hr_between(hr_samples, start_sec, end_sec),
            });
            in_work = now_work;
            segment_start = i;
        }
        i += intervals::SCAN_STEP;
    }

    result
}

fn mean_hr_between(hr_samples: &[HeartRateSample], start_sec: u32, end_sec: u32) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for s in hr_samples {
        if s.offset_sec >= start_sec && s.offset_sec <= end_sec {
            sum += f64::from(s.bpm);
            count += 1;
        }
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// One best rolling-average effort
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakEffort {
    /// Effort duration in seconds (sample count at nominal 1 Hz)
    pub duration_sec: u32,
    /// Best rolling-average power in watts
    pub watts: f64,
}

/// Best 1 s / 5 s / 10 s / 30 s / 1 min / 5 min / 20 min efforts.
///
/// Brute-force max rolling average; durations longer than the series are
/// omitted. Always runs to completion and returns the full result.
#[must_use]
pub fn find_peak_efforts(power_samples: &[PowerSample]) -> Vec<PeakEffort> {
    let mut peaks = Vec::new();
    for &d in &intervals::PEAK_DURATIONS {
        let len = d as usize;
        if power_samples.len() < len {
            continue;
        }
        let mut max_avg = 0.0f64;
        for window in power_samples.windows(len) {
            let avg = window.iter().map(|s| s.watts).sum::<f64>() / len as f64;
            if avg > max_avg {
                max_avg = avg;
            }
        }
        peaks.push(PeakEffort {
            duration_sec: d,
            watts: max_avg,
        });
    }
    peaks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn power(offset_sec: u32, watts: f64) -> PowerSample {
        PowerSample { offset_sec, watts }
    }

    #[test]
    fn test_discovers_work_and_rest_segments() {
        // 2 min easy, 2 min hard, 2 min easy at 1 Hz
        let samples: Vec<_> = (0..360)
            .map(|i| power(i, if (120..240).contains(&i) { 300.0 } else { 100.0 }))
            .collect();
        let found = discover_intervals(&samples, &[], &[]);
        assert!(!found.is_empty());
        assert!(found.iter().any(|i| i.kind == IntervalKind::Work));
        assert!(found.iter().any(|i| i.kind == IntervalKind::Rest));
        for interval in &found {
            assert!(interval.end_sec - interval.start_sec > 15);
        }
    }

    #[test]
    fn test_short_series_yields_nothing() {
        let samples: Vec<_> = (0..50).map(|i| power(i, 200.0)).collect();
        assert!(discover_intervals(&samples, &[], &[]).is_empty());
    }

    #[test]
    fn test_speed_fallback_uses_pseudo_power() {
        let speed: Vec<_> = (0..360)
            .map(|i| SpeedSample {
                offset_sec: i,
                mps: if (120..240).contains(&i) { 5.0 } else { 2.5 },
            })
            .collect();
        let found = discover_intervals(&[], &[], &speed);
        let work = found
            .iter()
            .find(|i| i.kind == IntervalKind::Work)
            .unwrap();
        // closing window average near 2.5 m/s scaled by 70 kg
        assert!(work.avg_power.unwrap() > 100.0);
    }

    #[test]
    fn test_peak_efforts_found_per_duration() {
        let samples: Vec<_> = (0..120)
            .map(|i| power(i, if i < 10 { 500.0 } else { 150.0 }))
            .collect();
        let peaks = find_peak_efforts(&samples);
        let one_sec = peaks.iter().find(|p| p.duration_sec == 1).unwrap();
        assert!((one_sec.watts - 500.0).abs() < 1e-9);
        let ten_sec = peaks.iter().find(|p| p.duration_sec == 10).unwrap();
        assert!((ten_sec.watts - 500.0).abs() < 1e-9);
        // longer durations than the series are omitted
        assert!(peaks.iter().all(|p| p.duration_sec <= 60));
    }

    #[test]
    fn test_peak_efforts_empty_input() {
        assert!(find_peak_efforts(&[]).is_empty());
    }
}
