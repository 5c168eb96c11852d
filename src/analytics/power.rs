// ABOUTME: Power analysis - CP-model power curve, W' balance (Skiba), quadrant analysis
// ABOUTME: All-time curve fans out across history with rayon
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainlab

//! Power-duration modeling and pedal-force analysis.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::{CadenceSample, CompletedActivity, PowerSample};
use crate::physiological_constants::{critical_power, quadrant};

/// One point of a max-mean-power curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerCurvePoint {
    /// Effort duration in seconds
    pub duration_sec: u32,
    /// Modeled maximal mean power in watts
    pub watts: f64,
}

/// Session power curve from the two-parameter critical-power model.
///
/// `P(t) = CP + W'/t` with `CP = 1.05 * avgWatts` and `W' = 60 * CP` J,
/// capped at 4x average power, evaluated on a fixed duration grid. The
/// average comes from the summary field, falling back to the sample mean;
/// with neither, the curve is empty.
#[must_use]
pub fn power_curve(activity: &CompletedActivity) -> Vec<PowerCurvePoint> {
    let avg_watts = activity.avg_watts.map(f64::from).or_else(|| {
        if activity.power_samples.is_empty() {
            None
        } else {
            Some(
                activity.power_samples.iter().map(|s| s.watts).sum::<f64>()
                    / activity.power_samples.len() as f64,
            )
        }
    });
    let Some(avg_watts) = avg_watts else {
        return Vec::new();
    };

    let cp = avg_watts * critical_power::CP_FROM_AVG;
    let w_prime = cp * critical_power::WPRIME_PER_CP;
    let cap = avg_watts * critical_power::POWER_CAP_FACTOR;

    critical_power::CURVE_DURATIONS
        .iter()
        .map(|&t| PowerCurvePoint {
            duration_sec: t,
            watts: (cp + w_prime / f64::from(t)).min(cap),
        })
        .collect()
}

/// All-time max-mean-power records across a history: the per-duration
/// maximum over each activity's session curve. Empty history yields a
/// zeroed curve on the standard grid.
#[must_use]
pub fn all_time_power_curve(history: &[CompletedActivity]) -> Vec<PowerCurvePoint> {
    let best = history
        .par_iter()
        .map(|activity| {
            power_curve(activity)
                .iter()
                .map(|p| p.watts)
                .collect::<Vec<f64>>()
        })
        .filter(|curve| !curve.is_empty())
        .reduce(
            || vec![0.0; critical_power::CURVE_DURATIONS.len()],
            |mut acc, curve| {
                for (slot, watts) in acc.iter_mut().zip(curve) {
                    if watts > *slot {
                        *slot = watts;
                    }
                }
                acc
            },
        );

    critical_power::CURVE_DURATIONS
        .iter()
        .zip(best)
        .map(|(&duration_sec, watts)| PowerCurvePoint {
            duration_sec,
            watts,
        })
        .collect()
}

/// W' balance series (Skiba differential model)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WPrimeBalance {
    /// W' balance in joules, one point per power sample
    pub series: Vec<f64>,
    /// Critical power used (watts)
    pub critical_power: f64,
    /// Total anaerobic capacity W' (joules)
    pub w_prime: f64,
}

/// Track anaerobic-capacity depletion and reconstitution over a ride.
///
/// Above CP, W' depletes by `(P - CP) * dt`; below CP it recovers
/// exponentially toward the full store with
/// `tau = 546 * exp(-0.01 * (CP - P)) + 316` s. The series is clamped to
/// `[0, W']` throughout.
#[must_use]
pub fn w_prime_balance(
    power_samples: &[PowerSample],
    cp: f64,
    w_prime_total: f64,
) -> WPrimeBalance {
    if power_samples.is_empty() {
        return WPrimeBalance {
            series: Vec::new(),
            critical_power: cp,
            w_prime: w_prime_total,
        };
    }

    let mut series = Vec::with_capacity(power_samples.len());
    let mut balance = w_prime_total;
    series.push(balance);

    for pair in power_samples.windows(2) {
        let dt = f64::from(pair[1].offset_sec.saturating_sub(pair[0].offset_sec));
        let p = pair[1].watts;
        if p > cp {
            balance -= (p - cp) * dt;
        } else {
            let tau = critical_power::SKIBA_TAU_A
                * (critical_power::SKIBA_TAU_B * (cp - p)).exp()
                + critical_power::SKIBA_TAU_C;
            balance += (w_prime_total - balance) * (1.0 - (-dt / tau).exp());
        }
        balance = balance.clamp(0.0, w_prime_total);
        series.push(balance);
    }

    WPrimeBalance {
        series,
        critical_power: cp,
        w_prime: w_prime_total,
    }
}

/// One force/velocity observation in the Coggan quadrant model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadrantPoint {
    /// Average effective pedal force in newtons
    pub force_n: f64,
    /// Circumferential pedal velocity in m/s
    pub velocity_mps: f64,
    /// Quadrant 1-4 (1 = high force, high velocity)
    pub quadrant: u8,
}

/// Quadrant analysis of pedal force against circumferential velocity.
///
/// Thresholds derive from FTP at the 90 rpm reference cadence with a
/// 172.5 mm crank. Zero-cadence samples are skipped; power and cadence
/// series are paired index-wise.
#[must_use]
pub fn quadrant_analysis(
    power_samples: &[PowerSample],
    cadence_samples: &[CadenceSample],
    ftp: f64,
) -> Vec<QuadrantPoint> {
    let threshold_cpv =
        quadrant::REFERENCE_CADENCE * 2.0 * std::f64::consts::PI * quadrant::CRANK_LENGTH_M / 60.0;
    if threshold_cpv <= 0.0 {
        return Vec::new();
    }
    let threshold_aepf = ftp / threshold_cpv;

    power_samples
        .iter()
        .zip(cadence_samples)
        .filter(|(_, c)| c.rpm > 0.0)
        .map(|(p, c)| {
            let cpv = c.rpm * 2.0 * std::f64::consts::PI * quadrant::CRANK_LENGTH_M / 60.0;
            let aepf = p.watts / cpv;
            let quadrant = match (aepf >= threshold_aepf, cpv >= threshold_cpv) {
                (true, true) => 1,
                (true, false) => 2,
                (false, false) => 3,
                (false, true) => 4,
            };
            QuadrantPoint {
                force_n: aepf,
                velocity_mps: cpv,
                quadrant,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sport;
    use chrono::{TimeZone, Utc};

    fn power(offset_sec: u32, watts: f64) -> PowerSample {
        PowerSample { offset_sec, watts }
    }

    fn ride_with_avg_watts(avg: u32) -> CompletedActivity {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).single().unwrap();
        let mut a = CompletedActivity::new(Sport::Ride, start, 40.0, 80);
        a.avg_watts = Some(avg);
        a
    }

    #[test]
    fn test_power_curve_caps_short_durations() {
        let curve = power_curve(&ride_with_avg_watts(200));
        // 1s point would be CP + W' = 210 + 12600, capped at 4x avg
        assert!((curve[0].watts - 800.0).abs() < 1e-9);
        // 1h point approaches CP
        let last = curve.last().unwrap();
        assert!((last.watts - (210.0 + 12600.0 / 3600.0)).abs() < 1e-9);
    }

    #[test]
    fn test_power_curve_monotonically_decreasing() {
        let curve = power_curve(&ride_with_avg_watts(250));
        for pair in curve.windows(2) {
            assert!(pair[1].watts <= pair[0].watts);
        }
    }

    #[test]
    fn test_power_curve_empty_without_power_data() {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).single().unwrap();
        let a = CompletedActivity::new(Sport::Ride, start, 40.0, 80);
        assert!(power_curve(&a).is_empty());
    }

    #[test]
    fn test_all_time_curve_takes_per_duration_max() {
        let history = vec![ride_with_avg_watts(200), ride_with_avg_watts(260)];
        let best = all_time_power_curve(&history);
        let single = power_curve(&ride_with_avg_watts(260));
        for (b, s) in best.iter().zip(single) {
            assert!((b.watts - s.watts).abs() < 1e-9);
        }
    }

    #[test]
    fn test_all_time_curve_empty_history_is_zeroed() {
        let best = all_time_power_curve(&[]);
        assert_eq!(best.len(), 11);
        assert!(best.iter().all(|p| p.watts.abs() < f64::EPSILON));
    }

    #[test]
    fn test_w_prime_balance_stays_in_bounds() {
        let samples: Vec<_> = (0..600)
            .map(|i| power(i, if i % 60 < 30 { 400.0 } else { 100.0 }))
            .collect();
        let result = w_prime_balance(&samples, 250.0, 20_000.0);
        assert_eq!(result.series.len(), 600);
        for &b in &result.series {
            assert!((0.0..=20_000.0).contains(&b));
        }
    }

    #[test]
    fn test_w_prime_depletes_above_cp() {
        let samples: Vec<_> = (0..10).map(|i| power(i, 300.0)).collect();
        let result = w_prime_balance(&samples, 250.0, 20_000.0);
        // 9 seconds at 50 W over CP
        assert!((result.series[9] - (20_000.0 - 450.0)).abs() < 1e-9);
    }

    #[test]
    fn test_quadrant_classification() {
        let power_samples = [power(0, 400.0), power(1, 100.0)];
        let cadence = [
            CadenceSample {
                offset_sec: 0,
                rpm: 100.0,
            },
            CadenceSample {
                offset_sec: 1,
                rpm: 100.0,
            },
        ];
        let points = quadrant_analysis(&power_samples, &cadence, 250.0);
        assert_eq!(points.len(), 2);
        // high force + high velocity, then low force + high velocity
        assert_eq!(points[0].quadrant, 1);
        assert_eq!(points[1].quadrant, 4);
    }

    #[test]
    fn test_quadrant_skips_zero_cadence() {
        let power_samples = [power(0, 200.0)];
        let cadence = [CadenceSample {
            offset_sec: 0,
            rpm: 0.0,
        }];
        assert!(quadrant_analysis(&power_samples, &cadence, 250.0).is_empty());
    }
}
