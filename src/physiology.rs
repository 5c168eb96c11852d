// ABOUTME: Physiological capacity estimation - max HR, VO2max, VMA and training zones
// ABOUTME: Pure formula layer; every other engine builds on these derivations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainlab

//! # Physiology Calculator
//!
//! Derives maximal heart rate, aerobic capacity, maximal aerobic speed and the
//! five-band HR/speed/power training zones from a [`UserProfile`].
//!
//! Inputs are not sanity-checked here (a resting HR above the derived max HR
//! yields degenerate but non-panicking zones); supplying sane profiles is the
//! caller's documented obligation.

use serde::{Deserialize, Serialize};

use crate::models::{HeartRateZone, PowerZone, SpeedZone, UserProfile};
use crate::physiological_constants::{aerobic, zones};

/// Age-predicted maximal heart rate (bpm), Tanaka regression
///
/// `maxHR = 208.754 - 0.734 * age`, truncated to whole bpm.
#[must_use]
pub fn max_hr(age: u32) -> u32 {
    let hr = aerobic::TANAKA_INTERCEPT - aerobic::TANAKA_SLOPE * f64::from(age);
    hr.max(0.0) as u32
}

/// `VO2max` estimate (ml/kg/min) from the `HRmax`/`HRrest` ratio (Uth-Sorensen)
///
/// `VO2max = (9.2 + 1.9 * r) * r` with `r = maxHR / restingHR`.
#[must_use]
pub fn vo2_max(max_hr: u32, resting_hr: u32) -> f64 {
    if resting_hr == 0 {
        return 0.0;
    }
    let r = f64::from(max_hr) / f64::from(resting_hr);
    (aerobic::UTH_LINEAR + aerobic::UTH_QUADRATIC * r) * r
}

/// Maximal aerobic speed (km/h) from `VO2max` (inverse Leger-Mercier)
#[must_use]
pub fn vma_kmh(vo2_max: f64) -> f64 {
    (vo2_max - aerobic::LEGER_OFFSET) / aerobic::LEGER_SLOPE
}

/// Five Karvonen heart-rate zones over the heart-rate reserve.
///
/// Band bounds are `restingHR + HRR * fraction` at the fractions
/// `[0.50, 0.60, 0.70, 0.80, 0.90, 1.00]`; consecutive bands share their
/// boundary bpm and zone 5 tops out exactly at `max_hr`.
#[must_use]
pub fn hr_zones(resting_hr: u32, max_hr: u32) -> Vec<HeartRateZone> {
    let hrr = f64::from(max_hr) - f64::from(resting_hr);
    let bound = |frac: f64| -> u32 {
        let bpm = f64::from(resting_hr) + hrr * frac;
        bpm.round().max(0.0) as u32
    };
    zones::KARVONEN_FRACTIONS
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let id = (i + 1) as u8;
            HeartRateZone {
                id,
                min_bpm: bound(pair[0]),
                max_bpm: bound(pair[1]),
                label: format!("Zone {id}"),
            }
        })
        .collect()
}

/// Five speed zones as VMA fractions `[0.60..0.70 ... 1.00..1.15]`
#[must_use]
pub fn speed_zones(vma_kmh: f64) -> Vec<SpeedZone> {
    zones::VMA_FRACTIONS
        .windows(2)
        .enumerate()
        .map(|(i, pair)| SpeedZone {
            id: (i + 1) as u8,
            min_kmh: vma_kmh * pair[0],
            max_kmh: vma_kmh * pair[1],
        })
        .collect()
}

/// Running-power zones mapped from the speed zones.
///
/// `watts = speed(m/s) * weight(kg) * 0.98` per bound, rounded.
#[must_use]
pub fn power_zones(speed_zones: &[SpeedZone], weight_kg: f64) -> Vec<PowerZone> {
    let watts = |kmh: f64| -> u32 {
        (kmh / 3.6 * weight_kg * zones::RUNNING_POWER_FACTOR)
            .round()
            .max(0.0) as u32
    };
    speed_zones
        .iter()
        .map(|z| PowerZone {
            id: z.id,
            min_watts: watts(z.min_kmh),
            max_watts: watts(z.max_kmh),
        })
        .collect()
}

/// Complete physiological derivation for one profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysiologySnapshot {
    /// Age-predicted maximal heart rate in bpm
    pub max_hr: u32,
    /// Estimated `VO2max` in ml/kg/min
    pub vo2_max: f64,
    /// Maximal aerobic speed in km/h
    pub vma_kmh: f64,
    /// Karvonen heart-rate zones
    pub hr_zones: Vec<HeartRateZone>,
    /// VMA-fraction speed zones
    pub speed_zones: Vec<SpeedZone>,
    /// Derived running-power zones
    pub power_zones: Vec<PowerZone>,
}

impl PhysiologySnapshot {
    /// Derive all capacities and zones for a profile
    #[must_use]
    pub fn derive(profile: &UserProfile) -> Self {
        let max_hr = max_hr(profile.age);
        let vo2 = vo2_max(max_hr, profile.resting_hr);
        let vma = vma_kmh(vo2);
        let speed = speed_zones(vma);
        let power = power_zones(&speed, profile.weight_kg);
        Self {
            max_hr,
            vo2_max: vo2,
            vma_kmh: vma,
            hr_zones: hr_zones(profile.resting_hr, max_hr),
            speed_zones: speed,
            power_zones: power,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_hr_age_30() {
        assert_eq!(max_hr(30), 186);
    }

    #[test]
    fn test_zone1_bounds_for_reference_profile() {
        let z = hr_zones(60, max_hr(30));
        assert_eq!(z[0].min_bpm, 123);
        assert_eq!(z[0].max_bpm, 136);
    }

    #[test]
    fn test_hr_zones_contiguous_and_capped_at_max() {
        let z = hr_zones(55, 192);
        assert_eq!(z.len(), 5);
        for pair in z.windows(2) {
            assert_eq!(pair[0].max_bpm, pair[1].min_bpm);
        }
        assert_eq!(z[4].max_bpm, 192);
    }

    #[test]
    fn test_speed_zones_monotonic() {
        let z = speed_zones(16.0);
        for pair in z.windows(2) {
            assert!(pair[1].min_kmh > pair[0].min_kmh);
            assert!(pair[1].max_kmh > pair[0].max_kmh);
            assert!((pair[0].max_kmh - pair[1].min_kmh).abs() < 1e-9);
        }
    }

    #[test]
    fn test_power_zones_follow_speed_zones() {
        let speed = speed_zones(16.0);
        let power = power_zones(&speed, 70.0);
        assert_eq!(power.len(), 5);
        // zone 3 lower bound: 12.8 km/h -> 3.555 m/s * 70 * 0.98
        assert_eq!(power[2].min_watts, 244);
        for pair in power.windows(2) {
            assert!(pair[1].max_watts > pair[0].max_watts);
        }
    }

    #[test]
    fn test_degenerate_profile_does_not_panic() {
        let z = hr_zones(200, 150);
        assert_eq!(z.len(), 5);
        assert_eq!(vo2_max(150, 0), 0.0);
    }
}
