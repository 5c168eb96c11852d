// ABOUTME: Time-series analytics - independent pure analyzers over activity sample series
// ABOUTME: Heart rate, pace, power, interval and elevation analysis submodules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainlab

//! # Time-Series Analytics
//!
//! A library of independent, pure functions over sample slices. Every
//! analyzer tolerates gaps and non-uniform spacing, and degrades to `None`
//! or an empty result when the input is too thin to be meaningful.

pub mod elevation;
pub mod heart_rate;
pub mod intervals;
pub mod pace;
pub mod power;

pub use elevation::{aero_lab, vam_series, AeroLabResult, VamPoint};
pub use heart_rate::{
    aerobic_decoupling, analyze_hr_zones, detect_fatigue, detect_hr_anomalies, hr_drift,
    AnomalyKind, FatigueAnalysis, FatigueLevel, HrAnomaly, HrZoneAnalysis,
};
pub use intervals::{discover_intervals, find_peak_efforts, IntervalKind, PeakEffort, ProInterval};
pub use pace::{analyze_pace_consistency, gap_series, GapPoint, PaceAnalysis};
pub use power::{
    all_time_power_curve, power_curve, quadrant_analysis, w_prime_balance, PowerCurvePoint,
    QuadrantPoint, WPrimeBalance,
};
