// ABOUTME: Sports-science constants used across the planning and analytics engines
// ABOUTME: Grouped by concern, each with its formula provenance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainlab

//! Physiological constants based on sports science research
//!
//! This module contains the established constants used throughout the engine.
//! Values carry their source so threshold tuning stays reviewable.

/// Maximal heart rate and aerobic capacity estimation
///
/// References:
/// - Tanaka, H., Monahan, K.D., & Seals, D.R. (2001). Age-predicted maximal heart rate revisited
/// - Uth, N. et al. (2004). Estimation of `VO2max` from the ratio between `HRmax` and `HRrest`
pub mod aerobic {
    /// Tanaka regression intercept for age-predicted maximal HR
    pub const TANAKA_INTERCEPT: f64 = 208.754;

    /// Tanaka regression slope per year of age
    pub const TANAKA_SLOPE: f64 = 0.734;

    /// Uth-Sorensen linear coefficient on the HRmax/HRrest ratio
    pub const UTH_LINEAR: f64 = 9.2;

    /// Uth-Sorensen quadratic coefficient on the HRmax/HRrest ratio
    pub const UTH_QUADRATIC: f64 = 1.9;

    /// Leger-Mercier `VO2max` offset when converting to maximal aerobic speed
    pub const LEGER_OFFSET: f64 = 2.209;

    /// Leger-Mercier `VO2max` slope per km/h of maximal aerobic speed
    pub const LEGER_SLOPE: f64 = 3.163;
}

/// Training zone band fractions
///
/// Reference: Karvonen, M.J. (1957). The effects of training on heart rate;
/// five-zone VMA banding per Billat, V. (2001). Interval training for performance
pub mod zones {
    /// Karvonen heart-rate-reserve fractions bounding the five HR zones
    pub const KARVONEN_FRACTIONS: [f64; 6] = [0.50, 0.60, 0.70, 0.80, 0.90, 1.00];

    /// VMA fractions bounding the five speed zones
    pub const VMA_FRACTIONS: [f64; 6] = [0.60, 0.70, 0.80, 0.90, 1.00, 1.15];

    /// Running power per (m/s of speed x kg of body weight)
    /// Empirical flat-ground running economy factor
    pub const RUNNING_POWER_FACTOR: f64 = 0.98;
}

/// Plan periodization and volume progression
pub mod periodization {
    /// Fraction of total program weeks given to the taper
    pub const TAPER_SHARE: f64 = 0.10;

    /// Fraction of remaining (non-taper) weeks given to the base phase
    pub const BASE_SHARE: f64 = 0.40;

    /// Fraction of remaining (non-taper) weeks given to the build phase
    pub const BUILD_SHARE: f64 = 0.28;

    /// Weekly volume ramp. 10% rule per Nielsen, R.O. et al. (2014),
    /// training-volume progression and running injury risk
    pub const WEEKLY_RAMP: f64 = 1.10;

    /// Total volume reduction across the taper
    /// Reference: Mujika, I. & Padilla, S. (2003). Scientific bases for precompetition tapering
    pub const TAPER_REDUCTION: f64 = 0.30;

    /// Volume (km) carried by one nominal session when sizing sessions/week
    pub const KM_PER_SESSION: f64 = 23.0;

    /// Minimum and maximum sessions per week
    pub const MIN_SESSIONS: u32 = 3;
    /// Maximum sessions per week
    pub const MAX_SESSIONS: u32 = 7;

    /// Long-run share of weekly volume
    pub const LONG_RUN_SHARE: f64 = 0.35;

    /// Floor on long-run duration in minutes
    pub const LONG_RUN_MIN_MINUTES: u32 = 45;

    /// Floor on easy-run duration in minutes
    pub const EASY_RUN_MIN_MINUTES: u32 = 30;

    /// Riegel fatigue exponent for race-time extrapolation
    /// Reference: Riegel, P.S. (1981). Athletic records and human endurance
    pub const RIEGEL_EXPONENT: f64 = 1.06;
}

/// Heart-rate time-series analysis thresholds
pub mod heart_rate_analysis {
    /// Jump (bpm) across a 3-sample window flagged as a spike
    pub const SPIKE_DELTA_BPM: i32 = 20;

    /// Fall (bpm) across a 3-sample window flagged as a drop
    pub const DROP_DELTA_BPM: i32 = -15;

    /// Minimum HR samples for aerobic decoupling to be meaningful
    pub const DECOUPLING_MIN_SAMPLES: usize = 120;

    /// Minimum HR samples (~10 min at 1 Hz) for half-split HR drift
    pub const DRIFT_MIN_SAMPLES: usize = 600;
}

/// Grade-adjusted pace model
///
/// Reference: Minetti, A.E. et al. (2002). Energy cost of walking and running
/// at extreme uphill and downhill slopes
pub mod gap {
    /// Quintic cost-of-transport polynomial coefficients, highest degree first
    pub const MINETTI_COEFFS: [f64; 6] = [155.4, -30.4, -43.3, 46.3, 19.5, 3.6];

    /// Energy cost of level running (J/kg/m), the polynomial's constant term
    pub const FLAT_COST: f64 = 3.6;

    /// Grade clamp; Minetti's data covers +/-45% slopes
    pub const GRADE_CLAMP: f64 = 0.4;

    /// Elevation lookup half-window in seconds around each speed sample
    pub const ELEVATION_WINDOW_SEC: u32 = 5;

    /// Minimum horizontal distance (m) within the window for a grade estimate
    pub const MIN_WINDOW_DISTANCE_M: f64 = 5.0;
}

/// Critical-power model and W' balance
///
/// References:
/// - Monod, H. & Scherrer, J. (1965). The work capacity of a synergic muscular group
/// - Skiba, P.F. et al. (2012). Modeling the expenditure and reconstitution of work capacity
pub mod critical_power {
    /// CP estimate as a fraction of session average power
    pub const CP_FROM_AVG: f64 = 1.05;

    /// W' (J) per watt of CP in the session-level estimate
    pub const WPRIME_PER_CP: f64 = 60.0;

    /// Ceiling on modeled power as a multiple of session average
    pub const POWER_CAP_FACTOR: f64 = 4.0;

    /// Durations (s) at which the power curve is evaluated
    pub const CURVE_DURATIONS: [u32; 11] = [1, 5, 10, 30, 60, 120, 300, 600, 1200, 1800, 3600];

    /// Skiba recovery time-constant: tau = A * exp(B * dcp) + C,
    /// dcp = CP - P below CP
    pub const SKIBA_TAU_A: f64 = 546.0;
    /// Skiba exponential rate on the sub-CP power deficit
    pub const SKIBA_TAU_B: f64 = -0.01;
    /// Skiba asymptotic time-constant floor (s)
    pub const SKIBA_TAU_C: f64 = 316.0;
}

/// Quadrant analysis of pedal force vs circumferential velocity
///
/// Reference: Coggan, A. & Allen, H. (2010). Training and Racing with a Power Meter
pub mod quadrant {
    /// Default crank length in meters
    pub const CRANK_LENGTH_M: f64 = 0.1725;

    /// Reference cadence (rpm) splitting the velocity axis
    pub const REFERENCE_CADENCE: f64 = 90.0;
}

/// Interval discovery over power/speed series
pub mod intervals {
    /// Rolling-average window in samples
    pub const WINDOW_SAMPLES: usize = 30;

    /// Work threshold for power series, as a fraction of the session mean
    pub const POWER_WORK_THRESHOLD: f64 = 1.15;

    /// Work threshold for the speed fallback, as a fraction of the session
    /// mean
    pub const SPEED_WORK_THRESHOLD: f64 = 1.10;

    /// Scan stride in samples
    pub const SCAN_STEP: usize = 5;

    /// Minimum emitted segment length in seconds
    pub const MIN_SEGMENT_SEC: u32 = 15;

    /// Durations (s) probed by the peak-effort finder
    pub const PEAK_DURATIONS: [u32; 7] = [1, 5, 10, 30, 60, 300, 1200];
}

/// Climb-rate and virtual-elevation analysis
pub mod elevation_analysis {
    /// VAM backward-looking window in seconds
    pub const VAM_WINDOW_SEC: u32 = 30;

    /// Fixed drag area (m^2) for the virtual-elevation model; hoods position
    /// per Martin, J.C. et al. (1998). Validation of a mathematical model
    /// for road cycling power
    pub const AEROLAB_CDA: f64 = 0.35;

    /// Fixed rolling-resistance coefficient for asphalt
    pub const AEROLAB_CRR: f64 = 0.005;

    /// Standard gravity (m/s^2)
    pub const GRAVITY: f64 = 9.81;

    /// Specific gas constant of dry air (J/(kg K))
    pub const AIR_GAS_CONSTANT: f64 = 287.05;
}

/// Longitudinal load model (Banister impulse-response)
///
/// Reference: Banister, E.W. (1991). Modeling elite athletic performance;
/// CTL/ATL time constants per Coggan's performance-management chart
pub mod longitudinal {
    /// Chronic training load time constant in days
    pub const CTL_DAYS: f64 = 42.0;

    /// Acute training load time constant in days
    pub const ATL_DAYS: f64 = 7.0;

    /// CTL floor below which the acute:chronic ratio is reported as absent
    pub const ACWR_MIN_CTL: f64 = 10.0;

    /// Default average HR (bpm) when estimating load without HR data
    pub const DEFAULT_AVG_HR: f64 = 140.0;

    /// Points kept at the tail of the performance-management-chart series
    pub const PMC_MAX_POINTS: usize = 90;
}

/// Per-session science thresholds
pub mod session {
    /// Ambient temperature (deg C) above which HR is normalized
    pub const HEAT_NEUTRAL_TEMP_C: f64 = 15.0;

    /// HR correction (bpm) per degree above neutral
    pub const HEAT_BPM_PER_DEG: f64 = 1.0;

    /// Banister exponential TRIMP rate (generic/male)
    pub const TRIMP_EXP_RATE: f64 = 1.92;

    /// Banister TRIMP coefficients, male: k * exp(rate * ratio)
    pub const TRIMP_MALE_K: f64 = 0.64;
    /// Banister TRIMP exponential rate, male
    pub const TRIMP_MALE_RATE: f64 = 1.92;
    /// Banister TRIMP coefficient, female
    pub const TRIMP_FEMALE_K: f64 = 0.86;
    /// Banister TRIMP exponential rate, female
    pub const TRIMP_FEMALE_RATE: f64 = 1.67;

    /// Reference body weight (kg) for running effectiveness
    pub const RE_REFERENCE_WEIGHT_KG: f64 = 70.0;

    /// Threshold pace for `rTSS` as a fraction of session speed
    pub const RTSS_THRESHOLD_SPEED_FACTOR: f64 = 0.95;

    /// Running threshold power per (kg x m/s of VMA) when no CP test exists
    pub const RTP_FACTOR: f64 = 1.04;

    /// Minimum duration (min) for the endurance index to be defined
    pub const ENDURANCE_INDEX_MIN_MINUTES: f64 = 7.0;

    /// Default pool length in meters for SWOLF
    pub const DEFAULT_POOL_LENGTH_M: f64 = 25.0;
}

/// Insight rule thresholds
pub mod insight_thresholds {
    /// Efficiency factor below this is flagged as low aerobic efficiency
    pub const EF_LOW: f64 = 3.0;
    /// Efficiency factor above this is flagged as excellent
    pub const EF_HIGH: f64 = 5.0;
    /// Running effectiveness below this is flagged as poor
    pub const RE_LOW: f64 = 0.8;
    /// Running effectiveness above this is flagged as excellent
    pub const RE_HIGH: f64 = 1.2;
    /// `rTSS` above this marks a very demanding session
    pub const RTSS_VERY_HIGH: f64 = 200.0;
    /// `rTSS` above this marks a solid training load
    pub const RTSS_HIGH: f64 = 100.0;
    /// Run cadence (spm) below this is flagged as low
    pub const CADENCE_LOW: u32 = 165;
    /// Run cadence (spm) at or above this is flagged as optimal
    pub const CADENCE_HIGH: u32 = 175;
    /// Average HR below this marks good aerobic-zone work
    pub const AVG_HR_LOW: u32 = 145;
    /// Average HR above this marks a high-intensity session
    pub const AVG_HR_HIGH: u32 = 170;
    /// Ground contact time (ms) above this is flagged
    pub const GCT_HIGH_MS: f64 = 240.0;
    /// Vertical ratio (%) above this is flagged
    pub const VERTICAL_RATIO_HIGH: f64 = 8.0;
    /// SWOLF below this marks excellent swim efficiency
    pub const SWOLF_EXCELLENT: u32 = 35;
    /// SWOLF above this marks poor swim efficiency
    pub const SWOLF_POOR: u32 = 45;
    /// Strokes per length above this is flagged as high
    pub const STROKES_PER_LENGTH_HIGH: f64 = 20.0;
    /// Strokes per length below this marks an efficient glide
    pub const STROKES_PER_LENGTH_LOW: f64 = 12.0;
    /// Ambient temperature (deg C) above this is flagged
    pub const AMBIENT_TEMP_HIGH_C: f64 = 25.0;
    /// Duration (min) above this marks a long endurance session
    pub const LONG_DURATION_MIN: u32 = 90;
    /// RPE at or above this is flagged as very hard
    pub const RPE_VERY_HARD: u32 = 8;
    /// RPE at or below this marks a genuinely easy session
    pub const RPE_EASY: u32 = 4;
}

/// Fatigue scoring thresholds combining drift, pace variability, decoupling
pub mod fatigue {
    /// HR drift (%) scoring one fatigue point
    pub const DRIFT_MODERATE_PCT: f64 = 5.0;
    /// HR drift (%) scoring three fatigue points
    pub const DRIFT_HIGH_PCT: f64 = 10.0;
    /// Pace coefficient of variation (%) scoring one point
    pub const PACE_CV_MODERATE_PCT: f64 = 10.0;
    /// Pace coefficient of variation (%) scoring two points
    pub const PACE_CV_HIGH_PCT: f64 = 15.0;
    /// Aerobic decoupling (%) scoring one point
    pub const DECOUPLING_MODERATE_PCT: f64 = 5.0;
    /// Aerobic decoupling (%) scoring three points
    pub const DECOUPLING_HIGH_PCT: f64 = 10.0;
    /// Total score at or above which fatigue is high
    pub const HIGH_SCORE: u32 = 6;
    /// Total score at or above which fatigue is moderate
    pub const MODERATE_SCORE: u32 = 3;
}
