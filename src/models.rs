// ABOUTME: Core data model - profiles, zones, planned workouts, recorded activities, sample series
// ABOUTME: Plain immutable records exchanged with external persistence/sync collaborators
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainlab

//! # Data Model
//!
//! All types here are plain value objects. The engine never persists them and
//! never mutates caller-supplied records; planning and analytics functions
//! consume them by reference and return freshly computed results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Biological sex, used by sex-specific physiological formulas (TRIMP)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

/// Sport discipline of a recorded activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sport {
    Run,
    Ride,
    Swim,
}

/// Category of a planned workout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutKind {
    EasyRun,
    LongRun,
    Intervals,
    Recovery,
    Swim,
}

/// Athlete profile supplied at plan-request time. Immutable.
///
/// The engine does not validate physiological sanity (`resting_hr` below
/// derived max HR, positive goal time, ...). Nonsense input yields nonsense
/// but non-crashing output; sanity checks are the caller's obligation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Age in years
    pub age: u32,
    /// Biological sex
    pub sex: Sex,
    /// Body weight in kilograms
    pub weight_kg: f64,
    /// Resting heart rate in bpm
    pub resting_hr: u32,
    /// Current weekly running volume in kilometers
    pub current_weekly_km: f64,
    /// Goal race distance in kilometers
    pub goal_distance_km: f64,
    /// Goal race time in minutes
    pub goal_time_min: f64,
    /// Goal race date
    pub race_date: DateTime<Utc>,
}

impl UserProfile {
    /// Number of whole program weeks between `now` and the race date, at least 1
    #[must_use]
    pub fn program_duration_weeks(&self, now: DateTime<Utc>) -> u32 {
        let days = (self.race_date - now).num_days();
        u32::try_from(days / 7).unwrap_or(0).max(1)
    }

    /// Target race pace in minutes per kilometer
    #[must_use]
    pub fn target_pace_min_per_km(&self) -> f64 {
        if self.goal_distance_km > 0.0 {
            self.goal_time_min / self.goal_distance_km
        } else {
            0.0
        }
    }

    /// Target race speed in km/h
    #[must_use]
    pub fn target_speed_kmh(&self) -> f64 {
        let pace = self.target_pace_min_per_km();
        if pace > 0.0 {
            60.0 / pace
        } else {
            0.0
        }
    }
}

/// One of five Karvonen heart-rate training bands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartRateZone {
    /// Zone id, 1 (recovery) through 5 (`VO2max`)
    pub id: u8,
    /// Lower bound in bpm (inclusive)
    pub min_bpm: u32,
    /// Upper bound in bpm (inclusive); zone 5 max equals max HR
    pub max_bpm: u32,
    /// Display label ("Zone 1", ...)
    pub label: String,
}

/// One of five speed training bands expressed as VMA fractions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedZone {
    /// Zone id, 1 through 5
    pub id: u8,
    /// Lower bound in km/h
    pub min_kmh: f64,
    /// Upper bound in km/h
    pub max_kmh: f64,
}

/// One of five running-power bands derived from the speed zones
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerZone {
    /// Zone id, 1 through 5
    pub id: u8,
    /// Lower bound in watts
    pub min_watts: u32,
    /// Upper bound in watts
    pub max_watts: u32,
}

/// Periodization phase. A fixed, non-cyclic sequence determined solely by
/// week index: BASE -> BUILD -> SPECIFIC -> TAPER.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingPhase {
    Base,
    Build,
    Specific,
    Taper,
}

impl TrainingPhase {
    /// Human-readable phase label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Base => "Phase 1: Base",
            Self::Build => "Phase 2: Build",
            Self::Specific => "Phase 3: Specific",
            Self::Taper => "Phase 4: Taper",
        }
    }
}

/// Explicit duration-or-distance quantity of a workout step.
///
/// Steps carry this structured descriptor instead of free-text tokens; the
/// `description` field on [`WorkoutStep`] is purely presentational.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepQuantity {
    /// Step measured in minutes
    Duration { minutes: u32 },
    /// Step measured in kilometers
    Distance { km: f64 },
}

impl StepQuantity {
    /// Display token ("20 min" / "5.0 km")
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Duration { minutes } => format!("{minutes} min"),
            Self::Distance { km } => format!("{km:.1} km"),
        }
    }
}

/// Intensity target of a workout step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepTarget {
    /// Training zone 1-5
    Zone(u8),
    /// Literal target pace, e.g. "5:30/km"
    Pace(String),
    /// Rest or untargeted effort
    Open,
}

/// Single step of a planned workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutStep {
    /// Presentational text ("Warm-up", "4x 2000m at 5:00/km")
    pub description: String,
    /// Structured duration-or-distance quantity
    pub quantity: StepQuantity,
    /// Intensity target
    pub target: StepTarget,
}

impl WorkoutStep {
    /// Convenience constructor for a zone-targeted step
    #[must_use]
    pub fn zone(description: impl Into<String>, quantity: StepQuantity, zone: u8) -> Self {
        Self {
            description: description.into(),
            quantity,
            target: StepTarget::Zone(zone),
        }
    }

    /// Convenience constructor for a pace-targeted step
    #[must_use]
    pub fn pace(description: impl Into<String>, quantity: StepQuantity, pace: String) -> Self {
        Self {
            description: description.into(),
            quantity,
            target: StepTarget::Pace(pace),
        }
    }

    /// Convenience constructor for a rest/untargeted step
    #[must_use]
    pub fn open(description: impl Into<String>, quantity: StepQuantity) -> Self {
        Self {
            description: description.into(),
            quantity,
            target: StepTarget::Open,
        }
    }
}

/// Planned workout template. Recorded sessions live in [`CompletedActivity`];
/// the two never share optional post-completion fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    /// Workout category
    pub kind: WorkoutKind,
    /// Display title
    pub title: String,
    /// Planned distance in kilometers (0 for pure-duration sessions)
    pub distance_km: f64,
    /// Planned duration in minutes
    pub duration_min: u32,
    /// Ordered steps
    pub steps: Vec<WorkoutStep>,
}

/// One week of a training plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingWeek {
    /// 1-based week number
    pub week_number: u32,
    /// Periodization phase this week falls in
    pub phase: TrainingPhase,
    /// Target volume in kilometers
    pub target_volume_km: f64,
    /// Workouts, sorted descending by distance
    pub workouts: Vec<WorkoutPlan>,
}

/// Number of weeks assigned to each periodization phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseWeeks {
    pub base: u32,
    pub build: u32,
    pub specific: u32,
    pub taper: u32,
}

impl PhaseWeeks {
    /// Total program length in weeks
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.base + self.build + self.specific + self.taper
    }
}

/// Riegel-model race time prediction for a standard distance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RacePrediction {
    /// Distance name ("5 km", "Marathon", ...)
    pub distance_name: String,
    /// Distance in kilometers
    pub distance_km: f64,
    /// Predicted time in minutes
    pub time_min: f64,
    /// Formatted time ("1h42" / "47min")
    pub formatted: String,
}

/// Complete output of a planning call. Created once per call; immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingPlanResult {
    /// Profile the plan was computed for
    pub profile: UserProfile,
    /// Derived maximal heart rate in bpm
    pub max_hr: u32,
    /// Derived `VO2max` in ml/kg/min
    pub vo2_max: f64,
    /// Derived maximal aerobic speed in km/h
    pub vma_kmh: f64,
    /// Five contiguous Karvonen heart-rate zones
    pub hr_zones: Vec<HeartRateZone>,
    /// Five speed zones as VMA fractions
    pub speed_zones: Vec<SpeedZone>,
    /// Five power zones derived from the speed zones
    pub power_zones: Vec<PowerZone>,
    /// Safe peak weekly volume (10% weekly ramp) in km
    pub safe_peak_volume_km: f64,
    /// Theoretical volume needed to safely sustain goal pace, in km
    pub performance_peak_volume_km: f64,
    /// Week counts per phase; sums to the program length
    pub phase_weeks: PhaseWeeks,
    /// Generated weekly plan
    pub weeks: Vec<TrainingWeek>,
    /// Riegel race-time predictions for standard distances
    pub race_predictions: Vec<RacePrediction>,
}

/// Heart-rate sample: seconds since activity start, bpm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartRateSample {
    pub offset_sec: u32,
    pub bpm: u32,
}

/// Speed sample: seconds since activity start, meters per second
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedSample {
    pub offset_sec: u32,
    pub mps: f64,
}

/// Power sample: seconds since activity start, watts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerSample {
    pub offset_sec: u32,
    pub watts: f64,
}

/// Cadence sample: seconds since activity start, revolutions (or strides) per minute
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CadenceSample {
    pub offset_sec: u32,
    pub rpm: f64,
}

/// Elevation sample: seconds since activity start, altitude in meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationSample {
    pub offset_sec: u32,
    pub altitude_m: f64,
}

/// Generic running-dynamics sample (stride length, GCT, vertical oscillation, ...)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DynamicsSample {
    pub offset_sec: u32,
    pub value: f64,
}

/// Per-kilometer or per-lap split of a recorded activity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Split {
    /// Split distance in meters
    pub distance_m: f64,
    /// Split duration in seconds
    pub duration_sec: f64,
    /// Average heart rate over the split, when recorded
    pub avg_hr: Option<u32>,
}

/// Immutable recorded exercise session.
///
/// Owned and persisted by an external collaborator; the engine only reads it.
/// Summary fields are optional - every analysis degrades gracefully when a
/// field or sample series is absent. Sample series have increasing offsets,
/// nominally ~1 Hz, but may contain gaps; all analytics tolerate non-uniform
/// spacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedActivity {
    /// Stable identifier
    pub id: Uuid,
    /// Session start timestamp
    pub start: DateTime<Utc>,
    /// Sport discipline
    pub sport: Sport,
    /// Display title
    pub title: String,
    /// Total distance in kilometers
    pub distance_km: f64,
    /// Total duration in minutes
    pub duration_min: u32,
    /// Source label ("garmin", "strava", "manual", ...)
    pub source: String,

    /// Average heart rate in bpm
    pub avg_hr: Option<u32>,
    /// Maximum heart rate in bpm
    pub max_hr: Option<u32>,
    /// Average cadence in steps/strokes per minute
    pub avg_cadence: Option<u32>,
    /// Total stroke count (swimming)
    pub total_strokes: Option<u32>,
    /// Device-reported SWOLF score (swimming)
    pub swolf: Option<u32>,
    /// Rating of perceived exertion, 1-10
    pub rpe: Option<u32>,
    /// Total elevation gain in meters
    pub elevation_gain_m: Option<u32>,
    /// Average power in watts
    pub avg_watts: Option<u32>,
    /// Normalized/weighted average power in watts
    pub weighted_avg_watts: Option<u32>,
    /// Total work in kilojoules
    pub kilojoules: Option<f64>,
    /// Provider-supplied relative-effort score, used as the preferred load
    pub suffer_score: Option<u32>,
    /// True when power came from a meter rather than an estimate
    pub device_watts: bool,
    /// Average ambient temperature in degrees Celsius
    pub avg_temp_c: Option<f64>,
    /// Average altitude in meters
    pub avg_altitude_m: Option<i32>,
    /// Measured critical power in watts, when a CP test exists
    pub critical_power: Option<f64>,
    /// Average ground contact time in milliseconds
    pub avg_gct_ms: Option<f64>,
    /// Vertical oscillation to stride length ratio in percent
    pub vertical_ratio: Option<f64>,
    /// Underwater breakout speed in m/s (swimming)
    pub breakout_speed_mps: Option<f64>,

    /// Per-km or per-lap splits
    pub splits: Vec<Split>,
    /// Heart-rate time series
    pub hr_samples: Vec<HeartRateSample>,
    /// Speed time series
    pub speed_samples: Vec<SpeedSample>,
    /// Power time series
    pub power_samples: Vec<PowerSample>,
    /// Cadence time series
    pub cadence_samples: Vec<CadenceSample>,
    /// Elevation time series
    pub elevation_samples: Vec<ElevationSample>,
    /// Ground-contact-time series
    pub gct_samples: Vec<DynamicsSample>,
    /// Vertical-ratio series
    pub vertical_ratio_samples: Vec<DynamicsSample>,
}

impl CompletedActivity {
    /// Create a minimal activity with all optional fields unset
    #[must_use]
    pub fn new(sport: Sport, start: DateTime<Utc>, distance_km: f64, duration_min: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            sport,
            title: String::new(),
            distance_km,
            duration_min,
            source: "manual".to_owned(),
            avg_hr: None,
            max_hr: None,
            avg_cadence: None,
            total_strokes: None,
            swolf: None,
            rpe: None,
            elevation_gain_m: None,
            avg_watts: None,
            weighted_avg_watts: None,
            kilojoules: None,
            suffer_score: None,
            device_watts: false,
            avg_temp_c: None,
            avg_altitude_m: None,
            critical_power: None,
            avg_gct_ms: None,
            vertical_ratio: None,
            breakout_speed_mps: None,
            splits: Vec::new(),
            hr_samples: Vec::new(),
            speed_samples: Vec::new(),
            power_samples: Vec::new(),
            cadence_samples: Vec::new(),
            elevation_samples: Vec::new(),
            gct_samples: Vec::new(),
            vertical_ratio_samples: Vec::new(),
        }
    }

    /// Total duration in seconds
    #[must_use]
    pub const fn duration_sec(&self) -> u32 {
        self.duration_min * 60
    }

    /// Average speed in meters per second, 0 for zero-duration sessions
    #[must_use]
    pub fn avg_speed_mps(&self) -> f64 {
        let secs = f64::from(self.duration_sec());
        if secs > 0.0 {
            self.distance_km * 1000.0 / secs
        } else {
            0.0
        }
    }
}

/// Format a duration in minutes as "Xh Y" / "N min"
#[must_use]
pub fn format_duration(minutes: u32) -> String {
    if minutes < 60 {
        return format!("{minutes} min");
    }
    let h = minutes / 60;
    let m = minutes % 60;
    if m > 0 {
        format!("{h}h {m}")
    } else {
        format!("{h}h")
    }
}

/// Format a pace in min/km as "M:SS/km"
#[must_use]
pub fn format_pace(pace_min_per_km: f64) -> String {
    let min = pace_min_per_km.floor();
    let sec = ((pace_min_per_km - min) * 60.0).floor();
    format!("{min:.0}:{sec:02.0}/km")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn profile() -> UserProfile {
        UserProfile {
            age: 30,
            sex: Sex::Male,
            weight_kg: 70.0,
            resting_hr: 60,
            current_weekly_km: 30.0,
            goal_distance_km: 10.0,
            goal_time_min: 50.0,
            race_date: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).single().unwrap(),
        }
    }

    #[test]
    fn test_program_duration_floors_at_one_week() {
        let p = profile();
        let after_race = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).single().unwrap();
        assert_eq!(p.program_duration_weeks(after_race), 1);
    }

    #[test]
    fn test_program_duration_twelve_weeks() {
        let p = profile();
        let now = Utc.with_ymd_and_hms(2025, 3, 9, 0, 0, 0).single().unwrap();
        assert_eq!(p.program_duration_weeks(now), 12);
    }

    #[test]
    fn test_target_pace_and_speed() {
        let p = profile();
        assert!((p.target_pace_min_per_km() - 5.0).abs() < 1e-9);
        assert!((p.target_speed_kmh() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_duration(45), "45 min");
        assert_eq!(format_duration(125), "2h 5");
        assert_eq!(format_duration(120), "2h");
        assert_eq!(format_pace(5.5), "5:30/km");
    }

    #[test]
    fn test_activity_serde_round_trip() {
        let start = Utc.with_ymd_and_hms(2025, 1, 5, 9, 0, 0).single().unwrap();
        let activity = CompletedActivity::new(Sport::Run, start, 10.0, 50);
        let json = serde_json::to_string(&activity).unwrap();
        let back: CompletedActivity = serde_json::from_str(&json).unwrap();
        assert_eq!(activity, back);
    }
}
