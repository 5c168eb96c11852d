// ABOUTME: Periodized plan scheduler - phase split, weekly volume ramp, workout generation
// ABOUTME: Also carries the Riegel race-time predictor and the 2-week recovery plan
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainlab

//! # Periodization Scheduler
//!
//! Builds a complete multi-week running plan from a profile. Phases form a
//! fixed, non-cyclic sequence determined solely by week index
//! (BASE -> BUILD -> SPECIFIC -> TAPER); weekly volume ramps linearly from the
//! current volume to a safe peak, then tapers 30% across the final phase.
//!
//! The BUILD quality workout is picked from two equivalent templates through a
//! caller-injected random source, so plan generation stays reproducible under
//! a seeded generator.

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::debug;

use crate::models::{
    PhaseWeeks, RacePrediction, StepQuantity, TrainingPhase, TrainingPlanResult, TrainingWeek,
    UserProfile, WorkoutKind, WorkoutPlan, WorkoutStep,
};
use crate::physiological_constants::periodization;
use crate::physiology::PhysiologySnapshot;

/// Anchor distance (km) for Riegel extrapolation; a 2 km effort at VMA
const RIEGEL_ANCHOR_KM: f64 = 2.0;

/// Generate a full periodized training plan.
///
/// `now` anchors the program length (whole weeks until the race date, at
/// least 1). The random source only influences BUILD-phase quality-workout
/// selection.
#[must_use]
pub fn generate_plan(
    profile: &UserProfile,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> TrainingPlanResult {
    let physiology = PhysiologySnapshot::derive(profile);
    let total_weeks = profile.program_duration_weeks(now);

    let (safe_peak, performance_peak) = peak_volumes(profile, total_weeks, physiology.vma_kmh);
    let phases = phase_weeks(total_weeks);
    let weeks = generate_weeks(
        profile,
        profile.current_weekly_km,
        safe_peak,
        total_weeks,
        &phases,
        physiology.vma_kmh,
        rng,
    );
    let race_predictions = predict_race_times(physiology.vma_kmh);

    debug!(
        total_weeks,
        safe_peak_km = safe_peak,
        vma_kmh = physiology.vma_kmh,
        "generated training plan"
    );

    TrainingPlanResult {
        profile: profile.clone(),
        max_hr: physiology.max_hr,
        vo2_max: physiology.vo2_max,
        vma_kmh: physiology.vma_kmh,
        hr_zones: physiology.hr_zones,
        speed_zones: physiology.speed_zones,
        power_zones: physiology.power_zones,
        safe_peak_volume_km: safe_peak,
        performance_peak_volume_km: performance_peak,
        phase_weeks: phases,
        weeks,
        race_predictions,
    }
}

/// Generate a fixed 2-week post-race recovery plan.
///
/// Bypasses periodization: 50% of current volume, 3 sessions per week (two
/// soft runs and a 30-minute recovery swim), no race predictions.
#[must_use]
pub fn generate_recovery_plan(profile: &UserProfile) -> TrainingPlanResult {
    let physiology = PhysiologySnapshot::derive(profile);
    let vma = physiology.vma_kmh;
    let volume = profile.current_weekly_km * 0.5;
    let per_session = volume / 3.0;
    let run_minutes = minutes_at(per_session, vma * 0.6).max(1);

    let weeks = (1..=2)
        .map(|week_number| TrainingWeek {
            week_number,
            phase: TrainingPhase::Taper,
            target_volume_km: volume,
            workouts: vec![
                WorkoutPlan {
                    kind: WorkoutKind::Recovery,
                    title: "Active Recovery".to_owned(),
                    distance_km: per_session,
                    duration_min: run_minutes,
                    steps: vec![WorkoutStep::zone(
                        "Very easy jog",
                        StepQuantity::Duration {
                            minutes: run_minutes,
                        },
                        1,
                    )],
                },
                WorkoutPlan {
                    kind: WorkoutKind::Swim,
                    title: "Recovery Swim".to_owned(),
                    distance_km: 1.0,
                    duration_min: 30,
                    steps: vec![WorkoutStep::zone(
                        "Relaxed freestyle",
                        StepQuantity::Duration { minutes: 30 },
                        1,
                    )],
                },
                WorkoutPlan {
                    kind: WorkoutKind::EasyRun,
                    title: "Easy Run".to_owned(),
                    distance_km: per_session,
                    duration_min: run_minutes,
                    steps: vec![WorkoutStep::zone(
                        "Aerobic endurance",
                        StepQuantity::Duration {
                            minutes: run_minutes,
                        },
                        2,
                    )],
                },
            ],
        })
        .collect();

    TrainingPlanResult {
        profile: profile.clone(),
        max_hr: physiology.max_hr,
        vo2_max: physiology.vo2_max,
        vma_kmh: physiology.vma_kmh,
        hr_zones: physiology.hr_zones,
        speed_zones: physiology.speed_zones,
        power_zones: physiology.power_zones,
        safe_peak_volume_km: volume,
        performance_peak_volume_km: volume,
        phase_weeks: PhaseWeeks {
            base: 0,
            build: 0,
            specific: 0,
            taper: 2,
        },
        weeks,
        race_predictions: Vec::new(),
    }
}

/// Riegel race-time prediction (minutes) for an arbitrary distance.
///
/// `T2 = T1 * (D2/D1)^1.06`, anchored at a 2 km reference ridden at VMA.
#[must_use]
pub fn predict_time(vma_kmh: f64, distance_km: f64) -> f64 {
    if vma_kmh <= 0.0 || distance_km <= 0.0 {
        return 0.0;
    }
    let base_time_min = RIEGEL_ANCHOR_KM / vma_kmh * 60.0;
    base_time_min * (distance_km / RIEGEL_ANCHOR_KM).powf(periodization::RIEGEL_EXPONENT)
}

/// Riegel predictions for the standard race distances
#[must_use]
pub fn predict_race_times(vma_kmh: f64) -> Vec<RacePrediction> {
    let distances: [(&str, f64); 4] = [
        ("5 km", 5.0),
        ("10 km", 10.0),
        ("Half Marathon", 21.0975),
        ("Marathon", 42.195),
    ];
    distances
        .iter()
        .map(|&(name, km)| {
            let time_min = predict_time(vma_kmh, km);
            RacePrediction {
                distance_name: name.to_owned(),
                distance_km: km,
                time_min,
                formatted: format_race_time(time_min),
            }
        })
        .collect()
}

/// Phase split: taper gets round(10%) of total (min 1); of the remainder,
/// base gets round(40%), build round(28%), specific the rest.
#[must_use]
pub fn phase_weeks(total_weeks: u32) -> PhaseWeeks {
    let total = f64::from(total_weeks);
    let taper = (total * periodization::TAPER_SHARE).round().max(1.0) as u32;
    let taper = taper.min(total_weeks);
    let remaining = total_weeks - taper;
    let base = (f64::from(remaining) * periodization::BASE_SHARE).round() as u32;
    let build = (f64::from(remaining) * periodization::BUILD_SHARE).round() as u32;
    let specific = remaining - base - build;
    PhaseWeeks {
        base,
        build,
        specific,
        taper,
    }
}

/// Safe and performance peak weekly volumes (km).
///
/// Safe peak applies the 10% weekly ramp over `weeks - 3` (floored at one
/// step). Performance peak is the theoretical volume to safely sustain goal
/// pace: `goalDist * (1 + A/goalTime)`, `A = 10 * targetSpeed/VMA - 5`.
fn peak_volumes(profile: &UserProfile, total_weeks: u32, vma_kmh: f64) -> (f64, f64) {
    let ramp_weeks = if total_weeks > 3 { total_weeks - 3 } else { 1 };
    let exponent = i32::try_from(ramp_weeks).unwrap_or(i32::MAX);
    let safe = profile.current_weekly_km * periodization::WEEKLY_RAMP.powi(exponent);
    let perf = if vma_kmh > 0.0 && profile.goal_time_min > 0.0 {
        let a = 10.0 * (profile.target_speed_kmh() / vma_kmh) - 5.0;
        profile.goal_distance_km * (1.0 + a / profile.goal_time_min)
    } else {
        profile.goal_distance_km
    };
    (safe, perf)
}

fn generate_weeks(
    profile: &UserProfile,
    start_volume: f64,
    peak_volume: f64,
    total_weeks: u32,
    phases: &PhaseWeeks,
    vma_kmh: f64,
    rng: &mut impl Rng,
) -> Vec<TrainingWeek> {
    let ramp_weeks = (total_weeks - phases.taper).max(1);
    let volume_step = (peak_volume - start_volume) / f64::from(ramp_weeks);
    let taper_start = total_weeks - phases.taper;

    (1..=total_weeks)
        .map(|week| {
            let phase = if week <= phases.base {
                TrainingPhase::Base
            } else if week <= phases.base + phases.build {
                TrainingPhase::Build
            } else if week <= phases.base + phases.build + phases.specific {
                TrainingPhase::Specific
            } else {
                TrainingPhase::Taper
            };

            let volume = if phase == TrainingPhase::Taper {
                let progress = f64::from(week - taper_start) / f64::from(phases.taper);
                peak_volume * (1.0 - periodization::TAPER_REDUCTION * progress)
            } else {
                (start_volume + volume_step * f64::from(week - 1)).min(peak_volume)
            };

            let sessions = ((2.0 + volume / periodization::KM_PER_SESSION).round() as u32)
                .clamp(periodization::MIN_SESSIONS, periodization::MAX_SESSIONS);

            TrainingWeek {
                week_number: week,
                phase,
                target_volume_km: volume,
                workouts: workouts_for_week(volume, sessions, phase, vma_kmh, profile, rng),
            }
        })
        .collect()
}

fn workouts_for_week(
    volume: f64,
    sessions: u32,
    phase: TrainingPhase,
    vma_kmh: f64,
    profile: &UserProfile,
    rng: &mut impl Rng,
) -> Vec<WorkoutPlan> {
    let mut workouts = Vec::with_capacity(sessions as usize);

    workouts.push(long_run(volume, phase, vma_kmh, profile));
    let long_run_km = workouts[0].distance_km;

    let quality = quality_workout(volume, phase, profile, rng);
    let quality_km = quality.distance_km;
    workouts.push(quality);

    let remaining = volume - long_run_km - quality_km;
    let sessions_left = sessions.saturating_sub(2);
    if sessions_left > 0 {
        let easy_km = remaining / f64::from(sessions_left);
        let easy_minutes = minutes_at(easy_km, vma_kmh * 0.65)
            .max(periodization::EASY_RUN_MIN_MINUTES);
        for k in 1..=sessions_left {
            workouts.push(easy_run(k, phase, easy_km, easy_minutes));
        }
    }

    workouts.sort_by(|a, b| b.distance_km.total_cmp(&a.distance_km));
    workouts
}

/// Long-run anchor: 35% of weekly volume at easy aerobic speed.
/// SPECIFIC weeks embed a goal-pace block instead of plain endurance.
fn long_run(volume: f64, phase: TrainingPhase, vma_kmh: f64, profile: &UserProfile) -> WorkoutPlan {
    let distance_km = volume * periodization::LONG_RUN_SHARE;
    let duration_min =
        minutes_at(distance_km, vma_kmh * 0.65).max(periodization::LONG_RUN_MIN_MINUTES);

    let steps = if phase == TrainingPhase::Specific {
        let pace = profile.target_pace_min_per_km();
        let pace_str = crate::models::format_pace(pace);
        let warmup_min = minutes_at(3.0, vma_kmh * 0.6).max(1);
        let pace_km = (distance_km - 5.0).max(5.0);
        vec![
            WorkoutStep::zone(
                "Warm-up",
                StepQuantity::Duration {
                    minutes: warmup_min,
                },
                2,
            ),
            WorkoutStep::pace(
                "Goal-pace block",
                StepQuantity::Duration {
                    minutes: (pace_km * pace).max(0.0) as u32,
                },
                pace_str,
            ),
            WorkoutStep::zone("Cool-down", StepQuantity::Duration { minutes: 10 }, 1),
        ]
    } else {
        let endurance_min = duration_min.saturating_sub(30).max(10);
        vec![
            WorkoutStep::zone(
                "Progressive warm-up",
                StepQuantity::Duration { minutes: 20 },
                1,
            ),
            WorkoutStep::zone(
                "Aerobic endurance",
                StepQuantity::Duration {
                    minutes: endurance_min,
                },
                2,
            ),
            WorkoutStep::zone("Cool-down", StepQuantity::Duration { minutes: 10 }, 1),
        ]
    };

    WorkoutPlan {
        kind: WorkoutKind::LongRun,
        title: "Long Run".to_owned(),
        distance_km,
        duration_min,
        steps,
    }
}

/// Weekly quality workout; structure is phase-specific. BUILD alternates
/// between threshold tempo and 30/30 `VO2max` intervals via the random source.
fn quality_workout(
    volume: f64,
    phase: TrainingPhase,
    profile: &UserProfile,
    rng: &mut impl Rng,
) -> WorkoutPlan {
    let quality_km = volume * 0.20;
    match phase {
        TrainingPhase::Base => WorkoutPlan {
            kind: WorkoutKind::Intervals,
            title: "Fartlek / Hills".to_owned(),
            distance_km: quality_km,
            duration_min: 50,
            steps: vec![
                WorkoutStep::zone("Warm-up", StepQuantity::Duration { minutes: 20 }, 1),
                WorkoutStep::zone(
                    "Fartlek or hill repeats",
                    StepQuantity::Duration { minutes: 20 },
                    4,
                ),
                WorkoutStep::zone("Cool-down", StepQuantity::Duration { minutes: 10 }, 1),
            ],
        },
        TrainingPhase::Build => {
            if rng.gen_range(0..2) == 0 {
                WorkoutPlan {
                    kind: WorkoutKind::Intervals,
                    title: "Threshold (Tempo)".to_owned(),
                    distance_km: quality_km,
                    duration_min: 60,
                    steps: vec![
                        WorkoutStep::zone("Warm-up", StepQuantity::Duration { minutes: 20 }, 1),
                        WorkoutStep::zone(
                            "3x 8-10 min at threshold",
                            StepQuantity::Duration { minutes: 30 },
                            4,
                        ),
                        WorkoutStep::zone("Cool-down", StepQuantity::Duration { minutes: 10 }, 1),
                    ],
                }
            } else {
                WorkoutPlan {
                    kind: WorkoutKind::Intervals,
                    title: "VO2max (30/30)".to_owned(),
                    distance_km: quality_km,
                    duration_min: 60,
                    steps: vec![
                        WorkoutStep::zone("Warm-up", StepQuantity::Duration { minutes: 20 }, 1),
                        WorkoutStep::zone("Drills", StepQuantity::Duration { minutes: 5 }, 2),
                        WorkoutStep::zone(
                            "2 sets of 10x 30\"/30\"",
                            StepQuantity::Duration { minutes: 20 },
                            5,
                        ),
                        WorkoutStep::zone("Cool-down", StepQuantity::Duration { minutes: 10 }, 1),
                    ],
                }
            }
        }
        TrainingPhase::Specific => target_pace_workout(quality_km, profile),
        TrainingPhase::Taper => WorkoutPlan {
            kind: WorkoutKind::Intervals,
            title: "Speed Reminder".to_owned(),
            distance_km: quality_km * 0.7,
            duration_min: 45,
            steps: vec![
                WorkoutStep::zone("Warm-up", StepQuantity::Duration { minutes: 15 }, 1),
                WorkoutStep::zone(
                    "6x 400 m at 5K effort",
                    StepQuantity::Duration { minutes: 20 },
                    5,
                ),
                WorkoutStep::zone("Cool-down", StepQuantity::Duration { minutes: 10 }, 1),
            ],
        },
    }
}

/// SPECIFIC-phase goal-pace workout, bracketed by goal distance:
/// repeats for 10K goals, long intervals for half marathons, a capped
/// marathon-pace tempo otherwise.
fn target_pace_workout(quality_km: f64, profile: &UserProfile) -> WorkoutPlan {
    let pace = profile.target_pace_min_per_km();
    let pace_str = crate::models::format_pace(pace);

    if profile.goal_distance_km <= 10.5 {
        WorkoutPlan {
            kind: WorkoutKind::Intervals,
            title: "10K Pace".to_owned(),
            distance_km: quality_km,
            duration_min: 65,
            steps: vec![
                WorkoutStep::zone("Warm-up", StepQuantity::Duration { minutes: 15 }, 2),
                WorkoutStep::pace(
                    format!("4x 2000 m at {pace_str}"),
                    StepQuantity::Duration { minutes: 35 },
                    pace_str.clone(),
                ),
                WorkoutStep::zone("Cool-down", StepQuantity::Duration { minutes: 10 }, 1),
            ],
        }
    } else if profile.goal_distance_km <= 22.0 {
        WorkoutPlan {
            kind: WorkoutKind::Intervals,
            title: "Half-Marathon Pace".to_owned(),
            distance_km: quality_km,
            duration_min: 70,
            steps: vec![
                WorkoutStep::zone("Warm-up", StepQuantity::Duration { minutes: 15 }, 2),
                WorkoutStep::pace(
                    format!("3x 5 km at {pace_str}"),
                    StepQuantity::Duration {
                        minutes: (15.0 * pace).max(0.0) as u32,
                    },
                    pace_str.clone(),
                ),
                WorkoutStep::zone("Cool-down", StepQuantity::Duration { minutes: 10 }, 1),
            ],
        }
    } else {
        let tempo_km = (quality_km * 1.5).min(20.0);
        let tempo_min = (tempo_km * pace).max(0.0) as u32;
        WorkoutPlan {
            kind: WorkoutKind::LongRun,
            title: "Marathon Pace".to_owned(),
            distance_km: tempo_km,
            duration_min: tempo_min,
            steps: vec![
                WorkoutStep::zone("Warm-up", StepQuantity::Duration { minutes: 15 }, 2),
                WorkoutStep::pace(
                    format!("{tempo_km:.0} km at {pace_str}"),
                    StepQuantity::Duration { minutes: tempo_min },
                    pace_str.clone(),
                ),
                WorkoutStep::zone("Cool-down", StepQuantity::Duration { minutes: 10 }, 1),
            ],
        }
    }
}

/// Easy-run filler; sub-structure varies by slot so the week is not three
/// identical jogs.
fn easy_run(slot: u32, phase: TrainingPhase, distance_km: f64, duration_min: u32) -> WorkoutPlan {
    if slot == 1 {
        WorkoutPlan {
            kind: WorkoutKind::EasyRun,
            title: "Easy Run + Strides".to_owned(),
            distance_km,
            duration_min,
            steps: vec![
                WorkoutStep::zone(
                    "Endurance",
                    StepQuantity::Duration {
                        minutes: duration_min.saturating_sub(5),
                    },
                    2,
                ),
                WorkoutStep::zone("5x 80 m strides", StepQuantity::Duration { minutes: 5 }, 4),
            ],
        }
    } else if slot == 2 && phase != TrainingPhase::Taper {
        WorkoutPlan {
            kind: WorkoutKind::EasyRun,
            title: "Progressive Run".to_owned(),
            distance_km,
            duration_min,
            steps: vec![
                WorkoutStep::zone(
                    "Easy",
                    StepQuantity::Duration {
                        minutes: duration_min / 2,
                    },
                    1,
                ),
                WorkoutStep::zone(
                    "Moderate (finish near marathon effort)",
                    StepQuantity::Duration {
                        minutes: duration_min / 2,
                    },
                    2,
                ),
            ],
        }
    } else {
        WorkoutPlan {
            kind: WorkoutKind::Recovery,
            title: "Recovery Jog".to_owned(),
            distance_km,
            duration_min,
            steps: vec![WorkoutStep::zone(
                "Very easy jog (Z1-Z2)",
                StepQuantity::Duration {
                    minutes: duration_min,
                },
                1,
            )],
        }
    }
}

/// Minutes to cover `distance_km` at `speed_kmh`, truncated; 0 when the
/// speed is not positive
fn minutes_at(distance_km: f64, speed_kmh: f64) -> u32 {
    if speed_kmh <= 0.0 {
        return 0;
    }
    (distance_km * 60.0 / speed_kmh).max(0.0) as u32
}

fn format_race_time(time_min: f64) -> String {
    let hours = (time_min / 60.0) as u32;
    let mins = (time_min % 60.0) as u32;
    if hours > 0 {
        format!("{hours}h{mins:02}")
    } else {
        format!("{mins}min")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_weeks_sum_to_total() {
        for total in 1..=40 {
            let p = phase_weeks(total);
            assert_eq!(p.total(), total, "total {total}");
            assert!(p.taper >= 1);
        }
    }

    #[test]
    fn test_riegel_monotonic_in_distance() {
        let t5 = predict_time(16.0, 5.0);
        let t10 = predict_time(16.0, 10.0);
        let t21 = predict_time(16.0, 21.0975);
        assert!(t5 < t10 && t10 < t21);
    }

    #[test]
    fn test_riegel_anchor_returns_base_time() {
        let t = predict_time(15.0, 2.0);
        assert!((t - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_format_race_time() {
        assert_eq!(format_race_time(47.4), "47min");
        assert_eq!(format_race_time(102.3), "1h42");
    }
}
