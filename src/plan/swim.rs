// ABOUTME: Template-based swim session composer - warmup, drills, main set, cooldown
// ABOUTME: Independent of run periodization; styles and session type filter the templates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainlab

//! # Swim Session Generator
//!
//! Composes a swim workout from fixed template pools: a random warmup, two
//! technique drills sampled without repetition, a main set filtered by the
//! requested styles and session type (falling back to type-only, then to the
//! whole pool), an optional kick-set filler when the session runs more than
//! 8 minutes under target, and a fixed cooldown.
//!
//! Distances are recovered from the step descriptions; unparsable tokens
//! contribute 0 m rather than failing the session.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::{StepQuantity, WorkoutKind, WorkoutPlan, WorkoutStep};
use crate::physiological_constants::session::DEFAULT_POOL_LENGTH_M;

/// Swim stroke styles selectable for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwimStyle {
    Crawl,
    Breaststroke,
    Backstroke,
    Butterfly,
    /// Individual medley / all four strokes
    Mixed,
    /// Technique-only work
    Drills,
}

/// Requested session emphasis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwimSessionType {
    Endurance,
    Technique,
    Speed,
    Recovery,
}

impl SwimSessionType {
    fn label(self) -> &'static str {
        match self {
            Self::Endurance => "Endurance",
            Self::Technique => "Technique",
            Self::Speed => "Speed",
            Self::Recovery => "Recovery",
        }
    }
}

/// Session sizing target. A distance target is converted to minutes at a
/// conservative 2:30 per 100 m including rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwimTarget {
    /// Target duration in minutes
    DurationMin(u32),
    /// Target distance in meters
    DistanceM(u32),
}

impl SwimTarget {
    fn minutes(self) -> u32 {
        match self {
            Self::DurationMin(min) => min,
            Self::DistanceM(meters) => (f64::from(meters) / 1000.0 * 25.0) as u32,
        }
    }
}

struct MainSet {
    name: &'static str,
    session_type: SwimSessionType,
    style: SwimStyle,
    description: &'static str,
    minutes: u32,
    zone: u8,
}

const MAIN_SETS: [MainSet; 8] = [
    MainSet {
        name: "Pyramid",
        session_type: SwimSessionType::Endurance,
        style: SwimStyle::Crawl,
        description: "Pyramid: 100/200/300/200/100m freestyle (tempo)",
        minutes: 16,
        zone: 3,
    },
    MainSet {
        name: "Long Blocks",
        session_type: SwimSessionType::Endurance,
        style: SwimStyle::Crawl,
        description: "3x 400m freestyle with pull buoy (manage fatigue)",
        minutes: 18,
        zone: 3,
    },
    MainSet {
        name: "Mixed Endurance",
        session_type: SwimSessionType::Endurance,
        style: SwimStyle::Mixed,
        description: "400m IM / 400m freestyle / 400m main stroke",
        minutes: 22,
        zone: 3,
    },
    MainSet {
        name: "Lactate Sprints",
        session_type: SwimSessionType::Speed,
        style: SwimStyle::Crawl,
        description: "12x 50m freestyle MAX (45s rest)",
        minutes: 15,
        zone: 5,
    },
    MainSet {
        name: "Mixed Speed",
        session_type: SwimSessionType::Speed,
        style: SwimStyle::Mixed,
        description: "16x 25m fast (IM order)",
        minutes: 12,
        zone: 5,
    },
    MainSet {
        name: "Power",
        session_type: SwimSessionType::Speed,
        style: SwimStyle::Butterfly,
        description: "8x 25m dynamic butterfly",
        minutes: 8,
        zone: 5,
    },
    MainSet {
        name: "Distance Efficiency",
        session_type: SwimSessionType::Technique,
        style: SwimStyle::Crawl,
        description: "10x 100m freestyle (focus on stroke count)",
        minutes: 18,
        zone: 2,
    },
    MainSet {
        name: "Breaststroke Glide",
        session_type: SwimSessionType::Technique,
        style: SwimStyle::Breaststroke,
        description: "5x 100m breaststroke (maximum glide)",
        minutes: 15,
        zone: 2,
    },
];

const CRAWL_DRILLS: [&str; 5] = [
    "catch-up",
    "closed fists",
    "shoulder tap",
    "thigh brush",
    "side kick",
];
const BREASTSTROKE_DRILLS: [&str; 4] = [
    "2 kicks / 1 pull",
    "breaststroke arms with flutter kick",
    "long glides",
    "scissor kick on back",
];
const BACKSTROKE_DRILLS: [&str; 4] = [
    "single arm",
    "exaggerated roll",
    "kick only, no arms",
    "double-arm backstroke",
];
const BUTTERFLY_DRILLS: [&str; 3] = [
    "side undulation",
    "2 left / 2 right / 2 full strokes",
    "deep dolphin kick",
];

/// Generate a swim workout.
///
/// Always returns a workout with a non-empty step list and a positive total
/// duration, whatever the styles/target combination.
#[must_use]
pub fn generate_session(
    styles: &[SwimStyle],
    target: SwimTarget,
    session_type: SwimSessionType,
    rng: &mut impl Rng,
) -> WorkoutPlan {
    let target_min = target.minutes();
    let mut steps: Vec<WorkoutStep> = Vec::new();
    let mut current_min: u32 = 0;

    // Warmup, 7-12 min
    let warmups: [&[(&str, u32, u8)]; 3] = [
        &[
            ("Warm-up: 200m easy, stroke of choice", 5, 1),
            ("150m (50m back / 50m breast / 50m free)", 4, 1),
        ],
        &[
            ("Warm-up: 300m bilateral freestyle", 6, 1),
            ("4x 50m build 1 to 4", 5, 3),
        ],
        &[
            ("Warm-up: 200m choice", 4, 1),
            ("200m with pull buoy (breathe 3/5/7)", 5, 2),
        ],
    ];
    if let Some(warmup) = warmups.choose(rng) {
        for &(descr, minutes, zone) in *warmup {
            steps.push(WorkoutStep::zone(
                descr,
                StepQuantity::Duration { minutes },
                zone,
            ));
            current_min += minutes;
        }
    }

    // Two technique drills, sampled without repetition
    let tech_style = if styles.contains(&SwimStyle::Mixed) {
        SwimStyle::Crawl
    } else {
        styles.choose(rng).copied().unwrap_or(SwimStyle::Crawl)
    };
    let pool: &[&str] = match tech_style {
        SwimStyle::Breaststroke => &BREASTSTROKE_DRILLS,
        SwimStyle::Backstroke => &BACKSTROKE_DRILLS,
        SwimStyle::Butterfly => &BUTTERFLY_DRILLS,
        _ => &CRAWL_DRILLS,
    };
    for (i, drill) in pool.choose_multiple(rng, 2).enumerate() {
        steps.push(WorkoutStep::zone(
            format!("Drill {}: 4x 50m {drill}", i + 1),
            StepQuantity::Duration { minutes: 6 },
            2,
        ));
        current_min += 6;
    }

    // Main set: styles ∩ type, then type-only, then the whole pool
    let by_style_and_type: Vec<&MainSet> = MAIN_SETS
        .iter()
        .filter(|t| {
            (styles.contains(&SwimStyle::Mixed) || styles.contains(&t.style))
                && t.session_type == session_type
        })
        .collect();
    let candidates = if by_style_and_type.is_empty() {
        let by_type: Vec<&MainSet> = MAIN_SETS
            .iter()
            .filter(|t| t.session_type == session_type)
            .collect();
        if by_type.is_empty() {
            MAIN_SETS.iter().collect()
        } else {
            by_type
        }
    } else {
        by_style_and_type
    };
    let mut main_name = "Open Swim";
    if let Some(main) = candidates.choose(rng) {
        main_name = main.name;
        steps.push(WorkoutStep::zone(
            main.description,
            StepQuantity::Duration {
                minutes: main.minutes,
            },
            main.zone,
        ));
        current_min += main.minutes;
    }

    // Filler leg set when well under target
    if current_min + 8 < target_min {
        steps.push(WorkoutStep::zone(
            "Kick set (with board): 200m",
            StepQuantity::Duration { minutes: 6 },
            4,
        ));
        current_min += 6;
    }

    // Fixed cooldown
    steps.push(WorkoutStep::zone(
        "Cool-down: 100m back/breast",
        StepQuantity::Duration { minutes: 4 },
        1,
    ));
    steps.push(WorkoutStep::zone(
        "100m easy swim",
        StepQuantity::Duration { minutes: 3 },
        1,
    ));
    current_min += 7;

    let distance_km: f64 = steps.iter().map(|s| parse_distance_km(&s.description)).sum();

    WorkoutPlan {
        kind: WorkoutKind::Swim,
        title: format!("Swim {} - {main_name}", session_type.label()),
        distance_km,
        duration_min: current_min,
        steps,
    }
}

/// Recover total distance (km) from a free-text step description.
///
/// Supports repeat notation ("12x 50m"), pyramid chains ("100/200/300m") and
/// plain "200m" tokens; anything unrecognized contributes 0.
#[must_use]
pub fn parse_distance_km(description: &str) -> f64 {
    let lower = description.to_lowercase();
    if let Some((count_part, dist_part)) = lower.split_once('x') {
        let count: u32 = count_part
            .chars()
            .filter(char::is_ascii_digit)
            .collect::<String>()
            .parse()
            .unwrap_or(1);
        let dist: u32 = dist_part
            .trim()
            .chars()
            .take_while(char::is_ascii_digit)
            .collect::<String>()
            .parse()
            .unwrap_or(0);
        return f64::from(count * dist) / 1000.0;
    }

    let mut total_m: u32 = 0;
    for raw in lower.split(TOKEN_SEPARATORS) {
        let token = raw.trim();
        if token.is_empty() {
            continue;
        }
        if let Some(body) = token.strip_suffix('m') {
            if !body.is_empty() && body.chars().all(|c| c.is_ascii_digit()) {
                total_m += body.parse::<u32>().unwrap_or(0);
            }
        } else if token.chars().all(|c| c.is_ascii_digit()) {
            // part of a pyramid chain like "100/200/300m"
            total_m += token.parse::<u32>().unwrap_or(0);
        }
    }
    f64::from(total_m) / 1000.0
}

const TOKEN_SEPARATORS: [char; 4] = [' ', '/', '(', ')'];

/// Number of pool lengths covered by a distance, at the default 25 m pool
#[must_use]
pub fn pool_lengths(distance_m: f64) -> f64 {
    distance_m / DEFAULT_POOL_LENGTH_M
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_parse_repeat_notation() {
        assert!((parse_distance_km("12x 50m freestyle MAX (45s rest)") - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_parse_pyramid_chain() {
        assert!((parse_distance_km("Pyramid: 100/200/300/200/100m crawl") - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_parse_unrecognized_is_zero() {
        assert!(parse_distance_km("easy swimming, feel the water").abs() < 1e-9);
    }

    #[test]
    fn test_session_always_has_steps_and_duration() {
        let mut rng = StdRng::seed_from_u64(7);
        for session_type in [
            SwimSessionType::Endurance,
            SwimSessionType::Technique,
            SwimSessionType::Speed,
            SwimSessionType::Recovery,
        ] {
            let w = generate_session(
                &[SwimStyle::Crawl],
                SwimTarget::DurationMin(45),
                session_type,
                &mut rng,
            );
            assert!(!w.steps.is_empty());
            assert!(w.duration_min > 0);
        }
    }

    #[test]
    fn test_distance_target_converts_to_minutes() {
        assert_eq!(SwimTarget::DistanceM(2000).minutes(), 50);
    }

    #[test]
    fn test_style_filter_falls_back_when_no_match() {
        // Backstroke has no dedicated main set for any type; the generator
        // must still produce a session.
        let mut rng = StdRng::seed_from_u64(11);
        let w = generate_session(
            &[SwimStyle::Backstroke],
            SwimTarget::DurationMin(40),
            SwimSessionType::Speed,
            &mut rng,
        );
        assert!(!w.steps.is_empty());
    }
}
