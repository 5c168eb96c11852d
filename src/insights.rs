// ABOUTME: Rule engine turning one activity's metrics into human-readable insights
// ABOUTME: Independent one-shot rules over science metrics, dynamics, environment, RPE
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainlab

//! # Insight Rule Engine
//!
//! Evaluates a fixed set of independent rules against one activity and its
//! derived [`ScientificMetrics`](crate::session_science::ScientificMetrics).
//! Each triggered rule yields one [`Insight`]; rules never suppress each
//! other, so a session can collect several at once.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analytics::{
    aerobic_decoupling, analyze_pace_consistency, detect_fatigue, hr_drift, FatigueLevel,
};
use crate::models::{CompletedActivity, Sport, TrainingPlanResult};
use crate::physiological_constants::{insight_thresholds as thr, session};
use crate::session_science::calculate_science;

/// Insight category tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsightKind {
    Efficiency,
    Effectiveness,
    TrainingLoad,
    RunningForm,
    SwimTechnique,
    Pacing,
    Cadence,
    HeartRate,
    Endurance,
    Environment,
    Effort,
    Fatigue,
}

/// One human-readable observation about a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    /// Short headline
    pub title: String,
    /// Advisory sentence with the triggering value
    pub message: String,
    /// Category tag
    pub kind: InsightKind,
    /// Whether this reads as praise rather than a caution
    pub positive: bool,
}

impl Insight {
    fn new(kind: InsightKind, positive: bool, title: &str, message: String) -> Self {
        Self {
            title: title.to_owned(),
            message,
            kind,
            positive,
        }
    }
}

/// Run every rule against an activity.
///
/// The plan, when available, supplies pace zones and the athlete's VMA for
/// pacing insights; without it, a fixed fast-pace rule stands in.
#[must_use]
pub fn analyze(activity: &CompletedActivity, plan: Option<&TrainingPlanResult>) -> Vec<Insight> {
    let metrics = calculate_science(activity, plan);
    let mut insights = Vec::new();

    if let Some(ef) = metrics.efficiency_factor {
        if ef > thr::EF_HIGH {
            insights.push(Insight::new(
                InsightKind::Efficiency,
                true,
                "Excellent aerobic efficiency",
                format!("Efficiency factor of {ef:.2} m/min per bpm shows strong aerobic fitness."),
            ));
        } else if ef < thr::EF_LOW && ef > 0.0 {
            insights.push(Insight::new(
                InsightKind::Efficiency,
                false,
                "Low aerobic efficiency",
                format!(
                    "Efficiency factor of {ef:.2} m/min per bpm; more easy aerobic volume should raise it."
                ),
            ));
        }
    }

    if let Some(re) = metrics.running_effectiveness {
        if re > thr::RE_HIGH {
            insights.push(Insight::new(
                InsightKind::Effectiveness,
                true,
                "Excellent running effectiveness",
                format!("{re:.2} (m/s)/(W/kg) - power converts to speed very well."),
            ));
        } else if re < thr::RE_LOW {
            insights.push(Insight::new(
                InsightKind::Effectiveness,
                false,
                "Poor running effectiveness",
                format!("{re:.2} (m/s)/(W/kg) - form drills could improve power transfer."),
            ));
        }
    }

    if let Some(rtss) = metrics.r_tss {
        let rtss_f = f64::from(rtss);
        if rtss_f > thr::RTSS_VERY_HIGH {
            insights.push(Insight::new(
                InsightKind::TrainingLoad,
                false,
                "Very demanding session",
                format!("rTSS of {rtss} - plan at least two easy days before the next hard effort."),
            ));
        } else if rtss_f > thr::RTSS_HIGH {
            insights.push(Insight::new(
                InsightKind::TrainingLoad,
                true,
                "Solid training load",
                format!("rTSS of {rtss} - a productive stimulus without excessive strain."),
            ));
        }
    }

    if activity.sport == Sport::Run {
        run_form_insights(activity, &mut insights);
        pacing_insight(activity, plan, &mut insights);
        cadence_insight(activity, &mut insights);
        hr_insight(activity, &mut insights);
        fatigue_insight(activity, &mut insights);
    }

    if activity.sport == Sport::Swim {
        swim_insights(activity, metrics.swolf, &mut insights);
    }

    if let Some(temp) = activity.avg_temp_c {
        if temp > thr::AMBIENT_TEMP_HIGH_C {
            insights.push(Insight::new(
                InsightKind::Environment,
                false,
                "Hot conditions",
                format!(
                    "{temp:.0} deg C ambient; heart rate ran higher than the effort warranted."
                ),
            ));
        }
    }

    if activity.duration_min > thr::LONG_DURATION_MIN {
        insights.push(Insight::new(
            InsightKind::Endurance,
            true,
            "Long endurance session",
            format!(
                "{} of continuous work builds aerobic durability.",
                crate::models::format_duration(activity.duration_min)
            ),
        ));
    }

    if let Some(rpe) = activity.rpe {
        if rpe > thr::RPE_VERY_HARD {
            insights.push(Insight::new(
                InsightKind::Effort,
                false,
                "Very hard perceived effort",
                format!("RPE {rpe}/10 - make sure the next sessions allow recovery."),
            ));
        } else if rpe < thr::RPE_EASY {
            insights.push(Insight::new(
                InsightKind::Effort,
                true,
                "Genuinely easy session",
                format!("RPE {rpe}/10 - exactly what an easy day should feel like."),
            ));
        }
    }

    debug!(count = insights.len(), sport = ?activity.sport, "insight rules evaluated");
    insights
}

fn run_form_insights(activity: &CompletedActivity, insights: &mut Vec<Insight>) {
    if let Some(gct) = activity.avg_gct_ms {
        if gct > thr::GCT_HIGH_MS {
            insights.push(Insight::new(
                InsightKind::RunningForm,
                false,
                "Long ground contact time",
                format!("{gct:.0} ms average; cadence or strength work can shorten it."),
            ));
        }
    }
    if let Some(vr) = activity.vertical_ratio {
        if vr > thr::VERTICAL_RATIO_HIGH {
            insights.push(Insight::new(
                InsightKind::RunningForm,
                false,
                "High vertical ratio",
                format!("{vr:.1}% of each stride goes into bounce rather than forward motion."),
            ));
        }
    }
}

fn pacing_insight(
    activity: &CompletedActivity,
    plan: Option<&TrainingPlanResult>,
    insights: &mut Vec<Insight>,
) {
    if activity.duration_min == 0 || activity.distance_km <= 0.0 {
        return;
    }
    let speed_kmh = activity.distance_km / (f64::from(activity.duration_min) / 60.0);

    if let Some(plan) = plan {
        let zone = plan
            .speed_zones
            .iter()
            .position(|z| speed_kmh >= z.min_kmh && speed_kmh < z.max_kmh)
            .map(|i| i + 1);
        let (positive, title, detail) = match zone {
            Some(2) => (true, "Endurance pace", "ideal for building the aerobic base"),
            Some(3) => (true, "Tempo pace", "comfortably hard, right for threshold work"),
            Some(4) => (false, "Threshold pace", "demanding; keep these sessions deliberate"),
            Some(5) => (false, "VO2max pace", "near-maximal running; dose it sparingly"),
            _ => return,
        };
        insights.push(Insight::new(
            InsightKind::Pacing,
            positive,
            title,
            format!("Average speed {speed_kmh:.1} km/h sits in zone - {detail}."),
        ));
    } else {
        let pace_min_km = 60.0 / speed_kmh;
        if pace_min_km < 4.5 {
            insights.push(Insight::new(
                InsightKind::Pacing,
                true,
                "Fast pace",
                format!(
                    "{} average pace with no plan on file - consider setting one up.",
                    crate::models::format_pace(pace_min_km)
                ),
            ));
        }
    }
}

fn cadence_insight(activity: &CompletedActivity, insights: &mut Vec<Insight>) {
    let Some(cadence) = activity.avg_cadence else {
        return;
    };
    if cadence >= thr::CADENCE_HIGH {
        insights.push(Insight::new(
            InsightKind::Cadence,
            true,
            "Optimal cadence",
            format!("{cadence} spm keeps ground contact short and impact low."),
        ));
    } else if cadence < thr::CADENCE_LOW {
        insights.push(Insight::new(
            InsightKind::Cadence,
            false,
            "Low cadence",
            format!("{cadence} spm; shorter, quicker strides reduce overstriding."),
        ));
    }
}

fn hr_insight(activity: &CompletedActivity, insights: &mut Vec<Insight>) {
    let Some(avg_hr) = activity.avg_hr else {
        return;
    };
    if avg_hr > thr::AVG_HR_HIGH {
        insights.push(Insight::new(
            InsightKind::HeartRate,
            false,
            "High-intensity session",
            format!("Average {avg_hr} bpm; balance it with easy aerobic days."),
        ));
    } else if avg_hr < thr::AVG_HR_LOW {
        insights.push(Insight::new(
            InsightKind::HeartRate,
            true,
            "Good aerobic-zone work",
            format!("Average {avg_hr} bpm - low-intensity volume done right."),
        ));
    }
}

fn fatigue_insight(activity: &CompletedActivity, insights: &mut Vec<Insight>) {
    let drift = hr_drift(&activity.hr_samples);
    let pace_cv = analyze_pace_consistency(&activity.splits).cv_percent;
    let decoupling = aerobic_decoupling(
        &activity.hr_samples,
        &activity.splits,
        &activity.speed_samples,
    );
    let fatigue = detect_fatigue(drift, pace_cv, decoupling);
    if fatigue.level == FatigueLevel::Low {
        return;
    }
    let label = if fatigue.level == FatigueLevel::High {
        "High fatigue signs"
    } else {
        "Moderate fatigue signs"
    };
    insights.push(Insight::new(
        InsightKind::Fatigue,
        false,
        label,
        fatigue.indicators.join(" "),
    ));
}

fn swim_insights(activity: &CompletedActivity, swolf: Option<u32>, insights: &mut Vec<Insight>) {
    if let Some(swolf) = swolf {
        if swolf < thr::SWOLF_EXCELLENT {
            insights.push(Insight::new(
                InsightKind::SwimTechnique,
                true,
                "Excellent swim efficiency",
                format!("SWOLF {swolf} - speed and stroke economy are well balanced."),
            ));
        } else if swolf > thr::SWOLF_POOR {
            insights.push(Insight::new(
                InsightKind::SwimTechnique,
                false,
                "Swim efficiency to improve",
                format!("SWOLF {swolf}; technique drills will bring it down."),
            ));
        }
    }

    if let Some(strokes) = activity.total_strokes {
        let dist_m = activity.distance_km * 1000.0;
        let lengths = dist_m / session::DEFAULT_POOL_LENGTH_M;
        if lengths >= 1.0 {
            let per_length = f64::from(strokes) / lengths;
            if per_length > thr::STROKES_PER_LENGTH_HIGH {
                insights.push(Insight::new(
                    InsightKind::SwimTechnique,
                    false,
                    "High stroke count",
                    format!("{per_length:.0} strokes per length; work on glide and catch."),
                ));
            } else if per_length < thr::STROKES_PER_LENGTH_LOW {
                insights.push(Insight::new(
                    InsightKind::SwimTechnique,
                    true,
                    "Efficient glide",
                    format!("{per_length:.0} strokes per length shows a long, relaxed stroke."),
                ));
            }
        }
    }

    if let Some(breakout) = activity.breakout_speed_mps {
        let session_speed = activity.avg_speed_mps();
        if session_speed > 0.0 && breakout < session_speed {
            insights.push(Insight::new(
                InsightKind::SwimTechnique,
                false,
                "Slow breakouts",
                format!(
                    "Breakout speed {breakout:.2} m/s is below the session average of {session_speed:.2} m/s; push-offs and underwater phases are costing time."
                ),
            ));
        }
    }
}
