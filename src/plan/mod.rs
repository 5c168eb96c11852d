// ABOUTME: Plan generation - periodized running plans and template-based swim sessions
// ABOUTME: Re-exports the scheduler and swim generator entry points
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainlab

//! Training plan generation.

pub mod scheduler;
pub mod swim;

pub use scheduler::{
    generate_plan, generate_recovery_plan, phase_weeks, predict_race_times, predict_time,
};
pub use swim::{generate_session, SwimSessionType, SwimStyle, SwimTarget};
