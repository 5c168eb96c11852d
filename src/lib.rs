// ABOUTME: Main library entry point for the Trainlab training-science engine
// ABOUTME: Plan generation, time-series analytics, longitudinal load and insight rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainlab

#![deny(unsafe_code)]

//! # Trainlab
//!
//! A training-science library for endurance athletes. From a small athlete
//! profile it derives physiological markers, builds a periodized running
//! plan with generated swim sessions, and analyzes recorded activities both
//! in isolation and over time.
//!
//! ## Features
//!
//! - **Physiology**: Tanaka max HR, Uth-Sorensen-Overgaard-Pedersen `VO2max`,
//!   Karvonen heart-rate zones, speed and running-power zones
//! - **Plan generation**: four-phase periodization (base, build, specific,
//!   taper), weekly session scheduling, Riegel race-time predictions,
//!   recovery-block and swim-session generators
//! - **Time-series analytics**: HR anomalies and drift, aerobic decoupling,
//!   grade-adjusted pace, power curves and W' balance, quadrant analysis,
//!   interval discovery, VAM and virtual elevation
//! - **Longitudinal load**: CTL/ATL/TSB, ACWR, performance-management
//!   chart, Eddington number, streaks
//! - **Session science and insights**: TRIMP, efficiency factor, running
//!   effectiveness, `rTSS`/RSS, swim stroke metrics, and a rule engine that
//!   turns metrics into advice
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chrono::{Duration, Utc};
//! use trainlab::models::{Sex, UserProfile};
//! use trainlab::plan::generate_plan;
//!
//! let profile = UserProfile {
//!     age: 30,
//!     sex: Sex::Male,
//!     weight_kg: 70.0,
//!     resting_hr: 60,
//!     current_weekly_km: 30.0,
//!     goal_distance_km: 10.0,
//!     goal_time_min: 45.0,
//!     race_date: Utc::now() + Duration::weeks(12),
//! };
//! let mut rng = rand::thread_rng();
//! let plan = generate_plan(&profile, Utc::now(), &mut rng);
//! println!("peak week: {:.0} km", plan.safe_peak_volume_km);
//! ```

pub mod analytics;
pub mod errors;
pub mod insights;
pub mod models;
pub mod physiological_constants;
pub mod physiology;
pub mod plan;
pub mod session_science;
pub mod training_load;

pub use errors::{AppError, AppResult, ErrorCode};
pub use physiology::PhysiologySnapshot;
