// ABOUTME: Elevation analytics - VAM climb-rate series and AeroLab virtual elevation
// ABOUTME: Physics-balance model with fixed CdA/Crr placeholder coefficients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainlab

//! Climb-rate and virtual-elevation analysis.

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};
use crate::models::{ElevationSample, PowerSample, SpeedSample};
use crate::physiological_constants::elevation_analysis as consts;

/// One climb-rate sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VamPoint {
    /// Seconds since activity start
    pub offset_sec: u32,
    /// Climb rate in vertical meters per hour, floored at 0
    pub vam_m_per_h: f64,
}

/// VAM (vertical ascent speed) series over a 30 s backward window.
///
/// Needs at least 5 elevation samples; descending stretches read as 0.
#[must_use]
pub fn vam_series(elevation_samples: &[ElevationSample]) -> Vec<VamPoint> {
    if elevation_samples.len() < 5 {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(elevation_samples.len());
    for (i, current) in elevation_samples.iter().enumerate() {
        let floor = current.offset_sec.saturating_sub(consts::VAM_WINDOW_SEC);
        let back_idx = elevation_samples
            .iter()
            .position(|s| s.offset_sec >= floor)
            .unwrap_or(0);
        if back_idx < i {
            let prev = &elevation_samples[back_idx];
            let dt = f64::from(current.offset_sec - prev.offset_sec);
            if dt > 0.0 {
                let vam = (current.altitude_m - prev.altitude_m) / dt * 3600.0;
                result.push(VamPoint {
                    offset_sec: current.offset_sec,
                    vam_m_per_h: vam.max(0.0),
                });
                continue;
            }
        }
        result.push(VamPoint {
            offset_sec: current.offset_sec,
            vam_m_per_h: 0.0,
        });
    }
    result
}

/// Virtual-elevation reconstruction (Chung method).
///
/// `CdA` and `Crr` are fixed constants rather than fitted parameters; the result
/// echoes them so a future fitting procedure can replace this placeholder
/// model without changing the shape of the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AeroLabResult {
    /// Drag area used (m^2)
    pub cda: f64,
    /// Rolling-resistance coefficient used
    pub crr: f64,
    /// Reconstructed elevation profile in meters
    pub virtual_elevation: Vec<f64>,
    /// Recorded elevation profile in meters
    pub actual_elevation: Vec<f64>,
}

/// Reconstruct a virtual elevation profile from power and speed.
///
/// Per sample, the power left after aerodynamic drag
/// (`0.5 * rho * CdA * v^3`) and rolling resistance (`Crr * m * g * v`) is
/// attributed to gravity, giving an implied height change. Air density
/// comes from ambient temperature and pressure. Samples below 0.5 m/s are
/// carried through unchanged to avoid low-speed noise.
///
/// # Errors
///
/// Returns `INVALID_INPUT` for a non-positive system mass and
/// `VALUE_OUT_OF_RANGE` for a temperature at or below absolute zero or a
/// non-positive pressure.
pub fn aero_lab(
    power_samples: &[PowerSample],
    speed_samples: &[SpeedSample],
    actual_elevation: &[f64],
    mass_kg: f64,
    temp_c: f64,
    pressure_mbar: f64,
) -> AppResult<AeroLabResult> {
    if mass_kg <= 0.0 {
        return Err(AppError::invalid_input("system mass must be positive"));
    }
    if temp_c <= -273.15 {
        return Err(AppError::out_of_range(
            "temperature must be above absolute zero",
        ));
    }
    if pressure_mbar <= 0.0 {
        return Err(AppError::out_of_range("pressure must be positive"));
    }
    let rho = pressure_mbar * 100.0 / (consts::AIR_GAS_CONSTANT * (temp_c + 273.15));

    let mut virtual_elevation = Vec::with_capacity(power_samples.len());
    let mut current = actual_elevation.first().copied().unwrap_or(0.0);
    if !power_samples.is_empty() {
        virtual_elevation.push(current);
    }

    for (i, sample) in power_samples.iter().enumerate().skip(1) {
        let dt = 1.0;
        let v = speed_samples.get(i).map_or(0.0, |s| s.mps);
        if v > 0.5 {
            let p_drag = 0.5 * rho * consts::AEROLAB_CDA * v.powi(3);
            let p_roll = consts::AEROLAB_CRR * mass_kg * consts::GRAVITY * v;
            let p_gravity = sample.watts - p_drag - p_roll;
            current += p_gravity / (mass_kg * consts::GRAVITY) * dt;
        }
        virtual_elevation.push(current);
    }

    Ok(AeroLabResult {
        cda: consts::AEROLAB_CDA,
        crr: consts::AEROLAB_CRR,
        virtual_elevation,
        actual_elevation: actual_elevation.to_vec(),
    })
}
