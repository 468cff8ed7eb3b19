//! Test helper utilities for sandbox tests

use crate::forces::{CENTIMETERS_PER_METER, GRAVITY, UP_SIGN};
use crate::particle::Particle;
use crate::runtime::SimulationResult;
use crate::vector::Vector2;
use std::fs;
use std::path::Path;

/// Check if two floating point values are approximately equal within tolerance
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

/// Check both components of two vectors within tolerance
pub fn approx_eq_vec(a: Vector2, b: Vector2, tol: f64) -> bool {
    approx_eq(a.x, b.x, tol) && approx_eq(a.y, b.y, tol)
}

/// A particle at rest at the origin with unit mass
pub fn free_fall_particle() -> Particle {
    Particle {
        name: Some("ball".to_string()),
        ..Particle::default()
    }
}

/// Closed-form free-fall height in centimeters after `t` seconds from rest
pub fn free_fall_position_cm(t: f64) -> f64 {
    -GRAVITY * UP_SIGN * t * t / 2.0 * CENTIMETERS_PER_METER
}

/// Run a scenario from a file path
pub fn run_scenario_file(
    file: impl AsRef<Path>,
) -> Result<SimulationResult, Box<dyn std::error::Error>> {
    let src = fs::read_to_string(file)?;
    Ok(crate::run_scenario(&src)?)
}

/// Look up a detector value by name
pub fn detector(result: &SimulationResult, name: &str) -> Option<f64> {
    result
        .detectors
        .iter()
        .find(|d| d.name == name)
        .map(|d| d.value)
}

/// Compare two simulation results with tolerance
pub fn results_approx_equal(a: &SimulationResult, b: &SimulationResult, tol: f64) -> bool {
    if a.detectors.len() != b.detectors.len() {
        return false;
    }

    let mut a_sorted: Vec<_> = a.detectors.iter().collect();
    let mut b_sorted: Vec<_> = b.detectors.iter().collect();
    a_sorted.sort_by_key(|d| &d.name);
    b_sorted.sort_by_key(|d| &d.name);

    a_sorted.iter().zip(b_sorted.iter()).all(|(a_det, b_det)| {
        a_det.name == b_det.name && approx_eq(a_det.value, b_det.value, tol)
    })
}
