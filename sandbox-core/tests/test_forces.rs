//! Unit tests for the gravity and air drag force model

use sandbox_core::forces::{
    Force, ForceConfig, ForceModel, DRAG_COEFFICIENT, FLUID_DENSITY, GRAVITY, UP_SIGN,
};
use sandbox_core::tests::test_helpers::approx_eq;
use sandbox_core::{accumulate_forces, Particle, Vector2};
use std::f64::consts::PI;

fn drag_coeff(radius_cm: f64) -> f64 {
    let r = radius_cm / 100.0;
    -0.5 * DRAG_COEFFICIENT * PI * r * r * FLUID_DENSITY
}

#[test]
fn test_gravity_points_down_the_screen() {
    let g = Force::Gravity { g: GRAVITY }.evaluate(&Particle::default());
    assert_eq!(g, Vector2::new(0.0, -GRAVITY * UP_SIGN));
    assert!(g.y > 0.0, "y grows downward, so gravity is positive");
}

#[test]
fn test_gravity_only_acceleration() {
    let model = ForceModel::gravity_only();
    let mut p = Particle::default();
    let a = model.accumulate(&mut p);
    assert_eq!(a, Vector2::new(0.0, 9.81));
    assert_eq!(p.forces, Vector2::new(0.0, 9.81));
}

#[test]
fn test_acceleration_divides_by_mass() {
    let model = ForceModel::gravity_only();
    let mut p = Particle {
        mass: 2.0,
        ..Particle::default()
    };
    let a = model.accumulate(&mut p);
    assert!(approx_eq(a.y, 4.905, 1e-12));
}

#[test]
fn test_no_drag_when_vertical_velocity_is_zero() {
    let drag = Force::AirDrag {
        drag_coefficient: DRAG_COEFFICIENT,
        fluid_density: FLUID_DENSITY,
    };
    let p = Particle {
        velocity: Vector2::new(5.0, 0.0),
        ..Particle::default()
    };
    let f = drag.evaluate(&p);
    assert_eq!(f, Vector2::ZERO);

    let mut p = p;
    let a = accumulate_forces(&mut p);
    assert_eq!(a, Vector2::new(0.0, 9.81));
}

#[test]
fn test_drag_opposes_vertical_motion() {
    let coeff = drag_coeff(25.0);
    let mut falling = Particle {
        velocity: Vector2::new(0.0, 10.0),
        ..Particle::default()
    };
    let a = accumulate_forces(&mut falling);
    assert!(approx_eq(a.y, 9.81 + coeff * 100.0, 1e-9));
    assert!(a.y < 9.81);
    assert_eq!(a.x, 0.0);

    let mut rising = Particle {
        velocity: Vector2::new(0.0, -10.0),
        ..Particle::default()
    };
    let a = accumulate_forces(&mut rising);
    assert!(approx_eq(a.y, 9.81 - coeff * 100.0, 1e-9));
    assert!(a.y > 9.81);
}

#[test]
fn test_drag_ignores_horizontal_velocity() {
    let mut p = Particle {
        velocity: Vector2::new(100.0, 0.0),
        ..Particle::default()
    };
    let a = accumulate_forces(&mut p);
    assert_eq!(a.x, 0.0);
}

#[test]
fn test_drag_is_applied_per_mass_twice() {
    // Drag is divided by mass inside the generator and again by the accumulator
    let coeff = drag_coeff(25.0);
    let model = ForceModel::new(&ForceConfig {
        gravity: 0.0,
        ..ForceConfig::default()
    });
    let mut p = Particle {
        velocity: Vector2::new(0.0, 2.0),
        mass: 2.0,
        ..Particle::default()
    };
    let a = model.accumulate(&mut p);
    assert!(approx_eq(a.y, coeff * 4.0 / 4.0, 1e-12));
}

#[test]
fn test_nan_drag_is_replaced_with_zero() {
    let drag = Force::AirDrag {
        drag_coefficient: DRAG_COEFFICIENT,
        fluid_density: FLUID_DENSITY,
    };
    // 0 / 0 when the mass is zero
    let p = Particle {
        mass: 0.0,
        ..Particle::default()
    };
    assert_eq!(drag.evaluate(&p), Vector2::ZERO);
}

#[test]
fn test_stale_forces_are_overwritten() {
    let model = ForceModel::default();
    let mut p = Particle {
        velocity: Vector2::new(0.0, 3.0),
        ..Particle::default()
    };
    let fresh = model.accumulate(&mut p.clone());

    p.forces = Vector2::new(100.0, -100.0);
    let a = model.accumulate(&mut p);
    assert_eq!(a, fresh);

    // Accumulating twice gives the same answer
    assert_eq!(model.accumulate(&mut p), fresh);
}

#[test]
fn test_force_order_is_gravity_then_drag() {
    let model = ForceModel::default();
    let kinds: Vec<_> = model.forces().collect();
    assert_eq!(kinds.len(), 2);
    assert!(matches!(kinds[0], Force::Gravity { .. }));
    assert!(matches!(kinds[1], Force::AirDrag { .. }));

    assert_eq!(ForceModel::gravity_only().forces().count(), 1);
}
