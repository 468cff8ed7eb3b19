//! Tests for the explicit Euler step

use sandbox_core::forces::{ForceModel, GRAVITY};
use sandbox_core::tests::test_helpers::{approx_eq, free_fall_particle, free_fall_position_cm};
use sandbox_core::{euler_step, Integrator, IntegratorOptions, Method, Particle, Vector2};

fn vacuum_euler() -> Integrator {
    Integrator::new(Method::Euler, ForceModel::gravity_only(), IntegratorOptions::default())
}

#[test]
fn test_single_step_from_rest() {
    let mut p = free_fall_particle();
    vacuum_euler().euler(&mut p, 1.0);
    assert!(approx_eq(p.velocity.y, 9.81, 1e-12));
    // Position uses the updated velocity, converted to centimeters
    assert!(approx_eq(p.position.y, 981.0, 1e-9));
    assert_eq!(p.position.x, 0.0);
}

#[test]
fn test_free_fall_within_first_order_error() {
    let integrator = vacuum_euler();
    let dt = 0.1;
    let steps = 50;
    let mut p = free_fall_particle();
    for _ in 0..steps {
        integrator.step(&mut p, dt);
    }

    let t = dt * steps as f64;
    let exact = free_fall_position_cm(t);
    let error = (p.position.y - exact).abs();

    // Semi-implicit update overshoots by g * dt * t / 2 (in cm)
    let bound = 100.0 * GRAVITY * dt * t / 2.0;
    assert!(approx_eq(error, bound, 1e-6), "error {} vs bound {}", error, bound);
    assert!(approx_eq(p.velocity.y, GRAVITY * t, 1e-9));
}

#[test]
fn test_free_fall_unit_steps() {
    let integrator = vacuum_euler();
    for steps in [1u32, 2, 5, 10] {
        let mut p = free_fall_particle();
        for _ in 0..steps {
            integrator.step(&mut p, 1.0);
        }

        let t = steps as f64;
        let error = p.position.y - free_fall_position_cm(t);
        let bound = 100.0 * GRAVITY * t / 2.0;
        assert!(approx_eq(error, bound, 1e-6), "N = {}: error {} vs {}", steps, error, bound);
    }
}

#[test]
fn test_non_finite_velocity_is_discarded() {
    let mut p = free_fall_particle();
    p.velocity = Vector2::new(0.0, 0.0);
    let before = p.clone();

    vacuum_euler().euler(&mut p, f64::INFINITY);

    assert_eq!(p.velocity, before.velocity);
    assert_eq!(p.position, before.position);
}

#[test]
fn test_position_guard_is_independent_of_velocity_guard() {
    let mut p = Particle {
        position: Vector2::new(0.0, f64::MAX),
        velocity: Vector2::new(0.0, 1e306),
        ..Particle::default()
    };

    vacuum_euler().euler(&mut p, 1.0);

    // Velocity stays finite and is accepted, the overflowing position is not
    assert!(approx_eq(p.velocity.y, 1e306, 1e292));
    assert_eq!(p.position.y, f64::MAX);
}

#[test]
fn test_guard_only_inspects_y() {
    let mut p = Particle {
        velocity: Vector2::new(f64::NAN, 0.0),
        ..Particle::default()
    };

    vacuum_euler().euler(&mut p, 0.1);

    assert!(p.velocity.x.is_nan());
    assert!(approx_eq(p.velocity.y, 0.981, 1e-12));
}

#[test]
fn test_drag_slows_the_fall() {
    let mut with_drag = free_fall_particle();
    let mut without = free_fall_particle();
    let vacuum = vacuum_euler();
    for _ in 0..100 {
        euler_step(&mut with_drag, 0.01);
        vacuum.euler(&mut without, 0.01);
    }
    assert!(with_drag.velocity.y < without.velocity.y);
    assert!(with_drag.position.y < without.position.y);
}

#[test]
fn test_terminal_velocity() {
    let mut p = free_fall_particle();
    for _ in 0..3000 {
        euler_step(&mut p, 0.01);
    }
    let r = 0.25;
    let k = 0.5 * 0.47 * std::f64::consts::PI * r * r * 1.22;
    let terminal = (GRAVITY / k).sqrt();
    assert!(approx_eq(p.velocity.y, terminal, 1e-6), "v = {}", p.velocity.y);
}
