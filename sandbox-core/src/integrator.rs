use crate::forces::{ForceModel, CENTIMETERS_PER_METER};
use crate::particle::Particle;
use crate::vector::{self, Halving, Vector2};
use tracing::debug;

/// RK4 weights rounded to five decimals, matching the reference simulator
pub const ROUNDED_RK4_WEIGHTS: [f64; 4] = [0.16667, 0.33334, 0.33334, 0.16667];
pub const EXACT_RK4_WEIGHTS: [f64; 4] = [1.0 / 6.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 6.0];

/// Time-stepping scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Euler,
    Rk4,
}

impl std::str::FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "euler" => Ok(Method::Euler),
            "rk4" => Ok(Method::Rk4),
            other => Err(format!("unknown integration method '{}'", other)),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Euler => write!(f, "euler"),
            Method::Rk4 => write!(f, "rk4"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rk4Weights {
    #[default]
    Rounded,
    Exact,
}

impl Rk4Weights {
    pub fn values(self) -> [f64; 4] {
        match self {
            Rk4Weights::Rounded => ROUNDED_RK4_WEIGHTS,
            Rk4Weights::Exact => EXACT_RK4_WEIGHTS,
        }
    }
}

/// Knobs for RK4. The defaults reproduce the reference behaviour:
/// truncating midpoints, rounded weights and no finite-value guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntegratorOptions {
    pub halving: Halving,
    pub weights: Rk4Weights,
    /// Apply Euler's per-field `y` guard to RK4 results as well
    pub guard_rk4: bool,
}

/// A configured integrator: scheme, force model and options
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Integrator {
    pub method: Method,
    pub forces: ForceModel,
    pub options: IntegratorOptions,
}

impl Integrator {
    pub fn new(method: Method, forces: ForceModel, options: IntegratorOptions) -> Self {
        Self {
            method,
            forces,
            options,
        }
    }

    /// Advance `particle` by `dt` seconds with the configured method
    pub fn step(&self, particle: &mut Particle, dt: f64) {
        match self.method {
            Method::Euler => self.euler(particle, dt),
            Method::Rk4 => self.rk4(particle, dt),
        }
    }

    /// Explicit Euler step.
    ///
    /// Position is advanced with the updated velocity. The velocity and
    /// position updates are discarded independently when their `y`
    /// component is not finite.
    pub fn euler(&self, particle: &mut Particle, dt: f64) {
        let acceleration = self.forces.accumulate(particle);
        let velocity = vector::add(particle.velocity, [acceleration * dt]);
        let position = vector::add(
            particle.position,
            [vector::multiply(velocity, [dt, CENTIMETERS_PER_METER])],
        );
        apply_guarded(particle, velocity, position);
    }

    /// Classic four stage Runge-Kutta over velocity and position.
    ///
    /// Stage accelerations are sampled on probe copies of `particle`; only
    /// the particle itself is updated.
    pub fn rk4(&self, particle: &mut Particle, dt: f64) {
        let halving = self.options.halving;
        let origin = particle.position;
        let velocity = particle.velocity;

        let k1 = self.forces.accumulate(particle) * dt;
        let dv1 = vector::multiply(velocity, [dt, CENTIMETERS_PER_METER]);
        let mut probe = particle.probe_at(origin + vector::halve(dv1, halving));

        let k2 = self.forces.accumulate(&mut probe) * dt;
        let dv2 = vector::multiply(
            velocity + vector::halve(k1, halving),
            [dt, CENTIMETERS_PER_METER],
        );
        let mut probe = particle.probe_at(origin + vector::halve(dv2, halving));

        let k3 = self.forces.accumulate(&mut probe) * dt;
        let dv3 = vector::multiply(velocity + k2, [dt, CENTIMETERS_PER_METER]);
        let mut probe = particle.probe_at(origin + dv3);

        let k4 = self.forces.accumulate(&mut probe) * dt;
        let dv4 = vector::multiply(velocity + k3, [dt, CENTIMETERS_PER_METER]);

        let [w1, w2, w3, w4] = self.options.weights.values();
        let position = vector::add(origin, [dv1 * w1, dv2 * w2, dv3 * w3, dv4 * w4]);
        let velocity = vector::add(velocity, [k1 * w1, k2 * w2, k3 * w3, k4 * w4]);

        if self.options.guard_rk4 {
            apply_guarded(particle, velocity, position);
        } else {
            particle.velocity = velocity;
            particle.position = position;
        }
    }
}

fn apply_guarded(particle: &mut Particle, velocity: Vector2, position: Vector2) {
    if velocity.y.is_finite() {
        particle.velocity = velocity;
    } else {
        debug!(name = ?particle.name, vy = velocity.y, "discarding non-finite velocity update");
    }
    if position.y.is_finite() {
        particle.position = position;
    } else {
        debug!(name = ?particle.name, y = position.y, "discarding non-finite position update");
    }
}

/// Acceleration of `particle` under the default force model
pub fn accumulate_forces(particle: &mut Particle) -> Vector2 {
    ForceModel::default().accumulate(particle)
}

/// Euler step under the default force model
pub fn euler_step(particle: &mut Particle, dt: f64) {
    Integrator::default().euler(particle, dt);
}

/// RK4 step under the default force model and options
pub fn rk4_step(particle: &mut Particle, dt: f64) {
    Integrator::default().rk4(particle, dt);
}
