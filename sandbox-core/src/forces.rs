use crate::particle::Particle;
use crate::vector::{self, Vector2};
use std::f64::consts::PI;

/// World orientation: y grows downward, so "up" is negative
pub const UP_SIGN: f64 = -1.0;
/// Standard gravity in m/s^2
pub const GRAVITY: f64 = 9.81;
/// Drag coefficient of a sphere (dimensionless)
pub const DRAG_COEFFICIENT: f64 = 0.47;
/// Air density at sea level in kg/m^3
pub const FLUID_DENSITY: f64 = 1.22;
/// Positions are in centimeters, velocities in meters
pub const CENTIMETERS_PER_METER: f64 = 100.0;

/// A force generator acting on a single particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Force {
    /// Constant downward pull
    Gravity { g: f64 },
    /// Quadratic drag opposing vertical motion
    AirDrag {
        drag_coefficient: f64,
        fluid_density: f64,
    },
}

impl Force {
    /// Evaluate this force for the particle's current state
    pub fn evaluate(&self, particle: &Particle) -> Vector2 {
        match *self {
            Force::Gravity { g } => Vector2::new(0.0, -g * UP_SIGN),
            Force::AirDrag {
                drag_coefficient,
                fluid_density,
            } => {
                let radius_m = particle.radius / CENTIMETERS_PER_METER;
                let area = PI * radius_m * radius_m;
                let coeff = -0.5 * drag_coefficient * area * fluid_density;
                let vy = particle.velocity.y;
                let drag = if vy == 0.0 {
                    0.0
                } else {
                    coeff * vy * vy * vy / vy.abs()
                };
                let accel = drag / particle.mass;
                Vector2::new(0.0, if accel.is_nan() { 0.0 } else { accel })
            }
        }
    }
}

/// Parameters of the force environment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceConfig {
    pub gravity: f64,
    pub drag_coefficient: f64,
    pub fluid_density: f64,
    pub air_drag: bool,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            drag_coefficient: DRAG_COEFFICIENT,
            fluid_density: FLUID_DENSITY,
            air_drag: true,
        }
    }
}

/// Gravity followed by optional air drag, always applied in that order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceModel {
    gravity: Force,
    drag: Option<Force>,
}

impl Default for ForceModel {
    fn default() -> Self {
        Self::new(&ForceConfig::default())
    }
}

impl ForceModel {
    pub fn new(config: &ForceConfig) -> Self {
        let drag = config.air_drag.then_some(Force::AirDrag {
            drag_coefficient: config.drag_coefficient,
            fluid_density: config.fluid_density,
        });
        Self {
            gravity: Force::Gravity { g: config.gravity },
            drag,
        }
    }

    pub fn gravity_only() -> Self {
        Self::new(&ForceConfig {
            air_drag: false,
            ..ForceConfig::default()
        })
    }

    /// Active generators in application order
    pub fn forces(&self) -> impl Iterator<Item = &Force> {
        std::iter::once(&self.gravity).chain(self.drag.iter())
    }

    /// Clear and recompute `particle.forces`, returning the acceleration.
    ///
    /// The caller guarantees `particle.mass > 0`.
    pub fn accumulate(&self, particle: &mut Particle) -> Vector2 {
        particle.forces = vector::zero(particle.forces);
        for force in self.forces() {
            let contribution = force.evaluate(particle);
            particle.forces = vector::add(particle.forces, [contribution]);
        }
        vector::divide(particle.forces, [particle.mass])
    }
}
