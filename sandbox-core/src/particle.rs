use crate::vector::Vector2;

/// Default particle mass in kilograms
pub const DEFAULT_MASS: f64 = 1.0;
/// Default particle radius in centimeters
pub const DEFAULT_RADIUS: f64 = 25.0;

/// A point-mass particle.
///
/// Position is in centimeters while velocity is in meters per second; the
/// integrators convert between the two.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub name: Option<String>,
    /// Centimeters
    pub position: Vector2,
    /// Meters per second
    pub velocity: Vector2,
    /// Net force from the last accumulation, overwritten every step
    pub forces: Vector2,
    /// Kilograms, must be positive
    pub mass: f64,
    /// Centimeters
    pub radius: f64,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            name: None,
            position: Vector2::ZERO,
            velocity: Vector2::ZERO,
            forces: Vector2::ZERO,
            mass: DEFAULT_MASS,
            radius: DEFAULT_RADIUS,
        }
    }
}

impl Particle {
    /// Copy of this particle moved to `position`, used as an RK4 probe
    pub fn probe_at(&self, position: Vector2) -> Self {
        Self {
            position,
            ..self.clone()
        }
    }
}

/// Creates particles from a template.
///
/// The template is configured once while a world is being set up and read
/// by every `create` call after that.
#[derive(Debug, Clone, Default)]
pub struct ParticleFactory {
    template: Particle,
}

impl ParticleFactory {
    pub fn new(template: Particle) -> Self {
        Self { template }
    }

    /// Replace the template used by subsequent `create` calls
    pub fn set_template(&mut self, template: Particle) {
        self.template = template;
    }

    pub fn template(&self) -> &Particle {
        &self.template
    }

    /// Clone the template and apply the given overrides
    pub fn create(
        &self,
        position: Option<Vector2>,
        velocity: Option<Vector2>,
        name: Option<&str>,
    ) -> Particle {
        let mut particle = self.template.clone();
        if let Some(position) = position {
            particle.position = position;
        }
        if let Some(velocity) = velocity {
            particle.velocity = velocity;
        }
        if let Some(name) = name {
            particle.name = Some(name.to_string());
        }
        particle
    }
}
