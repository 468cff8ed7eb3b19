use crate::integrator::Integrator;
use crate::particle::{Particle, ParticleFactory};
use crate::vector::Vector2;
use tracing::trace;

/// The simulation world: owns the particles and steps each one per tick
#[derive(Debug, Clone, Default)]
pub struct World {
    pub particles: Vec<Particle>,
    pub integrator: Integrator,
    pub factory: ParticleFactory,
    /// Simulated seconds
    pub elapsed: f64,
    pub ticks: u64,
}

impl World {
    pub fn new(integrator: Integrator, factory: ParticleFactory) -> Self {
        Self {
            particles: Vec::new(),
            integrator,
            factory,
            elapsed: 0.0,
            ticks: 0,
        }
    }

    /// Create a particle from the factory template and add it to the world.
    /// Returns its index.
    pub fn spawn(
        &mut self,
        position: Option<Vector2>,
        velocity: Option<Vector2>,
        name: Option<&str>,
    ) -> usize {
        let particle = self.factory.create(position, velocity, name);
        self.particles.push(particle);
        self.particles.len() - 1
    }

    /// Integrate every particle once
    pub fn step(&mut self, dt: f64) {
        for particle in self.particles.iter_mut() {
            self.integrator.step(particle, dt);
        }
        self.elapsed += dt;
        self.ticks += 1;
        trace!(tick = self.ticks, elapsed = self.elapsed, "world step");
    }

    pub fn particle(&self, name: &str) -> Option<&Particle> {
        self.particles
            .iter()
            .find(|p| p.name.as_deref() == Some(name))
    }
}
