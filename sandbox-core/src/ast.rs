//! Scenario AST
//!
//! A scenario describes the particle template, the force environment, the
//! particles to spawn, how long to run and what to measure afterwards.

use crate::diagnostics::Span;
use crate::integrator::{Method, Rk4Weights};
use crate::vector::{Halving, Vector2};

/// A parsed scenario file
#[derive(Debug, Clone)]
pub struct Scenario {
    pub template: Option<TemplateDecl>,
    pub environment: Option<EnvironmentDecl>,
    pub particles: Vec<ParticleDecl>,
    pub simulate: SimulateDecl,
    pub options: Option<OptionsDecl>,
    pub detectors: Vec<DetectorDecl>,
}

/// `template mass = m radius = r`
#[derive(Debug, Clone, Default)]
pub struct TemplateDecl {
    pub mass: Option<f64>,
    pub radius: Option<f64>,
    pub span: Option<Span>,
}

/// `environment gravity = g drag = cd|on|off density = rho`
#[derive(Debug, Clone, Default)]
pub struct EnvironmentDecl {
    pub gravity: Option<f64>,
    pub drag_coefficient: Option<f64>,
    pub fluid_density: Option<f64>,
    pub air_drag: Option<bool>,
    pub span: Option<Span>,
}

/// `particle name [at (x, y)] [velocity (vx, vy)]`
#[derive(Debug, Clone)]
pub struct ParticleDecl {
    pub name: String,
    pub position: Option<Vector2>,
    pub velocity: Option<Vector2>,
    pub span: Option<Span>,
}

/// `simulate dt = x steps = n [method = euler|rk4]`
#[derive(Debug, Clone)]
pub struct SimulateDecl {
    pub dt: f64,
    pub steps: u64,
    pub method: Method,
    pub span: Option<Span>,
}

/// `options halving = truncate|exact weights = rounded|exact guard = on|off`
#[derive(Debug, Clone, Default)]
pub struct OptionsDecl {
    pub halving: Option<Halving>,
    pub weights: Option<Rk4Weights>,
    pub guard: Option<bool>,
    pub span: Option<Span>,
}

/// `detect name = kind(...)`
#[derive(Debug, Clone)]
pub struct DetectorDecl {
    pub name: String,
    pub kind: DetectorKind,
    pub span: Option<Span>,
}

/// What a detector measures on the final world
#[derive(Debug, Clone, PartialEq)]
pub enum DetectorKind {
    PositionX(String),
    PositionY(String),
    VelocityX(String),
    VelocityY(String),
    Speed(String),
    Distance { a: String, b: String },
}

impl DetectorKind {
    /// Particle names referenced by this detector
    pub fn particles(&self) -> Vec<&str> {
        match self {
            DetectorKind::PositionX(p)
            | DetectorKind::PositionY(p)
            | DetectorKind::VelocityX(p)
            | DetectorKind::VelocityY(p)
            | DetectorKind::Speed(p) => vec![p.as_str()],
            DetectorKind::Distance { a, b } => vec![a.as_str(), b.as_str()],
        }
    }
}
