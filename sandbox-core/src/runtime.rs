use crate::analyzer::analyze_scenario;
use crate::ast::{DetectorKind, Scenario};
use crate::diagnostics::Diagnostics;
use crate::engine::World;
use crate::forces::{ForceConfig, ForceModel};
use crate::integrator::{Integrator, IntegratorOptions, Method};
use crate::parser::{parse_scenario, ParseError};
use crate::particle::{Particle, ParticleFactory};
use crate::vector::{self, Vector2};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("scenario has {} error(s), first: {first}", .diagnostics.errors().count())]
    Analysis {
        first: String,
        diagnostics: Diagnostics,
    },
    #[error("particle '{0}' not found")]
    UnknownParticle(String),
}

/// Result of a detector evaluation
#[derive(Debug, Clone)]
pub struct DetectorResult {
    pub name: String,
    pub value: f64,
}

/// Final result of running a scenario
#[derive(Debug)]
pub struct SimulationResult {
    pub detectors: Vec<DetectorResult>,
    pub elapsed: f64,
    pub ticks: u64,
}

/// Snapshot of one particle, for tracing a run
#[derive(Debug, Clone)]
pub struct ParticleState {
    pub name: Option<String>,
    pub position: Vector2,
    pub velocity: Vector2,
}

/// Settings that take precedence over the scenario's `simulate` line
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOverrides {
    pub method: Option<Method>,
    pub dt: Option<f64>,
    pub steps: Option<u64>,
}

/// A world being stepped one tick at a time
#[derive(Debug)]
pub struct SimulationContext {
    pub scenario: Scenario,
    pub world: World,
    pub dt: f64,
    pub steps: u64,
    pub current_step: u64,
}

/// Main entry point: parse and run a scenario
pub fn run_scenario(source: &str) -> Result<SimulationResult, RuntimeError> {
    run_scenario_with(source, &RunOverrides::default())
}

pub fn run_scenario_with(
    source: &str,
    overrides: &RunOverrides,
) -> Result<SimulationResult, RuntimeError> {
    let mut ctx = build_simulation_context(source, overrides)?;
    info!(
        method = %ctx.world.integrator.method,
        dt = ctx.dt,
        steps = ctx.steps,
        particles = ctx.world.particles.len(),
        "running scenario"
    );

    while step_simulation(&mut ctx) {}

    let detectors = evaluate_detectors(&ctx.scenario, &ctx.world)?;
    info!(elapsed = ctx.world.elapsed, "scenario finished");

    Ok(SimulationResult {
        detectors,
        elapsed: ctx.world.elapsed,
        ticks: ctx.world.ticks,
    })
}

/// Parse, analyze and build a world ready to be stepped
pub fn build_simulation_context(
    source: &str,
    overrides: &RunOverrides,
) -> Result<SimulationContext, RuntimeError> {
    let mut scenario = parse_scenario(source)?;
    if let Some(method) = overrides.method {
        scenario.simulate.method = method;
    }
    if let Some(dt) = overrides.dt {
        scenario.simulate.dt = dt;
    }
    if let Some(steps) = overrides.steps {
        scenario.simulate.steps = steps;
    }

    let diagnostics = analyze_scenario(&scenario);
    for warning in diagnostics.warnings() {
        warn!("{}", warning.message);
    }
    let first = diagnostics.errors().next().map(|d| d.message.clone());
    if let Some(first) = first {
        return Err(RuntimeError::Analysis { first, diagnostics });
    }

    let world = build_world(&scenario)?;
    Ok(SimulationContext {
        dt: scenario.simulate.dt,
        steps: scenario.simulate.steps,
        current_step: 0,
        scenario,
        world,
    })
}

/// Advance the context by one tick. Returns `false` once all steps are done.
pub fn step_simulation(ctx: &mut SimulationContext) -> bool {
    if ctx.current_step >= ctx.steps {
        return false;
    }
    ctx.world.step(ctx.dt);
    ctx.current_step += 1;
    true
}

pub fn particle_states(ctx: &SimulationContext) -> Vec<ParticleState> {
    ctx.world
        .particles
        .iter()
        .map(|p| ParticleState {
            name: p.name.clone(),
            position: p.position,
            velocity: p.velocity,
        })
        .collect()
}

/// Build a World from a parsed Scenario
pub fn build_world(scenario: &Scenario) -> Result<World, RuntimeError> {
    let mut template = Particle::default();
    if let Some(decl) = &scenario.template {
        if let Some(mass) = decl.mass {
            template.mass = mass;
        }
        if let Some(radius) = decl.radius {
            template.radius = radius;
        }
    }

    let mut config = ForceConfig::default();
    if let Some(env) = &scenario.environment {
        if let Some(gravity) = env.gravity {
            config.gravity = gravity;
        }
        if let Some(cd) = env.drag_coefficient {
            config.drag_coefficient = cd;
        }
        if let Some(rho) = env.fluid_density {
            config.fluid_density = rho;
        }
        if let Some(enabled) = env.air_drag {
            config.air_drag = enabled;
        }
    }

    let mut options = IntegratorOptions::default();
    if let Some(decl) = &scenario.options {
        if let Some(halving) = decl.halving {
            options.halving = halving;
        }
        if let Some(weights) = decl.weights {
            options.weights = weights;
        }
        if let Some(guard) = decl.guard {
            options.guard_rk4 = guard;
        }
    }

    let integrator = Integrator::new(scenario.simulate.method, ForceModel::new(&config), options);
    let mut world = World::new(integrator, ParticleFactory::new(template));
    for decl in &scenario.particles {
        world.spawn(decl.position, decl.velocity, Some(decl.name.as_str()));
    }

    Ok(world)
}

/// Evaluate all detectors on the final world state
pub fn evaluate_detectors(
    scenario: &Scenario,
    world: &World,
) -> Result<Vec<DetectorResult>, RuntimeError> {
    scenario
        .detectors
        .iter()
        .map(|detector| {
            let value = match &detector.kind {
                DetectorKind::PositionX(name) => lookup(world, name)?.position.x,
                DetectorKind::PositionY(name) => lookup(world, name)?.position.y,
                DetectorKind::VelocityX(name) => lookup(world, name)?.velocity.x,
                DetectorKind::VelocityY(name) => lookup(world, name)?.velocity.y,
                DetectorKind::Speed(name) => vector::magnitude(lookup(world, name)?.velocity),
                DetectorKind::Distance { a, b } => {
                    let a = lookup(world, a)?.position;
                    let b = lookup(world, b)?.position;
                    vector::magnitude(vector::subtract(a, [b]))
                }
            };
            Ok(DetectorResult {
                name: detector.name.clone(),
                value,
            })
        })
        .collect()
}

fn lookup<'w>(world: &'w World, name: &str) -> Result<&'w Particle, RuntimeError> {
    world
        .particle(name)
        .ok_or_else(|| RuntimeError::UnknownParticle(name.to_string()))
}
