pub mod analyzer;
pub mod ast;
pub mod diagnostics;
pub mod engine;
pub mod forces;
pub mod integrator;
pub mod parser;
pub mod particle;
pub mod runtime;
pub mod vector;

pub use analyzer::analyze_scenario;
pub use diagnostics::{Diagnostic, DiagnosticSeverity, Diagnostics, SourceLocation, Span};
pub use engine::World;
pub use forces::{Force, ForceConfig, ForceModel};
pub use integrator::{
    accumulate_forces, euler_step, rk4_step, Integrator, IntegratorOptions, Method, Rk4Weights,
};
pub use parser::{parse_scenario, ParseError};
pub use particle::{Particle, ParticleFactory};
pub use runtime::{
    build_simulation_context, build_world, evaluate_detectors, particle_states, run_scenario,
    run_scenario_with, step_simulation, DetectorResult, ParticleState, RunOverrides,
    RuntimeError, SimulationContext, SimulationResult,
};
pub use vector::{Halving, Vector2};

// Test helpers module (public for integration tests)
// Always compiled - integration tests are separate crates and need access
pub mod tests;
