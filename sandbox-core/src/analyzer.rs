//! Static checks for parsed scenarios
//!
//! Catches problems that would make a run meaningless (or produce NaNs)
//! before any particle is stepped.

use crate::ast::{Scenario, TemplateDecl};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::integrator::Method;
use std::collections::HashMap;

/// Analyze a scenario and return diagnostics
pub fn analyze_scenario(scenario: &Scenario) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();

    if let Some(template) = &scenario.template {
        check_template(template, &mut diagnostics);
    }

    if let Some(env) = &scenario.environment {
        if let Some(gravity) = env.gravity {
            if !gravity.is_finite() {
                diagnostics.push(Diagnostic::error(
                    format!("gravity must be finite, got {}", gravity),
                    env.span,
                ));
            }
        }
        if let Some(cd) = env.drag_coefficient {
            if !(cd.is_finite() && cd >= 0.0) {
                diagnostics.push(Diagnostic::error(
                    format!("drag coefficient must be non-negative, got {}", cd),
                    env.span,
                ));
            }
        }
        if let Some(rho) = env.fluid_density {
            if !(rho.is_finite() && rho >= 0.0) {
                diagnostics.push(Diagnostic::error(
                    format!("fluid density must be non-negative, got {}", rho),
                    env.span,
                ));
            }
        }
    }

    // Unique particle names
    let mut particle_names = HashMap::new();
    for (idx, particle) in scenario.particles.iter().enumerate() {
        if particle_names.insert(particle.name.as_str(), idx).is_some() {
            diagnostics.push(Diagnostic::error(
                format!("duplicate particle name '{}'", particle.name),
                particle.span,
            ));
        }
    }
    if scenario.particles.is_empty() {
        diagnostics.push(Diagnostic::warning("scenario declares no particles", None));
    }

    let simulate = &scenario.simulate;
    if !(simulate.dt.is_finite() && simulate.dt > 0.0) {
        diagnostics.push(Diagnostic::error(
            format!("dt must be positive and finite, got {}", simulate.dt),
            simulate.span,
        ));
    }
    if simulate.steps == 0 {
        diagnostics.push(Diagnostic::warning(
            "steps = 0, particles will not move",
            simulate.span,
        ));
    }

    if let Some(options) = &scenario.options {
        if simulate.method == Method::Euler
            && (options.halving.is_some() || options.weights.is_some() || options.guard.is_some())
        {
            diagnostics.push(Diagnostic::warning(
                "integrator options only affect method = rk4",
                options.span,
            ));
        }
    }

    // Detectors: unique names, known particles
    let mut detector_names = HashMap::new();
    for (idx, detector) in scenario.detectors.iter().enumerate() {
        if detector_names.insert(detector.name.as_str(), idx).is_some() {
            diagnostics.push(Diagnostic::error(
                format!("duplicate detector name '{}'", detector.name),
                detector.span,
            ));
        }
        for name in detector.kind.particles() {
            if !particle_names.contains_key(name) {
                diagnostics.push(Diagnostic::error(
                    format!("unknown particle '{}' in detector '{}'", name, detector.name),
                    detector.span,
                ));
            }
        }
    }

    diagnostics
}

fn check_template(template: &TemplateDecl, diagnostics: &mut Diagnostics) {
    if let Some(mass) = template.mass {
        if !(mass.is_finite() && mass > 0.0) {
            diagnostics.push(Diagnostic::error(
                format!("template mass must be positive, got {}", mass),
                template.span,
            ));
        }
    }
    if let Some(radius) = template.radius {
        if !(radius.is_finite() && radius >= 0.0) {
            diagnostics.push(Diagnostic::error(
                format!("template radius must be non-negative, got {}", radius),
                template.span,
            ));
        }
    }
}
