use crate::ast::{
    DetectorDecl, DetectorKind, EnvironmentDecl, OptionsDecl, ParticleDecl, Scenario,
    SimulateDecl, TemplateDecl,
};
use crate::diagnostics::Span;
use crate::integrator::{Method, Rk4Weights};
use crate::vector::{Halving, Vector2};
use thiserror::Error;

/// Parse error with optional span information
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{message}")]
    SyntaxError {
        message: String,
        span: Option<Span>,
    },
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Option<Span>) -> Self {
        Self::SyntaxError {
            message: message.into(),
            span,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self::SyntaxError {
            message: message.into(),
            span: None,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::SyntaxError { span, .. } => *span,
        }
    }
}

/// Byte offsets of each line start
struct ParseContext {
    line_offsets: Vec<usize>,
}

impl ParseContext {
    fn new(source: &str) -> Self {
        let mut line_offsets = vec![0];
        let mut offset = 0;
        for ch in source.chars() {
            offset += ch.len_utf8();
            if ch == '\n' {
                line_offsets.push(offset);
            }
        }
        Self { line_offsets }
    }

    fn line_start(&self, line: usize) -> usize {
        self.line_offsets.get(line).copied().unwrap_or(0)
    }

    /// Span covering the whole line (0-indexed), trailing newline included
    fn full_line_span(&self, line: usize, len: usize) -> Span {
        let start = self.line_start(line);
        let end = self
            .line_offsets
            .get(line + 1)
            .copied()
            .unwrap_or(start + len);
        Span::new(start, end)
    }
}

/// Parse a scenario from source text
pub fn parse_scenario(source: &str) -> Result<Scenario, ParseError> {
    let ctx = ParseContext::new(source);
    let mut template = None;
    let mut environment = None;
    let mut particles = Vec::new();
    let mut simulate = None;
    let mut options = None;
    let mut detectors = Vec::new();

    for (i, raw) in source.lines().enumerate() {
        let line = raw.trim();
        let span = Some(ctx.full_line_span(i, raw.len()));

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let keyword = line.split_whitespace().next().unwrap_or("");
        match keyword {
            "template" => {
                let decl = parse_template(line, span)?;
                set_once(&mut template, decl, "template", span)?;
            }
            "environment" => {
                let decl = parse_environment(line, span)?;
                set_once(&mut environment, decl, "environment", span)?;
            }
            "particle" => particles.push(parse_particle(line, span)?),
            "simulate" => {
                let decl = parse_simulate(line, span)?;
                set_once(&mut simulate, decl, "simulate", span)?;
            }
            "options" => {
                let decl = parse_options(line, span)?;
                set_once(&mut options, decl, "options", span)?;
            }
            "detect" => detectors.push(parse_detector(line, span)?),
            other => {
                return Err(ParseError::new(
                    format!("Unexpected token: {}", other),
                    span,
                ));
            }
        }
    }

    let simulate =
        simulate.ok_or_else(|| ParseError::message("Missing 'simulate' declaration"))?;

    Ok(Scenario {
        template,
        environment,
        particles,
        simulate,
        options,
        detectors,
    })
}

fn set_once<T>(
    slot: &mut Option<T>,
    value: T,
    keyword: &str,
    span: Option<Span>,
) -> Result<(), ParseError> {
    if slot.is_some() {
        return Err(ParseError::new(
            format!("Duplicate '{}' declaration", keyword),
            span,
        ));
    }
    *slot = Some(value);
    Ok(())
}

/// Split `key = value key = value ...` into pairs
fn parse_settings<'a>(
    rest: &'a str,
    line: &str,
    span: Option<Span>,
) -> Result<Vec<(&'a str, &'a str)>, ParseError> {
    let tokens: Vec<&str> = rest.split_whitespace().collect();
    if tokens.len() % 3 != 0 {
        return Err(ParseError::new(
            format!("Expected 'key = value' pairs: {}", line),
            span,
        ));
    }
    tokens
        .chunks(3)
        .map(|chunk| {
            if chunk[1] != "=" {
                return Err(ParseError::new(
                    format!("Expected '=' after '{}': {}", chunk[0], line),
                    span,
                ));
            }
            Ok((chunk[0], chunk[2]))
        })
        .collect()
}

fn parse_number(s: &str, span: Option<Span>) -> Result<f64, ParseError> {
    s.trim()
        .parse::<f64>()
        .map_err(|_| ParseError::new(format!("Invalid number: {}", s.trim()), span))
}

fn parse_switch(s: &str, span: Option<Span>) -> Result<bool, ParseError> {
    match s {
        "on" => Ok(true),
        "off" => Ok(false),
        other => Err(ParseError::new(
            format!("Expected 'on' or 'off', got '{}'", other),
            span,
        )),
    }
}

fn unknown_setting(key: &str, keyword: &str, span: Option<Span>) -> ParseError {
    ParseError::new(format!("Unknown {} setting: {}", keyword, key), span)
}

/// Parse `template mass = m radius = r`
fn parse_template(line: &str, span: Option<Span>) -> Result<TemplateDecl, ParseError> {
    let rest = line.strip_prefix("template").unwrap_or_default();
    let mut decl = TemplateDecl {
        span,
        ..TemplateDecl::default()
    };
    for (key, value) in parse_settings(rest, line, span)? {
        match key {
            "mass" => decl.mass = Some(parse_number(value, span)?),
            "radius" => decl.radius = Some(parse_number(value, span)?),
            _ => return Err(unknown_setting(key, "template", span)),
        }
    }
    Ok(decl)
}

/// Parse `environment gravity = g drag = cd|on|off density = rho`
fn parse_environment(line: &str, span: Option<Span>) -> Result<EnvironmentDecl, ParseError> {
    let rest = line.strip_prefix("environment").unwrap_or_default();
    let mut decl = EnvironmentDecl {
        span,
        ..EnvironmentDecl::default()
    };
    for (key, value) in parse_settings(rest, line, span)? {
        match key {
            "gravity" => decl.gravity = Some(parse_number(value, span)?),
            "density" => decl.fluid_density = Some(parse_number(value, span)?),
            "drag" => match value {
                "on" | "off" => decl.air_drag = Some(parse_switch(value, span)?),
                _ => decl.drag_coefficient = Some(parse_number(value, span)?),
            },
            _ => return Err(unknown_setting(key, "environment", span)),
        }
    }
    Ok(decl)
}

/// Parse `particle name [at (x, y)] [velocity (vx, vy)]`
fn parse_particle(line: &str, span: Option<Span>) -> Result<ParticleDecl, ParseError> {
    let rest = line.strip_prefix("particle").unwrap_or_default().trim();
    let name_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let name = &rest[..name_end];
    if !is_valid_identifier(name) {
        return Err(ParseError::new(
            format!("Invalid particle name '{}': {}", name, line),
            span,
        ));
    }

    let mut position = None;
    let mut velocity = None;
    let mut rest = rest[name_end..].trim_start();
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("at") {
            let (value, remaining) = parse_pair(after, line, span)?;
            position = Some(value);
            rest = remaining;
        } else if let Some(after) = rest.strip_prefix("velocity") {
            let (value, remaining) = parse_pair(after, line, span)?;
            velocity = Some(value);
            rest = remaining;
        } else {
            return Err(ParseError::new(
                format!("Expected 'at' or 'velocity' in particle declaration: {}", line),
                span,
            ));
        }
    }

    Ok(ParticleDecl {
        name: name.to_string(),
        position,
        velocity,
        span,
    })
}

/// Parse a leading `(x, y)`, returning the vector and the remaining text
fn parse_pair<'a>(
    s: &'a str,
    line: &str,
    span: Option<Span>,
) -> Result<(Vector2, &'a str), ParseError> {
    let s = s.trim_start();
    let inner = s.strip_prefix('(').ok_or_else(|| {
        ParseError::new(format!("Expected '(' in vector: {}", line), span)
    })?;
    let close = inner.find(')').ok_or_else(|| {
        ParseError::new(format!("Expected ')' in vector: {}", line), span)
    })?;
    let coords: Vec<&str> = inner[..close].split(',').map(|c| c.trim()).collect();
    if coords.len() != 2 {
        return Err(ParseError::new(
            format!("Expected two components in vector: {}", line),
            span,
        ));
    }
    let value = Vector2::new(parse_number(coords[0], span)?, parse_number(coords[1], span)?);
    Ok((value, inner[close + 1..].trim_start()))
}

/// Parse `simulate dt = x steps = n [method = euler|rk4]`
fn parse_simulate(line: &str, span: Option<Span>) -> Result<SimulateDecl, ParseError> {
    let rest = line.strip_prefix("simulate").unwrap_or_default();
    let mut dt = None;
    let mut steps = None;
    let mut method = Method::default();
    for (key, value) in parse_settings(rest, line, span)? {
        match key {
            "dt" => dt = Some(parse_number(value, span)?),
            "steps" => {
                steps = Some(value.parse::<u64>().map_err(|_| {
                    ParseError::new(format!("Invalid step count: {}", value), span)
                })?)
            }
            "method" => method = value.parse().map_err(|e: String| ParseError::new(e, span))?,
            _ => return Err(unknown_setting(key, "simulate", span)),
        }
    }

    let dt = dt.ok_or_else(|| {
        ParseError::new(format!("Expected 'dt =' in simulate: {}", line), span)
    })?;
    let steps = steps.ok_or_else(|| {
        ParseError::new(format!("Expected 'steps =' in simulate: {}", line), span)
    })?;

    Ok(SimulateDecl {
        dt,
        steps,
        method,
        span,
    })
}

/// Parse `options halving = truncate|exact weights = rounded|exact guard = on|off`
fn parse_options(line: &str, span: Option<Span>) -> Result<OptionsDecl, ParseError> {
    let rest = line.strip_prefix("options").unwrap_or_default();
    let mut decl = OptionsDecl {
        span,
        ..OptionsDecl::default()
    };
    for (key, value) in parse_settings(rest, line, span)? {
        match (key, value) {
            ("halving", "truncate") => decl.halving = Some(Halving::Truncating),
            ("halving", "exact") => decl.halving = Some(Halving::Exact),
            ("weights", "rounded") => decl.weights = Some(Rk4Weights::Rounded),
            ("weights", "exact") => decl.weights = Some(Rk4Weights::Exact),
            ("guard", _) => decl.guard = Some(parse_switch(value, span)?),
            ("halving", _) | ("weights", _) => {
                return Err(ParseError::new(
                    format!("Invalid value '{}' for {}", value, key),
                    span,
                ));
            }
            _ => return Err(unknown_setting(key, "options", span)),
        }
    }
    Ok(decl)
}

/// Parse a detector declaration: `detect name = position(a).x`, `velocity(a).y`,
/// `speed(a)` or `distance(a, b)`
fn parse_detector(line: &str, span: Option<Span>) -> Result<DetectorDecl, ParseError> {
    let rest = line.strip_prefix("detect").unwrap_or_default();

    let eq_pos = rest.find('=').ok_or_else(|| {
        ParseError::new(format!("Expected '=' in detector: {}", line), span)
    })?;
    let name = rest[..eq_pos].trim();
    if !is_valid_identifier(name) {
        return Err(ParseError::new(
            format!("Invalid detector name '{}': {}", name, line),
            span,
        ));
    }
    let expr = rest[eq_pos + 1..].trim();

    let open = expr.find('(').ok_or_else(|| {
        ParseError::new(format!("Expected '(' in detector: {}", line), span)
    })?;
    let close = expr.find(')').ok_or_else(|| {
        ParseError::new(format!("Expected ')' in detector: {}", line), span)
    })?;
    if close < open {
        return Err(ParseError::new(format!("Malformed detector: {}", line), span));
    }
    let func = expr[..open].trim();
    let args: Vec<String> = expr[open + 1..close]
        .split(',')
        .map(|a| a.trim().to_string())
        .collect();
    let suffix = expr[close + 1..].trim();

    let single = |args: &[String]| -> Result<String, ParseError> {
        match args {
            [one] if is_valid_identifier(one) => Ok(one.clone()),
            _ => Err(ParseError::new(
                format!("Expected one particle name in {} detector: {}", func, line),
                span,
            )),
        }
    };

    let kind = match (func, suffix) {
        ("position", ".x") => DetectorKind::PositionX(single(args.as_slice())?),
        ("position", ".y") => DetectorKind::PositionY(single(args.as_slice())?),
        ("velocity", ".x") => DetectorKind::VelocityX(single(args.as_slice())?),
        ("velocity", ".y") => DetectorKind::VelocityY(single(args.as_slice())?),
        ("position", _) | ("velocity", _) => {
            return Err(ParseError::new(
                format!("Expected '.x' or '.y' after {}(...): {}", func, line),
                span,
            ));
        }
        ("speed", "") => DetectorKind::Speed(single(args.as_slice())?),
        ("distance", "") => match args.as_slice() {
            [a, b] if is_valid_identifier(a) && is_valid_identifier(b) => DetectorKind::Distance {
                a: a.clone(),
                b: b.clone(),
            },
            _ => {
                return Err(ParseError::new(
                    format!("Expected two particle names in distance detector: {}", line),
                    span,
                ));
            }
        },
        _ => {
            return Err(ParseError::new(
                format!("Unknown detector type: {}", expr),
                span,
            ));
        }
    };

    Ok(DetectorDecl {
        name: name.to_string(),
        kind,
        span,
    })
}

fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
