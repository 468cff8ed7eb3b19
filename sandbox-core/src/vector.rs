//! Vector2 algebra for the sandbox
//!
//! Positions, velocities and forces are all `glam::DVec2`. The helpers in
//! this module are pure functions over that value type; none of them mutate
//! their arguments.

use glam::DVec2;

/// Two-component `f64` vector used throughout the sandbox
pub type Vector2 = DVec2;

/// How RK4 halves its stage increments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Halving {
    /// Integer bit-shift per component (truncates fractional parts)
    #[default]
    Truncating,
    /// Floating-point division by two
    Exact,
}

/// Component-wise sum of `a` with every operand in `others`
pub fn add<I>(a: Vector2, others: I) -> Vector2
where
    I: IntoIterator<Item = Vector2>,
{
    others.into_iter().fold(a, |acc, b| acc + b)
}

/// Component-wise difference of `a` with every operand in `others`
pub fn subtract<I>(a: Vector2, others: I) -> Vector2
where
    I: IntoIterator<Item = Vector2>,
{
    others.into_iter().fold(a, |acc, b| acc - b)
}

/// Scale `a` by the product of `scalars`
pub fn multiply<I>(a: Vector2, scalars: I) -> Vector2
where
    I: IntoIterator<Item = f64>,
{
    scalars.into_iter().fold(a, |acc, s| acc * s)
}

/// Divide `a` by each scalar in turn
pub fn divide<I>(a: Vector2, scalars: I) -> Vector2
where
    I: IntoIterator<Item = f64>,
{
    scalars.into_iter().fold(a, |acc, s| acc / s)
}

/// Halve each component with an arithmetic shift.
///
/// Components are first reduced to a wrapping 32-bit integer, so
/// fractional parts are lost:
/// `shift_divide((3.9, -3.9)) == (1.0, -2.0)`.
pub fn shift_divide(a: Vector2) -> Vector2 {
    Vector2::new(
        (to_int32(a.x) >> 1) as f64,
        (to_int32(a.y) >> 1) as f64,
    )
}

/// Double each component with a left shift, with the same truncation as
/// [`shift_divide`]. Bits shifted past the sign bit are dropped.
pub fn shift_multiply(a: Vector2) -> Vector2 {
    Vector2::new(
        (to_int32(a.x) << 1) as f64,
        (to_int32(a.y) << 1) as f64,
    )
}

/// Truncate toward zero and wrap modulo 2^32 into `i32`.
/// NaN and infinities become 0.
fn to_int32(c: f64) -> i32 {
    if !c.is_finite() {
        return 0;
    }
    (c.trunc().rem_euclid(4_294_967_296.0) as u32) as i32
}

/// Halve `a` using the requested strategy
pub fn halve(a: Vector2, mode: Halving) -> Vector2 {
    match mode {
        Halving::Truncating => shift_divide(a),
        Halving::Exact => a / 2.0,
    }
}

/// Hadamard product
pub fn multiply_components(a: Vector2, b: Vector2) -> Vector2 {
    Vector2::new(a.x * b.x, a.y * b.y)
}

pub fn dot(a: Vector2, b: Vector2) -> f64 {
    a.x * b.x + a.y * b.y
}

pub fn magnitude(a: Vector2) -> f64 {
    dot(a, a).sqrt()
}

/// Rescale `a` to `target_length`.
///
/// A zero vector divides by 1.0 instead of its magnitude and stays zero.
pub fn normalize(a: Vector2, target_length: f64) -> Vector2 {
    let length = magnitude(a);
    let denominator = if length == 0.0 { 1.0 } else { length };
    a * (target_length / denominator)
}

/// Clamp the length of `a` to `max_length`
pub fn limit(a: Vector2, max_length: f64) -> Vector2 {
    if magnitude(a) <= max_length {
        a
    } else {
        normalize(a, max_length)
    }
}

/// Angle between `a` and `b` in radians, NaN when either is zero
pub fn angle_between(a: Vector2, b: Vector2) -> f64 {
    (dot(a, b) / (magnitude(a) * magnitude(b))).acos()
}

/// Signed square root per component: `sign(c) * sqrt(|c|)`
pub fn sqrt_component(a: Vector2) -> Vector2 {
    Vector2::new(signed_sqrt(a.x), signed_sqrt(a.y))
}

fn signed_sqrt(c: f64) -> f64 {
    if c == 0.0 {
        0.0
    } else {
        c.signum() * c.abs().sqrt()
    }
}

/// Zero vector shaped like `a`
pub fn zero(_a: Vector2) -> Vector2 {
    Vector2::ZERO
}
