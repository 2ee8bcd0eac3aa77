//! Numeric helpers shared by the domain shapes
//!
//! Quadratic root selection, plane crossings, validation and random
//! sampling live here so every shape resolves edge cases the same way.

use rand::{Rng, RngCore};

use super::{DomainError, EPSILON};
use crate::foundation::math::{constants, utils, Vec3};

/// Real roots of `a t² + b t + c = 0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Roots {
    /// No real root
    None,
    /// Discriminant within tolerance of zero: the line grazes the surface
    Tangent(f32),
    /// Two distinct roots, smallest first
    Two(f32, f32),
}

/// Solve a quadratic whose leading coefficient is known to be non-zero
///
/// The discriminant is treated as zero when its magnitude is below
/// `4·|a|·EPSILON`, which for sphere and cylinder quadratics means the line
/// passes within roughly `EPSILON` of the surface.
pub(crate) fn solve_quadratic(a: f32, b: f32, c: f32) -> Roots {
    let discriminant = b * b - 4.0 * a * c;
    let tolerance = 4.0 * a.abs() * EPSILON;

    if discriminant < -tolerance {
        return Roots::None;
    }
    if discriminant.abs() <= tolerance {
        return Roots::Tangent(-b / (2.0 * a));
    }

    let sqrt_discriminant = discriminant.sqrt();
    let t1 = (-b - sqrt_discriminant) / (2.0 * a);
    let t2 = (-b + sqrt_discriminant) / (2.0 * a);
    if t1 <= t2 { Roots::Two(t1, t2) } else { Roots::Two(t2, t1) }
}

/// Parameter on `[0, 1]` where a segment's height crosses `level`
///
/// `outward` is `1.0` when heights above the level lie outside the shape and
/// `-1.0` when heights below it do. Endpoints must lie strictly (beyond
/// `EPSILON`) on opposite sides, except that a start resting within `EPSILON`
/// of the level crosses at its start once the end is strictly outside. A
/// segment that only reaches the level at its end does not cross.
pub(crate) fn plane_crossing(start_height: f32, end_height: f32, level: f32, outward: f32) -> Option<f32> {
    let start = (start_height - level) * outward;
    let end = (end_height - level) * outward;

    let crosses = (start < -EPSILON && end > EPSILON) || (start > EPSILON && end < -EPSILON);
    let leaves = start.abs() <= EPSILON && end > EPSILON;
    if !(crosses || leaves) {
        return None;
    }
    Some(utils::clamp((level - start_height) / (end_height - start_height), 0.0, 1.0))
}

/// A candidate surface crossing along a segment
#[derive(Debug, Clone, Copy)]
pub(crate) struct Crossing {
    pub t: f32,
    pub point: Vec3,
    pub normal: Vec3,
}

impl Crossing {
    /// Keep whichever crossing is nearer the segment start; ties keep `current`
    pub fn nearest(current: Option<Self>, candidate: Self) -> Option<Self> {
        match current {
            Some(best) if best.t <= candidate.t => Some(best),
            _ => Some(candidate),
        }
    }

    pub fn into_hit(self) -> (Vec3, Vec3) {
        (self.point, self.normal)
    }
}

/// True when a segment is too short to have a direction
pub(crate) fn is_degenerate_segment(direction: &Vec3) -> bool {
    direction.norm_squared() <= f32::EPSILON * f32::EPSILON
}

/// True when `t` lies on the closed unit interval
pub(crate) fn on_segment(t: f32) -> bool {
    (0.0..=1.0).contains(&t)
}

/// Check a radius pair for an annular/shell shape
pub(crate) fn validate_radii(outer_radius: f32, inner_radius: f32) -> Result<(), DomainError> {
    validate_radius("outer_radius", outer_radius)?;
    validate_radius("inner_radius", inner_radius)?;
    if outer_radius < inner_radius {
        return Err(DomainError::InvertedRadii {
            inner: inner_radius,
            outer: outer_radius,
        });
    }
    Ok(())
}

fn validate_radius(name: &'static str, value: f32) -> Result<(), DomainError> {
    if !value.is_finite() {
        return Err(DomainError::NonFinite(name));
    }
    if value < 0.0 {
        return Err(DomainError::NegativeRadius { name, value });
    }
    Ok(())
}

/// Check that every component of a vector is finite
pub(crate) fn validate_vector(name: &'static str, value: &Vec3) -> Result<(), DomainError> {
    if value.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(DomainError::NonFinite(name))
    }
}

/// Normalize a user-supplied normal, rejecting zero-length input
pub(crate) fn unit_normal(normal: &Vec3) -> Result<Vec3, DomainError> {
    validate_vector("normal", normal)?;
    normal.try_normalize(0.0).ok_or(DomainError::ZeroNormal)
}

/// Unit axis and length between two end points
pub(crate) fn axis_between(from: &Vec3, to: &Vec3) -> Result<(Vec3, f32), DomainError> {
    validate_vector("end point", from)?;
    validate_vector("end point", to)?;
    let span = to - from;
    let length = span.norm();
    if length <= EPSILON {
        return Err(DomainError::DegenerateAxis);
    }
    Ok((span / length, length))
}

/// Uniform random point on the unit sphere
pub(crate) fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    let z: f32 = rng.gen_range(-1.0..=1.0);
    let theta: f32 = rng.gen_range(0.0..constants::TAU);
    let ring = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(ring * theta.cos(), ring * theta.sin(), z)
}

/// Uniform random unit vector in the plane spanned by `right` and `up`
pub(crate) fn random_in_plane(rng: &mut dyn RngCore, right: &Vec3, up: &Vec3) -> Vec3 {
    let theta: f32 = rng.gen_range(0.0..constants::TAU);
    right * theta.cos() + up * theta.sin()
}

/// Radius drawn so points are uniform over the area of an annulus
pub(crate) fn random_annulus_radius(rng: &mut dyn RngCore, inner: f32, outer: f32) -> f32 {
    if inner >= outer {
        return outer;
    }
    let u: f32 = rng.gen();
    utils::lerp(inner * inner, outer * outer, u).sqrt()
}
