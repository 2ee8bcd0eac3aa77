//! Spherical domain
//!
//! Covers solid spheres (`inner_radius == 0`), hollow spheres
//! (`0 < inner_radius < outer_radius`) and zero-thickness shells
//! (`inner_radius == outer_radius`).

use rand::{Rng, RngCore};

use super::surface::{
    is_degenerate_segment, on_segment, random_unit_vector, solve_quadratic, validate_radii,
    validate_vector, Crossing, Roots,
};
use super::{DomainError, Shape, EPSILON};
use crate::foundation::math::{utils, Vec3, Vec3Ext};

/// Sphere with an optional concentric hollow
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Vec3,
    outer_radius: f32,
    inner_radius: f32,
}

impl Sphere {
    /// Create a sphere; pass `inner_radius = 0` for a solid sphere
    pub fn new(center: Vec3, outer_radius: f32, inner_radius: f32) -> Result<Self, DomainError> {
        validate_vector("center", &center)?;
        validate_radii(outer_radius, inner_radius)?;
        Ok(Self {
            center,
            outer_radius,
            inner_radius,
        })
    }

    /// Center point
    pub const fn center(&self) -> Vec3 {
        self.center
    }

    /// Outer radius
    pub const fn outer_radius(&self) -> f32 {
        self.outer_radius
    }

    /// Inner radius; zero for a solid sphere
    pub const fn inner_radius(&self) -> f32 {
        self.inner_radius
    }

    /// True for a zero-thickness shell
    #[allow(clippy::float_cmp)]
    pub fn is_shell(&self) -> bool {
        self.inner_radius == self.outer_radius
    }

    /// Move the sphere
    pub fn set_center(&mut self, center: Vec3) -> Result<(), DomainError> {
        validate_vector("center", &center)?;
        self.center = center;
        Ok(())
    }

    /// Change the outer radius, which must stay at least the inner radius
    pub fn set_outer_radius(&mut self, radius: f32) -> Result<(), DomainError> {
        validate_radii(radius, self.inner_radius)?;
        self.outer_radius = radius;
        Ok(())
    }

    /// Change the inner radius, which must stay at most the outer radius
    pub fn set_inner_radius(&mut self, radius: f32) -> Result<(), DomainError> {
        validate_radii(self.outer_radius, radius)?;
        self.inner_radius = radius;
        Ok(())
    }

    /// Crossing of the segment with the sphere surface of the given radius
    fn surface_crossing(&self, start: Vec3, end: Vec3, radius: f32, inner: bool) -> Option<Crossing> {
        let direction = end - start;
        let relative = start - self.center;
        let start_distance_squared = relative.norm_squared();
        let radius_squared = radius * radius;

        let a = direction.norm_squared();
        let b = 2.0 * direction.dot(&relative);
        let c = start_distance_squared - radius_squared;

        let t = match solve_quadratic(a, b, c) {
            Roots::None => return None,
            Roots::Tangent(t) => {
                // Grazing contact only counts when it changes containment
                if !on_segment(t) || self.contains(start) == self.contains(end) {
                    return None;
                }
                t
            }
            Roots::Two(t1, t2) => [t1, t2].into_iter().find(|&t| on_segment(t))?,
        };

        let point = start + direction * t;
        let radial = (point - self.center).normalize_or_zero();
        let normal = if inner {
            if start_distance_squared < radius_squared { -radial } else { radial }
        } else if start_distance_squared > radius_squared {
            radial
        } else {
            -radial
        };
        Some(Crossing { t, point, normal })
    }
}

impl Shape for Sphere {
    fn generate_with(&self, rng: &mut dyn RngCore) -> Vec3 {
        let direction = random_unit_vector(rng);
        let radius = if self.is_shell() {
            self.outer_radius
        } else {
            let u: f32 = rng.gen();
            utils::lerp(self.inner_radius.powi(3), self.outer_radius.powi(3), u).cbrt()
        };
        self.center + direction * radius
    }

    fn contains(&self, point: Vec3) -> bool {
        let distance = (point - self.center).norm();
        self.inner_radius - EPSILON <= distance && distance <= self.outer_radius + EPSILON
    }

    fn closest_point_to(&self, point: Vec3) -> (Vec3, Vec3) {
        let offset = point - self.center;
        let distance = offset.norm();

        if distance > self.outer_radius {
            let radial = offset / distance;
            (self.center + radial * self.outer_radius, radial)
        } else if distance < self.inner_radius {
            if distance <= EPSILON {
                // Every point of the inner surface is equally close
                return (self.center, Vec3::zeros());
            }
            let radial = offset / distance;
            (self.center + radial * self.inner_radius, -radial)
        } else {
            (point, Vec3::zeros())
        }
    }

    fn intersect(&self, start: Vec3, end: Vec3) -> Option<(Vec3, Vec3)> {
        if is_degenerate_segment(&(end - start)) {
            return None;
        }

        let outer = self.surface_crossing(start, end, self.outer_radius, false);
        let inner = if self.inner_radius > 0.0 {
            self.surface_crossing(start, end, self.inner_radius, true)
        } else {
            None
        };

        inner
            .into_iter()
            .fold(outer, Crossing::nearest)
            .map(Crossing::into_hit)
    }
}
