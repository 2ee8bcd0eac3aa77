//! Finite cylinder domain

use rand::{Rng, RngCore};

use super::surface::{
    axis_between, is_degenerate_segment, on_segment, plane_crossing, random_annulus_radius,
    random_in_plane, solve_quadratic, validate_radii, Crossing, Roots,
};
use super::{DomainError, Shape, EPSILON};
use crate::foundation::math::{utils, Vec3, Vec3Ext};

/// Capped cylinder between two end points
///
/// Solid when `inner_radius == 0`, a tube when `0 < inner_radius <
/// outer_radius`, and a zero-thickness shell when the radii are equal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    end_point0: Vec3,
    end_point1: Vec3,
    outer_radius: f32,
    inner_radius: f32,
    length: f32,
    axis: Vec3,
    right: Vec3,
    up: Vec3,
}

impl Cylinder {
    /// Create a cylinder; the end points must not coincide
    pub fn new(end_point0: Vec3, end_point1: Vec3, outer_radius: f32, inner_radius: f32) -> Result<Self, DomainError> {
        validate_radii(outer_radius, inner_radius)?;
        let (axis, length) = axis_between(&end_point0, &end_point1)?;
        let (right, up) = axis.orthonormal_basis();
        Ok(Self {
            end_point0,
            end_point1,
            outer_radius,
            inner_radius,
            length,
            axis,
            right,
            up,
        })
    }

    /// First end point
    pub const fn end_point0(&self) -> Vec3 {
        self.end_point0
    }

    /// Second end point
    pub const fn end_point1(&self) -> Vec3 {
        self.end_point1
    }

    /// Outer radius
    pub const fn outer_radius(&self) -> f32 {
        self.outer_radius
    }

    /// Inner radius
    pub const fn inner_radius(&self) -> f32 {
        self.inner_radius
    }

    /// Distance between the end points
    pub const fn length(&self) -> f32 {
        self.length
    }

    /// Unit vector from `end_point0` toward `end_point1`
    pub const fn axis(&self) -> Vec3 {
        self.axis
    }

    /// Move the first end point
    pub fn set_end_point0(&mut self, point: Vec3) -> Result<(), DomainError> {
        *self = Self::new(point, self.end_point1, self.outer_radius, self.inner_radius)?;
        Ok(())
    }

    /// Move the second end point
    pub fn set_end_point1(&mut self, point: Vec3) -> Result<(), DomainError> {
        *self = Self::new(self.end_point0, point, self.outer_radius, self.inner_radius)?;
        Ok(())
    }

    /// Change the outer radius
    pub fn set_outer_radius(&mut self, radius: f32) -> Result<(), DomainError> {
        validate_radii(radius, self.inner_radius)?;
        self.outer_radius = radius;
        Ok(())
    }

    /// Change the inner radius
    pub fn set_inner_radius(&mut self, radius: f32) -> Result<(), DomainError> {
        validate_radii(self.outer_radius, radius)?;
        self.inner_radius = radius;
        Ok(())
    }

    /// Height along the axis from `end_point0` and the radial offset vector
    fn local(&self, point: Vec3) -> (f32, Vec3) {
        let offset = point - self.end_point0;
        let height = offset.dot(&self.axis);
        (height, offset - self.axis * height)
    }

    fn within_radii(&self, radial_distance: f32) -> bool {
        self.inner_radius - EPSILON <= radial_distance && radial_distance <= self.outer_radius + EPSILON
    }

    fn side_crossing(&self, start: Vec3, end: Vec3, radius: f32, inner: bool) -> Option<Crossing> {
        let direction = end - start;
        let (start_height, start_radial) = self.local(start);
        let height_rate = direction.dot(&self.axis);
        let radial_rate = direction - self.axis * height_rate;

        let a = radial_rate.norm_squared();
        if a <= f32::EPSILON * f32::EPSILON {
            // Moving parallel to the axis never crosses the side
            return None;
        }
        let b = 2.0 * start_radial.dot(&radial_rate);
        let start_radius_squared = start_radial.norm_squared();
        let radius_squared = radius * radius;
        let c = start_radius_squared - radius_squared;

        let roots = match solve_quadratic(a, b, c) {
            Roots::None => return None,
            Roots::Tangent(t) if self.contains(start) != self.contains(end) => [Some(t), None],
            Roots::Tangent(_) => return None,
            Roots::Two(t1, t2) => [Some(t1), Some(t2)],
        };
        let within_height = |t: f32| {
            let height = start_height + height_rate * t;
            (-EPSILON..=self.length + EPSILON).contains(&height)
        };
        let t = roots.into_iter().flatten().find(|&t| on_segment(t) && within_height(t))?;

        let point = start + direction * t;
        let (_, radial) = self.local(point);
        let radial = radial.normalize_or_zero();
        let normal = if inner {
            if start_radius_squared < radius_squared { -radial } else { radial }
        } else if start_radius_squared > radius_squared {
            radial
        } else {
            -radial
        };
        Some(Crossing { t, point, normal })
    }

    /// Crossing of the cap at `level`; `outward` is the sign of the axis
    /// pointing away from the cylinder through that cap
    fn cap_crossing(&self, start: Vec3, end: Vec3, level: f32, outward: f32) -> Option<Crossing> {
        let (start_height, _) = self.local(start);
        let (end_height, _) = self.local(end);
        let t = plane_crossing(start_height, end_height, level, outward)?;

        let point = start + (end - start) * t;
        let (_, radial) = self.local(point);
        if !self.within_radii(radial.norm()) {
            return None;
        }

        let leaving = (end_height - level) * outward > 0.0;
        let normal = self.axis * if leaving { -outward } else { outward };
        Some(Crossing { t, point, normal })
    }
}

impl Shape for Cylinder {
    fn generate_with(&self, rng: &mut dyn RngCore) -> Vec3 {
        let height = rng.gen::<f32>() * self.length;
        let radius = random_annulus_radius(rng, self.inner_radius, self.outer_radius);
        self.end_point0 + self.axis * height + random_in_plane(rng, &self.right, &self.up) * radius
    }

    fn contains(&self, point: Vec3) -> bool {
        let (height, radial) = self.local(point);
        (-EPSILON..=self.length + EPSILON).contains(&height) && self.within_radii(radial.norm())
    }

    fn closest_point_to(&self, point: Vec3) -> (Vec3, Vec3) {
        let (height, radial) = self.local(point);
        let radial_distance = radial.norm();
        let clamped_height = utils::clamp(height, 0.0, self.length);

        let on_axis = radial_distance <= EPSILON;
        if on_axis && self.inner_radius > 0.0 && (0.0..=self.length).contains(&height) {
            // Equidistant from the whole inner wall; report the axis point
            return (self.end_point0 + self.axis * height, Vec3::zeros());
        }

        // Beyond an open end every point of the inner rim is equally near
        let direction = if on_axis { self.right } else { radial.normalize_or_zero() };
        let clamped_radius = utils::clamp(radial_distance, self.inner_radius, self.outer_radius);
        let closest = self.end_point0 + self.axis * clamped_height + direction * clamped_radius;

        let normal = if height < 0.0 {
            -self.axis
        } else if height > self.length {
            self.axis
        } else if radial_distance > self.outer_radius {
            direction
        } else if radial_distance < self.inner_radius {
            -direction
        } else {
            Vec3::zeros()
        };
        (closest, normal)
    }

    fn intersect(&self, start: Vec3, end: Vec3) -> Option<(Vec3, Vec3)> {
        if is_degenerate_segment(&(end - start)) {
            return None;
        }

        let inner_side = if self.inner_radius > 0.0 {
            self.side_crossing(start, end, self.inner_radius, true)
        } else {
            None
        };

        [
            inner_side,
            self.cap_crossing(start, end, 0.0, -1.0),
            self.cap_crossing(start, end, self.length, 1.0),
        ]
        .into_iter()
        .flatten()
        .fold(self.side_crossing(start, end, self.outer_radius, false), Crossing::nearest)
        .map(Crossing::into_hit)
    }
}
