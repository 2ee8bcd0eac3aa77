//! Right circular cone domain

use nalgebra::Vector2;
use rand::{Rng, RngCore};

use super::surface::{
    axis_between, is_degenerate_segment, on_segment, plane_crossing, random_annulus_radius,
    random_in_plane, solve_quadratic, validate_radii, Crossing, Roots,
};
use super::{DomainError, Shape, EPSILON};
use crate::foundation::math::{utils, Vec3, Vec3Ext};

/// Cone with its point at `apex` and a circular base centered on `base`
///
/// The radius grows linearly from zero at the apex to `outer_radius` at the
/// base. A non-zero `inner_radius` hollows out a coaxial cone of the same
/// length; equal radii describe a zero-thickness shell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cone {
    apex: Vec3,
    base: Vec3,
    outer_radius: f32,
    inner_radius: f32,
    length: f32,
    axis: Vec3,
    right: Vec3,
    up: Vec3,
}

/// Which lateral surface a crossing was found on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Outer,
    Inner,
}

impl Cone {
    /// Create a cone; `apex` and `base` must not coincide
    pub fn new(apex: Vec3, base: Vec3, outer_radius: f32, inner_radius: f32) -> Result<Self, DomainError> {
        validate_radii(outer_radius, inner_radius)?;
        let (axis, length) = axis_between(&apex, &base)?;
        let (right, up) = axis.orthonormal_basis();
        Ok(Self {
            apex,
            base,
            outer_radius,
            inner_radius,
            length,
            axis,
            right,
            up,
        })
    }

    /// Tip of the cone
    pub const fn apex(&self) -> Vec3 {
        self.apex
    }

    /// Center of the base
    pub const fn base(&self) -> Vec3 {
        self.base
    }

    /// Base radius of the outer surface
    pub const fn outer_radius(&self) -> f32 {
        self.outer_radius
    }

    /// Base radius of the hollow
    pub const fn inner_radius(&self) -> f32 {
        self.inner_radius
    }

    /// Distance from apex to base
    pub const fn length(&self) -> f32 {
        self.length
    }

    /// Unit vector from apex toward base
    pub const fn axis(&self) -> Vec3 {
        self.axis
    }

    /// Move the apex
    pub fn set_apex(&mut self, apex: Vec3) -> Result<(), DomainError> {
        *self = Self::new(apex, self.base, self.outer_radius, self.inner_radius)?;
        Ok(())
    }

    /// Move the base center
    pub fn set_base(&mut self, base: Vec3) -> Result<(), DomainError> {
        *self = Self::new(self.apex, base, self.outer_radius, self.inner_radius)?;
        Ok(())
    }

    /// Change the outer radius; the cone is left untouched on error
    pub fn set_outer_radius(&mut self, radius: f32) -> Result<(), DomainError> {
        validate_radii(radius, self.inner_radius)?;
        self.outer_radius = radius;
        Ok(())
    }

    /// Change the inner radius; the cone is left untouched on error
    pub fn set_inner_radius(&mut self, radius: f32) -> Result<(), DomainError> {
        validate_radii(self.outer_radius, radius)?;
        self.inner_radius = radius;
        Ok(())
    }

    fn is_shell(&self) -> bool {
        self.inner_radius >= self.outer_radius
    }

    /// Radius growth per unit of height
    fn slope(&self, side: Side) -> f32 {
        match side {
            Side::Outer => self.outer_radius / self.length,
            Side::Inner => self.inner_radius / self.length,
        }
    }

    /// Height along the axis from the apex and the radial offset vector
    fn local(&self, point: Vec3) -> (f32, Vec3) {
        let offset = point - self.apex;
        let height = offset.dot(&self.axis);
        (height, offset - self.axis * height)
    }

    /// Unit normal of a lateral surface at a point whose radial direction is
    /// `radial`, pointing away from the solid material
    fn surface_normal(&self, side: Side, radial: &Vec3) -> Vec3 {
        let normal = (radial - self.axis * self.slope(side)).normalize_or_zero();
        match side {
            Side::Outer => normal,
            Side::Inner => -normal,
        }
    }

    fn side_crossing(&self, start: Vec3, end: Vec3, side: Side) -> Option<Crossing> {
        let slope = self.slope(side);
        if slope <= 0.0 {
            return None;
        }
        let slope_squared = slope * slope;

        let direction = end - start;
        let (start_height, start_radial) = self.local(start);
        let height_rate = direction.dot(&self.axis);
        let radial_rate = direction - self.axis * height_rate;

        // |radial(t)|² = slope² · height(t)²
        let radial_rate_squared = radial_rate.norm_squared();
        let axial_term = slope_squared * height_rate * height_rate;
        let a = radial_rate_squared - axial_term;
        let b = 2.0 * (start_radial.dot(&radial_rate) - slope_squared * start_height * height_rate);
        let c = start_radial.norm_squared() - slope_squared * start_height * start_height;

        let roots = if a.abs() <= f32::EPSILON * (radial_rate_squared + axial_term) {
            // Segment parallel to a generator line
            if b.abs() <= f32::EPSILON {
                return None;
            }
            [Some(-c / b), None]
        } else {
            match solve_quadratic(a, b, c) {
                Roots::None => return None,
                Roots::Tangent(t) if self.contains(start) != self.contains(end) => [Some(t), None],
                Roots::Tangent(_) => return None,
                Roots::Two(t1, t2) => [Some(t1), Some(t2)],
            }
        };

        // The mirrored nappe beyond the apex is not part of the cone
        let valid = |t: f32| {
            let height = start_height + height_rate * t;
            on_segment(t) && EPSILON < height && height <= self.length + EPSILON
        };
        let t = roots.into_iter().flatten().find(|&t| valid(t))?;

        let point = start + direction * t;
        let (_, radial) = self.local(point);
        let normal = self.surface_normal(side, &radial.normalize_or_zero());

        let start_radius = start_radial.norm();
        let starts_outside_surface = match side {
            Side::Outer => start_radius > slope * start_height,
            Side::Inner => start_radius < slope * start_height,
        };
        let normal = if starts_outside_surface { normal } else { -normal };
        Some(Crossing { t, point, normal })
    }

    fn apex_crossing(&self, start: Vec3, end: Vec3) -> Option<Crossing> {
        let (start_height, _) = self.local(start);
        let (end_height, _) = self.local(end);
        let t = plane_crossing(start_height, end_height, 0.0, -1.0)?;

        let point = start + (end - start) * t;
        let (_, radial) = self.local(point);
        if radial.norm() > EPSILON {
            return None;
        }
        let normal = if end_height < 0.0 { self.axis } else { -self.axis };
        Some(Crossing { t, point, normal })
    }

    fn base_crossing(&self, start: Vec3, end: Vec3) -> Option<Crossing> {
        let (start_height, _) = self.local(start);
        let (end_height, _) = self.local(end);
        let t = plane_crossing(start_height, end_height, self.length, 1.0)?;

        let point = start + (end - start) * t;
        let (_, radial) = self.local(point);
        let radius = radial.norm();
        if radius < self.inner_radius - EPSILON || radius > self.outer_radius + EPSILON {
            return None;
        }
        let normal = if end_height > self.length { -self.axis } else { self.axis };
        Some(Crossing { t, point, normal })
    }
}

/// Closest point to `query` on the segment `from`..`to` in the (height, radius) plane
fn closest_on_edge(query: &Vector2<f32>, from: &Vector2<f32>, to: &Vector2<f32>) -> Vector2<f32> {
    let edge = to - from;
    let length_squared = edge.norm_squared();
    if length_squared <= f32::EPSILON {
        return *from;
    }
    let s = utils::clamp((query - from).dot(&edge) / length_squared, 0.0, 1.0);
    from + edge * s
}

impl Shape for Cone {
    fn generate_with(&self, rng: &mut dyn RngCore) -> Vec3 {
        let u: f32 = rng.gen();
        // Lateral area grows with height, volume with height squared
        let fraction = if self.is_shell() { u.sqrt() } else { u.cbrt() };
        let base_radius = random_annulus_radius(rng, self.inner_radius, self.outer_radius);
        let direction = random_in_plane(rng, &self.right, &self.up);
        self.apex + self.axis * (fraction * self.length) + direction * (fraction * base_radius)
    }

    fn contains(&self, point: Vec3) -> bool {
        let (height, radial) = self.local(point);
        if !(-EPSILON..=self.length + EPSILON).contains(&height) {
            return false;
        }
        let radius = radial.norm();
        self.slope(Side::Inner) * height - EPSILON <= radius && radius <= self.slope(Side::Outer) * height + EPSILON
    }

    fn closest_point_to(&self, point: Vec3) -> (Vec3, Vec3) {
        if self.contains(point) {
            return (point, Vec3::zeros());
        }

        let (height, radial) = self.local(point);
        let radius = radial.norm();

        let mut direction = radial.normalize_or_zero();
        if radius <= EPSILON {
            if height < 0.0 {
                return (self.apex, -self.axis);
            }
            if self.inner_radius <= 0.0 {
                return (self.base, self.axis);
            }
            if height <= self.length {
                // Inside the hollow, equidistant from the inner wall
                return (self.apex + self.axis * height, Vec3::zeros());
            }
            // Beyond the open base any direction reaches an equally near point
            direction = self.right;
        }

        let query = Vector2::new(height, radius);
        let apex = Vector2::zeros();
        let outer_rim = Vector2::new(self.length, self.outer_radius);
        let inner_rim = Vector2::new(self.length, self.inner_radius);

        let mut candidates = vec![
            closest_on_edge(&query, &apex, &outer_rim),
            closest_on_edge(&query, &inner_rim, &outer_rim),
        ];
        if self.inner_radius > 0.0 {
            candidates.push(closest_on_edge(&query, &apex, &inner_rim));
        }
        let nearest = candidates
            .into_iter()
            .min_by(|a, b| (a - query).norm_squared().total_cmp(&(b - query).norm_squared()))
            .unwrap_or(apex);

        let closest = self.apex + self.axis * nearest.x + direction * nearest.y;
        let normal = if nearest.norm() <= EPSILON {
            -self.axis
        } else if height > self.length && (nearest.x - self.length).abs() <= EPSILON {
            self.axis
        } else {
            (point - closest).normalize_or_zero()
        };
        (closest, normal)
    }

    fn intersect(&self, start: Vec3, end: Vec3) -> Option<(Vec3, Vec3)> {
        if is_degenerate_segment(&(end - start)) {
            return None;
        }

        let inner_side = if self.inner_radius > 0.0 {
            self.side_crossing(start, end, Side::Inner)
        } else {
            None
        };

        [inner_side, self.apex_crossing(start, end), self.base_crossing(start, end)]
            .into_iter()
            .flatten()
            .fold(self.side_crossing(start, end, Side::Outer), Crossing::nearest)
            .map(Crossing::into_hit)
    }
}
