//! Infinite plane domain

use rand::RngCore;

use super::surface::{is_degenerate_segment, on_segment, unit_normal, validate_vector};
use super::{DomainError, Shape};
use crate::foundation::math::Vec3;

/// Infinite plane through a point with a unit normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    point: Vec3,
    normal: Vec3,
    /// Signed offset of the plane from the origin along `normal`
    d: f32,
}

impl Plane {
    /// Create a plane; the normal is normalized and must not be zero
    pub fn new(point: Vec3, normal: Vec3) -> Result<Self, DomainError> {
        validate_vector("point", &point)?;
        let normal = unit_normal(&normal)?;
        Ok(Self {
            point,
            normal,
            d: point.dot(&normal),
        })
    }

    /// Point the plane passes through
    pub const fn point(&self) -> Vec3 {
        self.point
    }

    /// Unit normal
    pub const fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Signed distance of the plane from the origin
    pub const fn offset(&self) -> f32 {
        self.d
    }

    /// Move the plane so it passes through `point`
    pub fn set_point(&mut self, point: Vec3) -> Result<(), DomainError> {
        *self = Self::new(point, self.normal)?;
        Ok(())
    }

    /// Reorient the plane
    pub fn set_normal(&mut self, normal: Vec3) -> Result<(), DomainError> {
        *self = Self::new(self.point, normal)?;
        Ok(())
    }

    /// Signed distance from the plane to `point`
    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.normal.dot(&point) - self.d
    }
}

impl Shape for Plane {
    fn generate_with(&self, _rng: &mut dyn RngCore) -> Vec3 {
        self.point
    }

    fn contains(&self, _point: Vec3) -> bool {
        false
    }

    fn closest_point_to(&self, point: Vec3) -> (Vec3, Vec3) {
        let distance = self.distance_to(point);
        let normal = if distance < 0.0 { -self.normal } else { self.normal };
        (point - self.normal * distance, normal)
    }

    fn intersect(&self, start: Vec3, end: Vec3) -> Option<(Vec3, Vec3)> {
        let direction = end - start;
        if is_degenerate_segment(&direction) {
            return None;
        }

        let denom = self.normal.dot(&direction);
        if denom.abs() < f32::EPSILON {
            // Parallel to the plane, including segments lying in it
            return None;
        }

        let t = (self.d - self.normal.dot(&start)) / denom;
        if !on_segment(t) {
            return None;
        }

        let normal = if denom > 0.0 { -self.normal } else { self.normal };
        Some((start + direction * t, normal))
    }
}
