//! Flat circular disc domain

use rand::RngCore;

use super::surface::{
    is_degenerate_segment, on_segment, random_annulus_radius, random_in_plane, unit_normal,
    validate_radii, validate_vector,
};
use super::{DomainError, Shape, EPSILON};
use crate::foundation::math::{utils, Vec3, Vec3Ext};

/// Flat disc, annulus or ring lying in a plane
///
/// `right` and `up` span the disc plane and are rebuilt whenever the normal
/// changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disc {
    center: Vec3,
    normal: Vec3,
    outer_radius: f32,
    inner_radius: f32,
    right: Vec3,
    up: Vec3,
}

impl Disc {
    /// Create a disc; pass `inner_radius = 0` for a solid disc
    pub fn new(center: Vec3, normal: Vec3, outer_radius: f32, inner_radius: f32) -> Result<Self, DomainError> {
        validate_vector("center", &center)?;
        validate_radii(outer_radius, inner_radius)?;
        let normal = unit_normal(&normal)?;
        let (right, up) = normal.orthonormal_basis();
        Ok(Self {
            center,
            normal,
            outer_radius,
            inner_radius,
            right,
            up,
        })
    }

    /// Center point
    pub const fn center(&self) -> Vec3 {
        self.center
    }

    /// Unit normal
    pub const fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Outer radius
    pub const fn outer_radius(&self) -> f32 {
        self.outer_radius
    }

    /// Inner radius; zero for a solid disc
    pub const fn inner_radius(&self) -> f32 {
        self.inner_radius
    }

    /// In-plane basis vectors `(right, up)`
    pub const fn basis(&self) -> (Vec3, Vec3) {
        (self.right, self.up)
    }

    /// Move the disc
    pub fn set_center(&mut self, center: Vec3) -> Result<(), DomainError> {
        validate_vector("center", &center)?;
        self.center = center;
        Ok(())
    }

    /// Reorient the disc and rebuild its basis
    pub fn set_normal(&mut self, normal: Vec3) -> Result<(), DomainError> {
        let normal = unit_normal(&normal)?;
        let (right, up) = normal.orthonormal_basis();
        self.normal = normal;
        self.right = right;
        self.up = up;
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

    /// Height above the disc plane and in-plane offset from the center
    fn local(&self, point: Vec3) -> (f32, Vec3) {
        let offset = point - self.center;
        let height = offset.dot(&self.normal);
        (height, offset - self.normal * height)
    }

    fn within_radii(&self, radial_distance: f32) -> bool {
        self.inner_radius - EPSILON <= radial_distance && radial_distance <= self.outer_radius + EPSILON
    }
}

impl Shape for Disc {
    fn generate_with(&self, rng: &mut dyn RngCore) -> Vec3 {
        let radius = random_annulus_radius(rng, self.inner_radius, self.outer_radius);
        self.center + random_in_plane(rng, &self.right, &self.up) * radius
    }

    fn contains(&self, point: Vec3) -> bool {
        let (height, radial) = self.local(point);
        height.abs() <= EPSILON && self.within_radii(radial.norm())
    }

    fn closest_point_to(&self, point: Vec3) -> (Vec3, Vec3) {
        let (_, radial) = self.local(point);
        let radial_distance = radial.norm();

        if radial_distance < EPSILON && self.inner_radius > 0.0 {
            // On the axis of an annulus the whole inner rim is equally close
            return (self.center, Vec3::zeros());
        }

        let clamped = utils::clamp(radial_distance, self.inner_radius, self.outer_radius);
        let closest = self.center + radial.normalize_or_zero() * clamped;
        (closest, (point - closest).normalize_or_zero())
    }

    fn intersect(&self, start: Vec3, end: Vec3) -> Option<(Vec3, Vec3)> {
        let direction = end - start;
        if is_degenerate_segment(&direction) {
            return None;
        }

        let denom = self.normal.dot(&direction);
        if denom.abs() < f32::EPSILON {
            return None;
        }

        let t = (self.center - start).dot(&self.normal) / denom;
        if !on_segment(t) {
            return None;
        }

        let point = start + direction * t;
        let (_, radial) = self.local(point);
        if !self.within_radii(radial.norm()) {
            return None;
        }

        let normal = if denom > 0.0 { -self.normal } else { self.normal };
        Some((point, normal))
    }
}
