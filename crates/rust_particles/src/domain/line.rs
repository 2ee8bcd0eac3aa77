//! Line segment domain

use rand::{Rng, RngCore};

use super::surface::validate_vector;
use super::{DomainError, Shape};
use crate::foundation::math::{utils, Vec3, Vec3Ext};

/// A straight segment between two points
///
/// Lines have no interior, so `contains` is always false and segments never
/// register a crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    start_point: Vec3,
    end_point: Vec3,
}

impl Line {
    /// Create a line segment
    pub fn new(start_point: Vec3, end_point: Vec3) -> Result<Self, DomainError> {
        validate_vector("start_point", &start_point)?;
        validate_vector("end_point", &end_point)?;
        Ok(Self { start_point, end_point })
    }

    /// First end point
    pub const fn start_point(&self) -> Vec3 {
        self.start_point
    }

    /// Second end point
    pub const fn end_point(&self) -> Vec3 {
        self.end_point
    }

    /// Move the first end point
    pub fn set_start_point(&mut self, point: Vec3) -> Result<(), DomainError> {
        validate_vector("start_point", &point)?;
        self.start_point = point;
        Ok(())
    }

    /// Move the second end point
    pub fn set_end_point(&mut self, point: Vec3) -> Result<(), DomainError> {
        validate_vector("end_point", &point)?;
        self.end_point = point;
        Ok(())
    }
}

impl Shape for Line {
    fn generate_with(&self, rng: &mut dyn RngCore) -> Vec3 {
        let t: f32 = rng.gen();
        self.start_point.lerp(&self.end_point, t)
    }

    fn contains(&self, _point: Vec3) -> bool {
        false
    }

    fn closest_point_to(&self, point: Vec3) -> (Vec3, Vec3) {
        let span = self.end_point - self.start_point;
        let offset = point - self.start_point;
        let length_squared = span.norm_squared();
        if length_squared == 0.0 {
            return (self.start_point, offset.normalize_or_zero());
        }

        let t = utils::clamp(offset.dot(&span) / length_squared, 0.0, 1.0);
        let direction = span / length_squared.sqrt();
        (
            self.start_point + span * t,
            offset.reject_from(&direction).normalize_or_zero(),
        )
    }

    fn intersect(&self, _start: Vec3, _end: Vec3) -> Option<(Vec3, Vec3)> {
        None
    }
}
