//! Single point domain

use rand::RngCore;

use super::Shape;
use crate::foundation::math::{Vec3, Vec3Ext};

/// A domain consisting of one point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    point: Vec3,
}

impl Point {
    /// Create a point domain
    pub const fn new(point: Vec3) -> Self {
        Self { point }
    }

    /// The point
    pub const fn point(&self) -> Vec3 {
        self.point
    }

    /// Move the point
    pub fn set_point(&mut self, point: Vec3) {
        self.point = point;
    }
}

impl Shape for Point {
    fn generate_with(&self, _rng: &mut dyn RngCore) -> Vec3 {
        self.point
    }

    fn contains(&self, point: Vec3) -> bool {
        point == self.point
    }

    fn closest_point_to(&self, point: Vec3) -> (Vec3, Vec3) {
        (self.point, (point - self.point).normalize_or_zero())
    }

    fn intersect(&self, _start: Vec3, _end: Vec3) -> Option<(Vec3, Vec3)> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_point_generate_contains() {
        let point = Point::new(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(point.generate_with(&mut rand::thread_rng()), Vec3::new(1.0, 2.0, 3.0));
        assert!(point.contains(Vec3::new(1.0, 2.0, 3.0)));
        assert!(!point.contains(Vec3::new(1.1, 2.0, 3.0)));
        assert!(!point.contains(Vec3::zeros()));
        assert!(point.intersect(Vec3::new(2.0, 2.0, 2.0), Vec3::new(3.0, 3.0, 3.0)).is_none());
    }

    #[test]
    fn test_point_closest_point_to() {
        let point = Point::new(Vec3::new(4.0, 5.0, 6.0));
        let cases = [
            (Vec3::new(4.0, 6.0, 6.0), Vec3::y()),
            (Vec3::new(0.0, 5.0, 6.0), -Vec3::x()),
            (Vec3::new(3.0, 4.0, 5.0), Vec3::new(-1.0, -1.0, -1.0).normalize()),
            (Vec3::new(4.0, 5.0, 6.0), Vec3::zeros()),
        ];
        for (query, normal) in cases {
            let (p, n) = point.closest_point_to(query);
            assert_relative_eq!(p, point.point());
            assert_relative_eq!(n, normal, epsilon = 1e-6);
        }
    }
}
