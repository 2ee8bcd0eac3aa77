//! Axis-aligned box domain

use rand::{Rng, RngCore};

use super::surface::{is_degenerate_segment, validate_vector, Crossing};
use super::{DomainError, Shape};
use crate::foundation::math::{Vec3, Vec3Ext};

/// Faces in evaluation order as `(axis, is_max_face)`: top, left, bottom,
/// right, far, near. Equal-`t` hits resolve to the earlier face.
const FACES: [(usize, bool); 6] = [
    (1, true),
    (0, false),
    (1, false),
    (0, true),
    (2, true),
    (2, false),
];

/// Axis-aligned rectangular box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABox {
    min: Vec3,
    max: Vec3,
}

impl AABox {
    /// Create a box from any two opposite corners
    pub fn new(corner1: Vec3, corner2: Vec3) -> Result<Self, DomainError> {
        validate_vector("corner", &corner1)?;
        validate_vector("corner", &corner2)?;
        Ok(Self {
            min: corner1.inf(&corner2),
            max: corner1.sup(&corner2),
        })
    }

    /// Minimum corner
    pub const fn min(&self) -> Vec3 {
        self.min
    }

    /// Maximum corner
    pub const fn max(&self) -> Vec3 {
        self.max
    }

    /// Edge lengths along each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    fn face_crossing(&self, start: Vec3, end: Vec3, axis: usize, is_max: bool) -> Option<Crossing> {
        let level = if is_max { self.max[axis] } else { self.min[axis] };
        let beyond = |v: f32| if is_max { v > level } else { v < level };

        let start_beyond = beyond(start[axis]);
        if start_beyond == beyond(end[axis]) {
            return None;
        }

        let direction = end - start;
        let t = (level - start[axis]) / direction[axis];
        let mut point = start + direction * t;
        point[axis] = level;

        let within_face = (0..3)
            .filter(|&other| other != axis)
            .all(|other| self.min[other] <= point[other] && point[other] <= self.max[other]);
        if !within_face {
            return None;
        }

        let mut outward = Vec3::zeros();
        outward[axis] = if is_max { 1.0 } else { -1.0 };
        let normal = if start_beyond { outward } else { -outward };
        Some(Crossing { t, point, normal })
    }
}

impl Shape for AABox {
    fn generate_with(&self, rng: &mut dyn RngCore) -> Vec3 {
        let unit = Vec3::new(rng.gen(), rng.gen(), rng.gen());
        self.min + self.size().component_mul(&unit)
    }

    fn contains(&self, point: Vec3) -> bool {
        (0..3).all(|axis| self.min[axis] <= point[axis] && point[axis] <= self.max[axis])
    }

    fn closest_point_to(&self, point: Vec3) -> (Vec3, Vec3) {
        let clamped = point.sup(&self.min).inf(&self.max);
        (clamped, (point - clamped).normalize_or_zero())
    }

    fn intersect(&self, start: Vec3, end: Vec3) -> Option<(Vec3, Vec3)> {
        if is_degenerate_segment(&(end - start)) {
            return None;
        }

        FACES
            .iter()
            .filter_map(|&(axis, is_max)| self.face_crossing(start, end, axis, is_max))
            .fold(None, Crossing::nearest)
            .map(Crossing::into_hit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    const EPSILON: f32 = 1e-5;

    fn test_box() -> AABox {
        AABox::new(Vec3::new(-3.0, -1.0, 0.0), Vec3::new(-2.0, 1.0, 3.0)).unwrap()
    }

    #[test]
    fn test_corners_are_ordered() {
        let aabox = AABox::new(Vec3::new(-2.0, 1.0, 0.0), Vec3::new(-3.0, -1.0, 3.0)).unwrap();
        assert_eq!(aabox.min(), Vec3::new(-3.0, -1.0, 0.0));
        assert_eq!(aabox.max(), Vec3::new(-2.0, 1.0, 3.0));
    }

    #[test]
    fn test_generate_contains() {
        let aabox = test_box();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let p = aabox.generate_with(&mut rng);
            assert!(aabox.contains(p), "{p:?}");
        }
        for corner in [
            Vec3::new(-3.0, -1.0, 0.0),
            Vec3::new(-3.0, 1.0, 0.0),
            Vec3::new(-2.0, 1.0, 3.0),
            Vec3::new(-2.0, -1.0, 0.0),
            Vec3::new(-2.5, 0.0, 0.0),
        ] {
            assert!(aabox.contains(corner));
        }
        assert!(!aabox.contains(Vec3::new(-3.0, -3.0, -3.0)));
        assert!(!aabox.contains(Vec3::new(-3.0, 2.0, 3.0)));
    }

    #[test]
    fn test_intersect_each_face() {
        let aabox = test_box();
        let cases = [
            ((-4.0, 0.0, 1.0), (-2.0, 0.0, 1.0), (-3.0, 0.0, 1.0), (-1.0, 0.0, 0.0)),
            ((-2.5, -2.0, 2.0), (-2.5, -0.5, 2.0), (-2.5, -1.0, 2.0), (0.0, -1.0, 0.0)),
            ((-2.8, 0.5, -1.0), (-2.8, 0.5, 1.0), (-2.8, 0.5, 0.0), (0.0, 0.0, -1.0)),
            ((-1.0, 0.0, 1.0), (-2.0, 0.0, 1.0), (-2.0, 0.0, 1.0), (1.0, 0.0, 0.0)),
            ((-2.5, 2.0, 2.0), (-2.5, 1.0, 2.0), (-2.5, 1.0, 2.0), (0.0, 1.0, 0.0)),
            ((-2.8, 0.5, 4.0), (-2.8, 0.5, 1.0), (-2.8, 0.5, 3.0), (0.0, 0.0, 1.0)),
        ];
        for (start, end, point, normal) in cases {
            let start = Vec3::new(start.0, start.1, start.2);
            let end = Vec3::new(end.0, end.1, end.2);
            let point = Vec3::new(point.0, point.1, point.2);
            let normal = Vec3::new(normal.0, normal.1, normal.2);
            assert!(!aabox.contains(start));
            assert!(aabox.contains(end));

            let (p, n) = aabox.intersect(start, end).unwrap();
            assert_relative_eq!(p, point, epsilon = EPSILON);
            assert_relative_eq!(n, normal, epsilon = EPSILON);

            let (p, n) = aabox.intersect(end, start).unwrap();
            assert_relative_eq!(p, point, epsilon = EPSILON);
            assert_relative_eq!(n, -normal, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_grazing_intersect_takes_nearest_face() {
        let aabox = test_box();
        let (p, n) = aabox.intersect(Vec3::new(-4.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 1.0)).unwrap();
        assert_eq!(p, Vec3::new(-3.0, 0.0, 1.0));
        assert_eq!(n, Vec3::new(-1.0, 0.0, 0.0));
        let (p, n) = aabox.intersect(Vec3::new(0.0, 0.0, 1.0), Vec3::new(-4.0, 0.0, 1.0)).unwrap();
        assert_eq!(p, Vec3::new(-2.0, 0.0, 1.0));
        assert_eq!(n, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_no_intersect() {
        let aabox = test_box();
        assert!(aabox.intersect(Vec3::new(-4.0, 2.0, 1.0), Vec3::new(-2.0, 2.0, 1.0)).is_none());
        assert!(aabox.intersect(Vec3::new(-2.0, 0.0, 1.0), Vec3::new(-2.8, 0.5, 1.0)).is_none());
        assert!(aabox.intersect(Vec3::new(-2.5, 0.0, 1.0), Vec3::new(-2.5, 0.0, 1.0)).is_none());
    }

    #[test]
    fn test_segments_lying_in_faces() {
        let aabox = test_box();
        let segments = [
            ((-3.0, 0.0, 1.0), (-3.0, 0.5, 2.0)),
            ((-2.5, -1.0, 2.0), (-2.0, -1.0, 2.0)),
            ((-2.8, 0.5, 0.0), (-2.5, 0.5, 0.0)),
            ((-2.0, 0.0, 1.0), (-2.0, 0.5, 2.0)),
            ((-2.5, 1.0, 2.0), (-2.5, 1.0, 1.0)),
            ((-2.8, 0.5, 3.0), (-2.9, 0.5, 3.0)),
        ];
        for (start, end) in segments {
            let start = Vec3::new(start.0, start.1, start.2);
            let end = Vec3::new(end.0, end.1, end.2);
            assert!(aabox.intersect(start, end).is_none(), "{start:?} -> {end:?}");
        }
    }

    #[test]
    fn test_closest_point_to() {
        let aabox = test_box();
        let (p, n) = aabox.closest_point_to(Vec3::new(-2.5, 0.0, 1.0));
        assert_eq!(p, Vec3::new(-2.5, 0.0, 1.0));
        assert_eq!(n, Vec3::zeros());

        let (p, n) = aabox.closest_point_to(Vec3::new(-2.5, 5.0, 1.0));
        assert_relative_eq!(p, Vec3::new(-2.5, 1.0, 1.0));
        assert_relative_eq!(n, Vec3::y());

        let (p, n) = aabox.closest_point_to(Vec3::new(0.0, 3.0, 1.0));
        assert_relative_eq!(p, Vec3::new(-2.0, 1.0, 1.0));
        assert_relative_eq!(n, Vec3::new(1.0, 1.0, 0.0).normalize(), epsilon = EPSILON);
    }
}
