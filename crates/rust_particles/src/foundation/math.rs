//! Math utilities and types
//!
//! Provides the vector and color types shared by domains, particles and
//! controllers.

use serde::{Deserialize, Serialize};

pub use nalgebra::Vector3;

/// 3D vector type, also used for positions
pub type Vec3 = Vector3<f32>;

/// RGBA color with floating point channels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
    /// Alpha channel
    pub a: f32,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Fully transparent black
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create a new color
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Return a copy with every channel clamped to `[lo, hi]`
    #[must_use]
    pub fn clamp(&self, lo: f32, hi: f32) -> Self {
        Self {
            r: utils::clamp(self.r, lo, hi),
            g: utils::clamp(self.g, lo, hi),
            b: utils::clamp(self.b, lo, hi),
            a: utils::clamp(self.a, lo, hi),
        }
    }

    /// Channel-wise linear interpolation
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            r: utils::lerp(self.r, other.r, t),
            g: utils::lerp(self.g, other.g, t),
            b: utils::lerp(self.b, other.b, t),
            a: utils::lerp(self.a, other.a, t),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl std::ops::Add for Color {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b, self.a + rhs.a)
    }
}

impl std::ops::Mul<f32> for Color {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.r * rhs, self.g * rhs, self.b * rhs, self.a * rhs)
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;
}

/// Math utility functions
pub mod utils {
    /// Clamp a value between min and max
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value < min { min } else if value > max { max } else { value }
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }
}

/// Extension trait for Vec3 with additional convenience methods
pub trait Vec3Ext {
    /// Unit vector in the same direction, or the zero vector for a zero input
    fn normalize_or_zero(&self) -> Vec3;

    /// Mirror this vector about the plane with the given unit normal
    fn reflect(&self, normal: &Vec3) -> Vec3;

    /// Component of this vector perpendicular to the unit `axis`
    fn reject_from(&self, axis: &Vec3) -> Vec3;

    /// Two unit vectors that form a right-handed orthonormal basis with this one
    fn orthonormal_basis(&self) -> (Vec3, Vec3);
}

impl Vec3Ext for Vec3 {
    fn normalize_or_zero(&self) -> Vec3 {
        self.try_normalize(0.0).unwrap_or_else(Vec3::zeros)
    }

    fn reflect(&self, normal: &Vec3) -> Vec3 {
        self - normal * (2.0 * self.dot(normal))
    }

    fn reject_from(&self, axis: &Vec3) -> Vec3 {
        self - axis * self.dot(axis)
    }

    fn orthonormal_basis(&self) -> (Vec3, Vec3) {
        let axis = self.normalize_or_zero();
        // Cross with whichever world axis is least aligned to stay well conditioned
        let helper = if axis.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
        let right = axis.cross(&helper).normalize_or_zero();
        let up = axis.cross(&right);
        (right, up)
    }
}
