//! Particle record
//!
//! A particle is a plain value. The group owns every live particle and hands
//! out [`ParticleKey`](super::ParticleKey)s for access.

use crate::foundation::math::{Color, Vec3};

/// A single simulated particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Current position
    pub position: Vec3,

    /// Current velocity in units per second
    pub velocity: Vec3,

    /// Position at the start of the current frame
    pub last_position: Vec3,

    /// Velocity at the start of the current frame
    pub last_velocity: Vec3,

    /// Render size along each axis
    pub size: Vec3,

    /// Up vector used to orient sprites
    pub up: Vec3,

    /// Rotation in radians around each axis
    pub rotation: Vec3,

    /// RGBA color
    pub color: Color,

    /// Mass (1.0 unless set)
    pub mass: f32,

    /// Seconds since the particle was created
    pub age: f32,
}

impl Particle {
    /// Create a particle at `position` moving with `velocity`
    ///
    /// `last_position` and `last_velocity` start equal to the current values
    /// so the first frame sees no motion history.
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self {
            position,
            velocity,
            last_position: position,
            last_velocity: velocity,
            size: Vec3::new(1.0, 1.0, 1.0),
            up: Vec3::y(),
            rotation: Vec3::zeros(),
            color: Color::WHITE,
            mass: 1.0,
            age: 0.0,
        }
    }

    /// Set the color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set the render size
    pub fn with_size(mut self, size: Vec3) -> Self {
        self.size = size;
        self
    }

    /// Set the mass
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Set the starting age
    pub fn with_age(mut self, age: f32) -> Self {
        self.age = age;
        self
    }

    /// Set the rotation and up vector
    pub fn with_orientation(mut self, up: Vec3, rotation: Vec3) -> Self {
        self.up = up;
        self.rotation = rotation;
        self
    }

    /// Distance travelled since the start of the frame
    pub fn displacement(&self) -> Vec3 {
        self.position - self.last_position
    }

    /// Record the current state as the start of a new frame
    pub(crate) fn begin_frame(&mut self, time_delta: f32) {
        self.age += time_delta;
        self.last_position = self.position;
        self.last_velocity = self.velocity;
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self::new(Vec3::zeros(), Vec3::zeros())
    }
}
