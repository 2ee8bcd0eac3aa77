//! Basic motion: gravity, integration and lifetime

use super::{require_finite, require_non_negative, Controller, ControllerError};
use crate::foundation::math::Vec3;
use crate::particle::{GroupError, ParticleGroup};

/// Constant acceleration applied to every particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gravity {
    /// Acceleration in units per second squared
    pub acceleration: Vec3,
}

impl Gravity {
    /// Create a gravity controller
    pub fn new(acceleration: Vec3) -> Self {
        Self { acceleration }
    }
}

impl Controller for Gravity {
    fn update(&mut self, time_delta: f32, group: &mut ParticleGroup) -> Result<(), GroupError> {
        let delta = self.acceleration * time_delta;
        for (_, particle) in group.iter_mut() {
            particle.velocity += delta;
        }
        Ok(())
    }
}

/// Moves particles along their velocity
///
/// Optionally damps velocity per axis and clamps particle speed before
/// integrating the position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Movement {
    damping: Vec3,
    min_speed: f32,
    max_speed: f32,
}

impl Movement {
    /// Undamped, unbounded movement
    pub fn new() -> Self {
        Self {
            damping: Vec3::new(1.0, 1.0, 1.0),
            min_speed: 0.0,
            max_speed: f32::INFINITY,
        }
    }

    /// Multiply velocity by `damping` per second on every axis
    pub fn with_damping(self, damping: f32) -> Result<Self, ControllerError> {
        self.with_axis_damping(Vec3::new(damping, damping, damping))
    }

    /// Multiply velocity by the matching `damping` component per second on each axis
    pub fn with_axis_damping(mut self, damping: Vec3) -> Result<Self, ControllerError> {
        for value in damping.iter() {
            require_non_negative("damping", require_finite("damping", *value)?)?;
        }
        self.damping = damping;
        Ok(self)
    }

    /// Keep particle speed within `[min_speed, max_speed]`
    ///
    /// Stationary particles have no direction and are not sped up.
    pub fn with_speed_limits(mut self, min_speed: f32, max_speed: f32) -> Result<Self, ControllerError> {
        let min_speed = require_non_negative("min_speed", min_speed)?;
        let max_speed = require_non_negative("max_speed", max_speed)?;
        if max_speed < min_speed {
            return Err(ControllerError::InvertedRange {
                name: "speed",
                min: min_speed,
                max: max_speed,
            });
        }
        self.min_speed = min_speed;
        self.max_speed = max_speed;
        Ok(self)
    }

    /// Per-axis damping factor
    pub fn damping(&self) -> Vec3 {
        self.damping
    }

    fn is_plain(&self) -> bool {
        self.damping == Vec3::new(1.0, 1.0, 1.0) && self.min_speed == 0.0 && self.max_speed == f32::INFINITY
    }

    fn limit(&self, velocity: Vec3) -> Vec3 {
        let speed = velocity.norm();
        if speed > self.max_speed {
            velocity * (self.max_speed / speed)
        } else if speed < self.min_speed && speed > 0.0 {
            velocity * (self.min_speed / speed)
        } else {
            velocity
        }
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for Movement {
    fn update(&mut self, time_delta: f32, group: &mut ParticleGroup) -> Result<(), GroupError> {
        if self.is_plain() {
            for (_, particle) in group.iter_mut() {
                particle.position += particle.velocity * time_delta;
            }
            return Ok(());
        }

        let damping = self.damping.map(|d| d.powf(time_delta));
        for (_, particle) in group.iter_mut() {
            particle.velocity = self.limit(particle.velocity.component_mul(&damping));
            particle.position += particle.velocity * time_delta;
        }
        Ok(())
    }
}

/// Kills particles once they reach a maximum age
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifetime {
    max_age: f32,
}

impl Lifetime {
    /// Kill particles whose age reaches `max_age` seconds
    pub fn new(max_age: f32) -> Result<Self, ControllerError> {
        Ok(Self {
            max_age: require_non_negative("max_age", max_age)?,
        })
    }

    /// Age at which particles are killed
    pub fn max_age(&self) -> f32 {
        self.max_age
    }
}

impl Controller for Lifetime {
    fn update(&mut self, _time_delta: f32, group: &mut ParticleGroup) -> Result<(), GroupError> {
        let expired: Vec<_> = group
            .iter()
            .filter(|(_, particle)| particle.age >= self.max_age)
            .map(|(key, _)| key)
            .collect();
        for key in expired {
            group.kill(key)?;
        }
        Ok(())
    }
}
