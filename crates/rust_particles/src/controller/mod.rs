//! Particle controllers
//!
//! A controller is bound to a [`ParticleGroup`] and runs once per
//! [`ParticleGroup::update`]. Each pass works from a snapshot of the group's
//! particle keys, so particles killed during the pass are skipped and
//! particles created during it wait for the next frame.

mod bounce;
mod collector;
mod magnet;
mod motion;

pub use bounce::{Bounce, BounceCallback, BounceEvent};
pub use collector::{CollectCallback, CollectEvent, Collector};
pub use magnet::Magnet;
pub use motion::{Gravity, Lifetime, Movement};

use crate::particle::{GroupError, ParticleGroup};

/// Behavior applied to a particle group every frame
pub trait Controller {
    /// Apply one frame of `time_delta` seconds to `group`
    fn update(&mut self, time_delta: f32, group: &mut ParticleGroup) -> Result<(), GroupError>;
}

/// Any `FnMut(time_delta, group)` closure can act as a controller
impl<F> Controller for F
where
    F: FnMut(f32, &mut ParticleGroup) -> Result<(), GroupError>,
{
    fn update(&mut self, time_delta: f32, group: &mut ParticleGroup) -> Result<(), GroupError> {
        self(time_delta, group)
    }
}

/// Errors raised when configuring a controller
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ControllerError {
    /// A coefficient was NaN or infinite
    #[error("{name} must be finite (got {value})")]
    NonFinite {
        /// Name of the offending parameter
        name: &'static str,
        /// Value that was rejected
        value: f32,
    },

    /// A parameter that must not be negative was
    #[error("{name} must not be negative (got {value})")]
    Negative {
        /// Name of the offending parameter
        name: &'static str,
        /// Value that was rejected
        value: f32,
    },

    /// Upper bound of a range below its lower bound
    #[error("{name} range is inverted: {max} < {min}")]
    InvertedRange {
        /// Name of the range
        name: &'static str,
        /// Lower bound
        min: f32,
        /// Upper bound
        max: f32,
    },
}

pub(crate) fn require_finite(name: &'static str, value: f32) -> Result<f32, ControllerError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ControllerError::NonFinite { name, value })
    }
}

pub(crate) fn require_non_negative(name: &'static str, value: f32) -> Result<f32, ControllerError> {
    if value.is_nan() {
        return Err(ControllerError::NonFinite { name, value });
    }
    if value < 0.0 {
        return Err(ControllerError::Negative { name, value });
    }
    Ok(value)
}
