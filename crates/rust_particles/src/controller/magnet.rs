//! Inverse-power attraction toward a domain

use super::{require_finite, require_non_negative, Controller, ControllerError};
use crate::domain::{SharedDomain, EPSILON};
use crate::particle::{GroupError, ParticleGroup};

/// Pulls particles toward (or pushes them away from) the nearest point of a domain
///
/// Each frame a particle at distance `r` from the domain gains velocity
/// `charge / r^exponent` directed at the closest point. A negative charge
/// repels. Particles closer than `inner_cutoff` or farther than
/// `outer_cutoff` are left alone.
#[derive(Debug)]
pub struct Magnet {
    domain: SharedDomain,
    charge: f32,
    exponent: f32,
    inner_cutoff: f32,
    outer_cutoff: f32,
    scale_by_time: bool,
}

impl Magnet {
    /// Inverse-square magnet with no outer cutoff
    pub fn new(domain: SharedDomain, charge: f32) -> Result<Self, ControllerError> {
        Ok(Self {
            domain,
            charge: require_finite("charge", charge)?,
            exponent: 2.0,
            inner_cutoff: EPSILON,
            outer_cutoff: f32::INFINITY,
            scale_by_time: false,
        })
    }

    /// Use `charge / r^exponent` for the force falloff
    pub fn with_exponent(mut self, exponent: f32) -> Result<Self, ControllerError> {
        self.exponent = require_finite("exponent", exponent)?;
        Ok(self)
    }

    /// Restrict the force to distances in `(inner, outer]`
    pub fn with_cutoffs(mut self, inner: f32, outer: f32) -> Result<Self, ControllerError> {
        self.set_cutoffs(inner, outer)?;
        Ok(self)
    }

    /// Multiply the velocity change by the frame's time delta
    pub fn scaled_by_time(mut self) -> Self {
        self.scale_by_time = true;
        self
    }

    /// Strength of the magnet; negative values repel
    pub fn charge(&self) -> f32 {
        self.charge
    }

    /// Power of the distance in the falloff
    pub fn exponent(&self) -> f32 {
        self.exponent
    }

    /// Distances at or below this receive no force
    pub fn inner_cutoff(&self) -> f32 {
        self.inner_cutoff
    }

    /// Distances above this receive no force
    pub fn outer_cutoff(&self) -> f32 {
        self.outer_cutoff
    }

    /// Domain the particles are drawn to
    pub fn domain(&self) -> &SharedDomain {
        &self.domain
    }

    /// Change the charge
    pub fn set_charge(&mut self, charge: f32) -> Result<(), ControllerError> {
        self.charge = require_finite("charge", charge)?;
        Ok(())
    }

    /// Change both cutoffs; the magnet is left untouched on error
    pub fn set_cutoffs(&mut self, inner: f32, outer: f32) -> Result<(), ControllerError> {
        let inner = require_non_negative("inner_cutoff", inner)?;
        let outer = require_non_negative("outer_cutoff", outer)?;
        if outer < inner {
            return Err(ControllerError::InvertedRange {
                name: "cutoff",
                min: inner,
                max: outer,
            });
        }
        self.inner_cutoff = inner;
        self.outer_cutoff = outer;
        Ok(())
    }
}

impl Controller for Magnet {
    fn update(&mut self, time_delta: f32, group: &mut ParticleGroup) -> Result<(), GroupError> {
        let domain = self.domain.borrow().clone();
        let scale = if self.scale_by_time { time_delta } else { 1.0 };

        for (_, particle) in group.iter_mut() {
            let (target, _) = domain.closest_point_to(particle.position);
            let offset = target - particle.position;
            let distance = offset.norm();
            if distance <= self.inner_cutoff || distance > self.outer_cutoff {
                continue;
            }
            let magnitude = self.charge / distance.powf(self.exponent);
            particle.velocity += offset / distance * (magnitude * scale);
        }
        Ok(())
    }
}
