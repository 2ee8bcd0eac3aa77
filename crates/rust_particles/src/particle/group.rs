//! Particle group
//!
//! Owns the live particles of one simulation and the controllers bound to
//! them. Particles are addressed through generational [`ParticleKey`]s, so a
//! key held across a `kill` goes stale instead of aliasing a new particle.

use std::fmt;

use slotmap::{new_key_type, SlotMap};

use super::Particle;
use crate::controller::Controller;
use crate::foundation::logging::{debug, trace};

new_key_type! {
    /// Stable handle to a particle in a [`ParticleGroup`]
    pub struct ParticleKey;
}

/// Errors raised by group operations
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GroupError {
    /// The key refers to a particle that was already removed
    #[error("particle {0:?} is no longer in the group")]
    StaleParticle(ParticleKey),
}

/// A set of particles updated together by a list of controllers
pub struct ParticleGroup {
    particles: SlotMap<ParticleKey, Particle>,
    controllers: Vec<Box<dyn Controller>>,
}

impl ParticleGroup {
    /// Create an empty group with no controllers
    pub fn new() -> Self {
        Self {
            particles: SlotMap::with_key(),
            controllers: Vec::new(),
        }
    }

    /// Create an empty group with room for `capacity` particles
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            particles: SlotMap::with_capacity_and_key(capacity),
            controllers: Vec::new(),
        }
    }

    /// Add a particle and return its key
    pub fn new_particle(&mut self, particle: Particle) -> ParticleKey {
        self.particles.insert(particle)
    }

    /// Remove a particle, returning its final state
    pub fn kill(&mut self, key: ParticleKey) -> Result<Particle, GroupError> {
        self.particles.remove(key).ok_or(GroupError::StaleParticle(key))
    }

    /// Number of live particles
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// True when the group holds no particles
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// True when `key` refers to a live particle
    pub fn contains(&self, key: ParticleKey) -> bool {
        self.particles.contains_key(key)
    }

    /// Snapshot of the keys of every live particle
    ///
    /// Controllers iterate over this snapshot so that particles killed or
    /// created during a pass do not disturb it.
    pub fn keys(&self) -> Vec<ParticleKey> {
        self.particles.keys().collect()
    }

    /// Look up a particle
    pub fn get(&self, key: ParticleKey) -> Option<&Particle> {
        self.particles.get(key)
    }

    /// Look up a particle for modification
    pub fn get_mut(&mut self, key: ParticleKey) -> Option<&mut Particle> {
        self.particles.get_mut(key)
    }

    /// Iterate over live particles
    pub fn iter(&self) -> impl Iterator<Item = (ParticleKey, &Particle)> {
        self.particles.iter()
    }

    /// Iterate mutably over live particles
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ParticleKey, &mut Particle)> {
        self.particles.iter_mut()
    }

    /// Remove every particle
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Append a controller; controllers run in the order they were bound
    pub fn bind_controller(&mut self, controller: Box<dyn Controller>) {
        self.controllers.push(controller);
        debug!("bound controller #{}", self.controllers.len());
    }

    /// Number of bound controllers
    pub fn controller_count(&self) -> usize {
        self.controllers.len()
    }

    /// Advance the group by `time_delta` seconds
    ///
    /// Every particle ages and records its current position and velocity as
    /// the frame's starting state, then each controller runs once. The first
    /// controller error stops the pass.
    pub fn update(&mut self, time_delta: f32) -> Result<(), GroupError> {
        for particle in self.particles.values_mut() {
            particle.begin_frame(time_delta);
        }

        // Controllers need `&mut self`, so detach them for the pass
        let mut controllers = std::mem::take(&mut self.controllers);
        let result = controllers
            .iter_mut()
            .try_for_each(|controller| controller.update(time_delta, self));

        // Keep anything a callback bound during the pass
        controllers.append(&mut self.controllers);
        self.controllers = controllers;

        trace!("group update: dt={time_delta} particles={}", self.particles.len());
        result
    }
}

impl Default for ParticleGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ParticleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParticleGroup")
            .field("particles", &self.particles.len())
            .field("controllers", &self.controllers.len())
            .finish()
    }
}
