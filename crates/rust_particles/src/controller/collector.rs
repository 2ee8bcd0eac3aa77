//! Removes particles that enter (or leave) a domain

use std::fmt;

use super::Controller;
use crate::domain::SharedDomain;
use crate::foundation::logging::trace;
use crate::particle::{GroupError, ParticleGroup, ParticleKey};

/// Details of one collection, passed to the collect callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectEvent {
    /// Particle about to be removed
    pub key: ParticleKey,
    /// Particles collected before this one
    pub collected_count: u64,
}

/// Called before a collected particle is killed
pub type CollectCallback = Box<dyn FnMut(&mut ParticleGroup, &CollectEvent)>;

/// Kills particles by domain membership and keeps a running count
pub struct Collector {
    domain: SharedDomain,
    collect_inside: bool,
    callback: Option<CollectCallback>,
    collected_count: u64,
}

impl Collector {
    /// Collect particles inside `domain`
    pub fn new(domain: SharedDomain) -> Self {
        Self {
            domain,
            collect_inside: true,
            callback: None,
            collected_count: 0,
        }
    }

    /// Collect particles outside the domain instead
    pub fn collect_outside(mut self) -> Self {
        self.collect_inside = false;
        self
    }

    /// Call `callback` for each particle just before it is killed
    pub fn with_callback(mut self, callback: impl FnMut(&mut ParticleGroup, &CollectEvent) + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    /// True when particles inside the domain are collected
    pub fn collects_inside(&self) -> bool {
        self.collect_inside
    }

    /// Particles collected since creation or the last reset
    pub fn collected_count(&self) -> u64 {
        self.collected_count
    }

    /// Zero the running count
    pub fn reset_count(&mut self) {
        self.collected_count = 0;
    }

    /// Domain that decides collection
    pub fn domain(&self) -> &SharedDomain {
        &self.domain
    }
}

impl Controller for Collector {
    fn update(&mut self, _time_delta: f32, group: &mut ParticleGroup) -> Result<(), GroupError> {
        let domain = self.domain.borrow().clone();

        for key in group.keys() {
            let Some(particle) = group.get(key) else {
                continue;
            };
            if domain.contains(particle.position) != self.collect_inside {
                continue;
            }

            if let Some(callback) = self.callback.as_mut() {
                let event = CollectEvent {
                    key,
                    collected_count: self.collected_count,
                };
                callback(group, &event);
            }
            group.kill(key)?;
            self.collected_count += 1;
            trace!("collected {key:?} (total {})", self.collected_count);
        }
        Ok(())
    }
}

impl fmt::Debug for Collector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collector")
            .field("domain", &self.domain.borrow().kind())
            .field("collect_inside", &self.collect_inside)
            .field("collected_count", &self.collected_count)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}
