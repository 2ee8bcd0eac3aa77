//! Particles and particle groups

mod group;
#[allow(clippy::module_inception)]
mod particle;

pub use group::{GroupError, ParticleGroup, ParticleKey};
pub use particle::Particle;
