//! # Rust Particles
//!
//! A particle simulation core built around analytic geometric domains.
//!
//! ## Features
//!
//! - **Domains**: point, line, plane, box, sphere, disc, cylinder and cone
//!   regions that can sample points, test containment, find the closest
//!   surface point and intersect line segments
//! - **Controllers**: gravity, movement, lifetime, bounce, magnet and
//!   collector actions run once per frame over a particle group
//! - **Scenes**: TOML or RON descriptions that build a ready-to-run group
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rust_particles::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let floor = Domain::from(Plane::new(Vec3::zeros(), Vec3::y())?).into_shared();
//!
//!     let mut group = ParticleGroup::new();
//!     group.bind_controller(Box::new(Gravity::new(Vec3::new(0.0, -9.8, 0.0))));
//!     group.bind_controller(Box::new(Movement::new()));
//!     group.bind_controller(Box::new(Bounce::new(floor).with_coefficients(0.8, 0.1)?));
//!
//!     group.new_particle(Particle::new(Vec3::new(0.0, 1.0, 0.0), Vec3::x()));
//!     for _ in 0..120 {
//!         group.update(1.0 / 60.0)?;
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::missing_errors_doc
)]

pub mod config;
pub mod controller;
pub mod domain;
pub mod foundation;
pub mod particle;

#[cfg(test)]
mod tests;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, Scene, SceneConfig},
        controller::{Bounce, BounceEvent, CollectEvent, Collector, Controller, ControllerError, Gravity, Lifetime, Magnet, Movement},
        domain::{AABox, Cone, Cylinder, Disc, Domain, DomainError, Line, Plane, Point, Shape, SharedDomain, Sphere},
        foundation::math::{Color, Vec3, Vec3Ext},
        particle::{GroupError, Particle, ParticleGroup, ParticleKey},
    };
}
