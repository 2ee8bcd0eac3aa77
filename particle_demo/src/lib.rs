//! Shared pieces of the particle demos
//!
//! The demos run headless: each one simulates a fixed number of frames and
//! logs group statistics at a regular interval.

use rust_particles::prelude::*;
use rust_particles::foundation::logging::info;

/// Errors a demo can stop with
#[derive(thiserror::Error, Debug)]
pub enum DemoError {
    /// Scene file could not be loaded or built
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A domain was given invalid parameters
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A controller was given invalid parameters
    #[error(transparent)]
    Controller(#[from] ControllerError),

    /// A frame update failed
    #[error(transparent)]
    Group(#[from] GroupError),
}

/// Snapshot of a particle group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupStats {
    /// Live particles
    pub count: usize,
    /// Mean particle speed
    pub mean_speed: f32,
    /// Lowest corner of the bounding box
    pub min: Vec3,
    /// Highest corner of the bounding box
    pub max: Vec3,
}

impl GroupStats {
    /// Measure a group
    pub fn measure(group: &ParticleGroup) -> Self {
        let mut stats = Self {
            count: 0,
            mean_speed: 0.0,
            min: Vec3::repeat(f32::INFINITY),
            max: Vec3::repeat(f32::NEG_INFINITY),
        };
        let mut total_speed = 0.0;
        for (_, particle) in group.iter() {
            stats.count += 1;
            total_speed += particle.velocity.norm();
            stats.min = stats.min.inf(&particle.position);
            stats.max = stats.max.sup(&particle.position);
        }
        if stats.count > 0 {
            stats.mean_speed = total_speed / stats.count as f32;
        } else {
            stats.min = Vec3::zeros();
            stats.max = Vec3::zeros();
        }
        stats
    }

    /// Log the snapshot at info level
    pub fn log(&self, frame: u32) {
        info!(
            "frame {frame:>5}: {} particles, mean speed {:.3}, bounds [{:.2}, {:.2}, {:.2}] .. [{:.2}, {:.2}, {:.2}]",
            self.count, self.mean_speed, self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_stats_of_empty_group() {
        let stats = GroupStats::measure(&ParticleGroup::new());
        assert_eq!(stats.count, 0);
        assert_eq!(stats.min, Vec3::zeros());
        assert_eq!(stats.max, Vec3::zeros());
    }

    #[test]
    fn test_stats_bounds_and_speed() {
        let mut group = ParticleGroup::new();
        group.new_particle(Particle::new(Vec3::new(-1.0, 2.0, 0.0), Vec3::new(3.0, 4.0, 0.0)));
        group.new_particle(Particle::new(Vec3::new(1.0, -2.0, 5.0), Vec3::new(0.0, 0.0, 1.0)));
        let stats = GroupStats::measure(&group);
        assert_eq!(stats.count, 2);
        assert_relative_eq!(stats.mean_speed, 3.0);
        assert_eq!(stats.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(stats.max, Vec3::new(1.0, 2.0, 5.0));
    }
}
