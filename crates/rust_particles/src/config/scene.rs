//! Scene descriptions
//!
//! A scene names a set of domains, lists the controllers to bind (referring
//! to domains by name) and optionally seeds an initial particle population.

use std::collections::BTreeMap;

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};
use crate::controller::{Bounce, Collector, Controller, Gravity, Lifetime, Magnet, Movement};
use crate::domain::{AABox, Cone, Cylinder, Disc, Domain, DomainError, Line, Plane, Point, SharedDomain, Sphere};
use crate::foundation::logging::{debug, info, warn};
use crate::foundation::math::{Color, Vec3};
use crate::particle::{Particle, ParticleGroup};

fn one() -> f32 {
    1.0
}

fn two() -> f32 {
    2.0
}

fn one_bounce() -> u32 {
    1
}

fn yes() -> bool {
    true
}

/// Serializable description of a domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum DomainDesc {
    /// Single point
    Point {
        /// Location
        point: Vec3,
    },
    /// Line segment
    Line {
        /// First end point
        start: Vec3,
        /// Second end point
        end: Vec3,
    },
    /// Infinite plane
    Plane {
        /// Any point on the plane
        point: Vec3,
        /// Normal, normalized on build
        normal: Vec3,
    },
    /// Axis-aligned box given by two opposite corners
    #[serde(rename = "aabox")]
    AABox {
        /// One corner
        min: Vec3,
        /// The opposite corner
        max: Vec3,
    },
    /// Sphere
    Sphere {
        /// Center
        center: Vec3,
        /// Outer radius
        outer_radius: f32,
        /// Inner radius (0 for solid)
        #[serde(default)]
        inner_radius: f32,
    },
    /// Disc
    Disc {
        /// Center
        center: Vec3,
        /// Normal, normalized on build
        normal: Vec3,
        /// Outer radius
        outer_radius: f32,
        /// Inner radius (0 for solid)
        #[serde(default)]
        inner_radius: f32,
    },
    /// Cylinder
    Cylinder {
        /// First end point
        end_point0: Vec3,
        /// Second end point
        end_point1: Vec3,
        /// Outer radius
        outer_radius: f32,
        /// Inner radius (0 for solid)
        #[serde(default)]
        inner_radius: f32,
    },
    /// Cone
    Cone {
        /// Apex
        apex: Vec3,
        /// Center of the base
        base: Vec3,
        /// Outer radius at the base
        outer_radius: f32,
        /// Inner radius at the base (0 for solid)
        #[serde(default)]
        inner_radius: f32,
    },
}

impl DomainDesc {
    /// Validate and construct the domain
    pub fn build(&self) -> Result<Domain, DomainError> {
        let domain = match *self {
            Self::Point { point } => Point::new(point).into(),
            Self::Line { start, end } => Line::new(start, end)?.into(),
            Self::Plane { point, normal } => Plane::new(point, normal)?.into(),
            Self::AABox { min, max } => AABox::new(min, max)?.into(),
            Self::Sphere {
                center,
                outer_radius,
                inner_radius,
            } => Sphere::new(center, outer_radius, inner_radius)?.into(),
            Self::Disc {
                center,
                normal,
                outer_radius,
                inner_radius,
            } => Disc::new(center, normal, outer_radius, inner_radius)?.into(),
            Self::Cylinder {
                end_point0,
                end_point1,
                outer_radius,
                inner_radius,
            } => Cylinder::new(end_point0, end_point1, outer_radius, inner_radius)?.into(),
            Self::Cone {
                apex,
                base,
                outer_radius,
                inner_radius,
            } => Cone::new(apex, base, outer_radius, inner_radius)?.into(),
        };
        Ok(domain)
    }
}

/// Serializable description of a controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControllerDesc {
    /// Constant acceleration
    Gravity {
        /// Acceleration vector
        acceleration: Vec3,
    },
    /// Velocity integration with optional damping and speed limits
    Movement {
        /// Per-axis velocity multiplier per second
        #[serde(default, skip_serializing_if = "Option::is_none")]
        damping: Option<Vec3>,
        /// Minimum speed
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_speed: Option<f32>,
        /// Maximum speed
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_speed: Option<f32>,
    },
    /// Kill particles past an age
    Lifetime {
        /// Age in seconds
        max_age: f32,
    },
    /// Bounce off a named domain
    Bounce {
        /// Domain name
        domain: String,
        /// Restitution coefficient
        #[serde(default = "one")]
        bounce: f32,
        /// Friction coefficient
        #[serde(default)]
        friction: f32,
        /// Reflections allowed per particle per frame
        #[serde(default = "one_bounce")]
        max_bounces: u32,
    },
    /// Attract toward a named domain
    Magnet {
        /// Domain name
        domain: String,
        /// Strength; negative repels
        charge: f32,
        /// Distance falloff power
        #[serde(default = "two")]
        exponent: f32,
        /// Minimum distance that feels the force
        #[serde(default, skip_serializing_if = "Option::is_none")]
        inner_cutoff: Option<f32>,
        /// Maximum distance that feels the force
        #[serde(default, skip_serializing_if = "Option::is_none")]
        outer_cutoff: Option<f32>,
        /// Multiply the velocity change by the time step
        #[serde(default)]
        scale_by_time: bool,
    },
    /// Remove particles by membership of a named domain
    Collector {
        /// Domain name
        domain: String,
        /// Collect particles inside (true) or outside (false)
        #[serde(default = "yes")]
        collect_inside: bool,
    },
}

impl ControllerDesc {
    /// Construct the controller, resolving domain names through `domains`
    pub fn build(&self, domains: &BTreeMap<String, SharedDomain>) -> Result<Box<dyn Controller>, ConfigError> {
        let lookup = |name: &str| {
            domains
                .get(name)
                .cloned()
                .ok_or_else(|| ConfigError::UnknownDomain(name.to_string()))
        };

        let controller: Box<dyn Controller> = match self {
            Self::Gravity { acceleration } => Box::new(Gravity::new(*acceleration)),
            Self::Movement {
                damping,
                min_speed,
                max_speed,
            } => {
                let mut movement = Movement::new();
                if let Some(damping) = damping {
                    movement = movement.with_axis_damping(*damping)?;
                }
                if min_speed.is_some() || max_speed.is_some() {
                    movement = movement.with_speed_limits(min_speed.unwrap_or(0.0), max_speed.unwrap_or(f32::INFINITY))?;
                }
                Box::new(movement)
            }
            Self::Lifetime { max_age } => Box::new(Lifetime::new(*max_age)?),
            Self::Bounce {
                domain,
                bounce,
                friction,
                max_bounces,
            } => Box::new(
                Bounce::new(lookup(domain)?)
                    .with_coefficients(*bounce, *friction)?
                    .with_max_bounces(*max_bounces),
            ),
            Self::Magnet {
                domain,
                charge,
                exponent,
                inner_cutoff,
                outer_cutoff,
                scale_by_time,
            } => {
                let mut magnet = Magnet::new(lookup(domain)?, *charge)?.with_exponent(*exponent)?;
                if inner_cutoff.is_some() || outer_cutoff.is_some() {
                    let inner = inner_cutoff.unwrap_or(magnet.inner_cutoff());
                    let outer = outer_cutoff.unwrap_or(magnet.outer_cutoff());
                    magnet = magnet.with_cutoffs(inner, outer)?;
                }
                if *scale_by_time {
                    magnet = magnet.scaled_by_time();
                }
                Box::new(magnet)
            }
            Self::Collector { domain, collect_inside } => {
                let collector = Collector::new(lookup(domain)?);
                Box::new(if *collect_inside { collector } else { collector.collect_outside() })
            }
        };
        Ok(controller)
    }
}

/// Initial particle population drawn from two domains
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmitterDesc {
    /// Number of particles to create
    pub count: usize,
    /// Domain particle positions are drawn from
    pub position: DomainDesc,
    /// Domain particle velocities are drawn from
    pub velocity: DomainDesc,
    /// Particle color
    #[serde(default)]
    pub color: Color,
    /// Uniform particle size
    #[serde(default = "one")]
    pub size: f32,
}

/// Complete scene description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed for the initial population
    pub seed: u64,
    /// Seconds per frame
    pub time_step: f32,
    /// Number of frames to simulate
    pub frames: u32,
    /// Named domains
    pub domains: BTreeMap<String, DomainDesc>,
    /// Controllers in bind order
    pub controllers: Vec<ControllerDesc>,
    /// Initial population, if any
    pub particles: Option<EmitterDesc>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            time_step: 1.0 / 60.0,
            frames: 600,
            domains: BTreeMap::new(),
            controllers: Vec::new(),
            particles: None,
        }
    }
}

impl Config for SceneConfig {}

/// A built scene ready to simulate
#[derive(Debug)]
pub struct Scene {
    /// Domains by name; mutate them between frames to animate the scene
    pub domains: BTreeMap<String, SharedDomain>,
    /// Particle group with every configured controller bound
    pub group: ParticleGroup,
    /// Seconds per frame
    pub time_step: f32,
    /// Number of frames to simulate
    pub frames: u32,
}

impl Scene {
    /// Look up a domain by name
    pub fn domain(&self, name: &str) -> Option<&SharedDomain> {
        self.domains.get(name)
    }
}

impl SceneConfig {
    /// Validate the description and construct the scene
    pub fn build(&self) -> Result<Scene, ConfigError> {
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(ConfigError::Invalid(format!("time_step must be positive, got {}", self.time_step)));
        }
        if self.frames == 0 {
            warn!("scene has no frames to simulate");
        }

        let mut domains = BTreeMap::new();
        for (name, desc) in &self.domains {
            let domain = desc.build().map_err(|source| ConfigError::Domain {
                name: name.clone(),
                source,
            })?;
            debug!("domain `{name}`: {}", domain.kind());
            domains.insert(name.clone(), domain.into_shared());
        }

        let capacity = self.particles.as_ref().map_or(0, |emitter| emitter.count);
        let mut group = ParticleGroup::with_capacity(capacity);
        for desc in &self.controllers {
            group.bind_controller(desc.build(&domains)?);
        }

        if let Some(emitter) = &self.particles {
            let invalid = |source| ConfigError::Domain {
                name: "particles".to_string(),
                source,
            };
            let positions = emitter.position.build().map_err(invalid)?;
            let velocities = emitter.velocity.build().map_err(invalid)?;
            let mut rng = StdRng::seed_from_u64(self.seed);
            for _ in 0..emitter.count {
                let position = positions.generate_with(&mut rng);
                let velocity = velocities.generate_with(&mut rng);
                let particle = Particle::new(position, velocity)
                    .with_color(emitter.color)
                    .with_size(Vec3::repeat(emitter.size));
                group.new_particle(particle);
            }
        }

        info!(
            "scene built: {} domains, {} controllers, {} particles",
            domains.len(),
            group.controller_count(),
            group.len()
        );
        Ok(Scene {
            domains,
            group,
            time_step: self.time_step,
            frames: self.frames,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const BOUNCY: &str = r#"
seed = 7
time_step = 0.02
frames = 10

[domains.floor]
shape = "plane"
point = [0.0, 0.0, 0.0]
normal = [0.0, 1.0, 0.0]

[domains.bin]
shape = "aabox"
min = [-1.0, -1.0, -1.0]
max = [1.0, 1.0, 1.0]

[domains.ball]
shape = "sphere"
center = [0.0, 2.0, 0.0]
outer_radius = 0.5

[[controllers]]
type = "gravity"
acceleration = [0.0, -9.8, 0.0]

[[controllers]]
type = "movement"

[[controllers]]
type = "bounce"
domain = "floor"
bounce = 0.8
friction = 0.1

[[controllers]]
type = "magnet"
domain = "ball"
charge = -2.0
outer_cutoff = 3.0

[[controllers]]
type = "collector"
domain = "bin"
collect_inside = false

[particles]
count = 50

[particles.position]
shape = "aabox"
min = [-0.5, 0.5, -0.5]
max = [0.5, 0.9, 0.5]

[particles.velocity]
shape = "sphere"
center = [0.0, 0.0, 0.0]
outer_radius = 1.0
"#;

    #[test]
    fn test_parse_toml_scene() {
        let config = SceneConfig::from_toml_str(BOUNCY).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.frames, 10);
        assert_eq!(config.domains.len(), 3);
        assert_eq!(
            config.domains["ball"],
            DomainDesc::Sphere {
                center: Vec3::new(0.0, 2.0, 0.0),
                outer_radius: 0.5,
                inner_radius: 0.0,
            }
        );
        assert_eq!(
            config.controllers[2],
            ControllerDesc::Bounce {
                domain: "floor".to_string(),
                bounce: 0.8,
                friction: 0.1,
                max_bounces: 1,
            }
        );
        assert_eq!(config.controllers[1], ControllerDesc::Movement {
            damping: None,
            min_speed: None,
            max_speed: None,
        });
    }

    #[test]
    fn test_build_scene() {
        let scene = SceneConfig::from_toml_str(BOUNCY).unwrap().build().unwrap();
        assert_eq!(scene.domains.len(), 3);
        assert_eq!(scene.group.controller_count(), 5);
        assert_eq!(scene.group.len(), 50);
        assert_relative_eq!(scene.time_step, 0.02);

        let bin = scene.domain("bin").unwrap().borrow().clone();
        for (_, particle) in scene.group.iter() {
            assert!(bin.contains(particle.position));
            assert!(particle.velocity.norm() <= 1.0 + 1e-5);
        }
    }

    #[test]
    fn test_same_seed_same_population() {
        let config = SceneConfig::from_toml_str(BOUNCY).unwrap();
        let first: Vec<Vec3> = config.build().unwrap().group.iter().map(|(_, p)| p.position).collect();
        let second: Vec<Vec3> = config.build().unwrap().group.iter().map(|(_, p)| p.position).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_built_scene_runs() {
        crate::foundation::logging::init_for_tests();
        let mut scene = SceneConfig::from_toml_str(BOUNCY).unwrap().build().unwrap();
        for _ in 0..scene.frames {
            scene.group.update(scene.time_step).unwrap();
        }
        let bin = scene.domain("bin").unwrap().borrow().clone();
        assert!(scene.group.len() <= 50);
        for (_, particle) in scene.group.iter() {
            assert!(bin.contains(particle.position), "{:?}", particle.position);
            assert_relative_eq!(particle.age, 0.2, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_unknown_domain() {
        let mut config = SceneConfig::default();
        config.controllers.push(ControllerDesc::Collector {
            domain: "nowhere".to_string(),
            collect_inside: true,
        });
        assert!(matches!(config.build(), Err(ConfigError::UnknownDomain(name)) if name == "nowhere"));
    }

    #[test]
    fn test_invalid_domain_is_named() {
        let mut config = SceneConfig::default();
        config.domains.insert(
            "flat".to_string(),
            DomainDesc::Plane {
                point: Vec3::zeros(),
                normal: Vec3::zeros(),
            },
        );
        match config.build() {
            Err(ConfigError::Domain { name, source }) => {
                assert_eq!(name, "flat");
                assert_eq!(source, DomainError::ZeroNormal);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_controller_and_time_step() {
        let mut config = SceneConfig::default();
        config.controllers.push(ControllerDesc::Lifetime { max_age: -1.0 });
        assert!(matches!(config.build(), Err(ConfigError::Controller(_))));

        let config = SceneConfig {
            time_step: 0.0,
            ..SceneConfig::default()
        };
        assert!(matches!(config.build(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_toml_file_round_trip() {
        let config = SceneConfig::from_toml_str(BOUNCY).unwrap();
        let path = std::env::temp_dir().join(format!("rust_particles_scene_{}.toml", std::process::id()));
        config.save_to_file(&path).unwrap();
        let loaded = SceneConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            SceneConfig::default().save_to_file("scene.json"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            SceneConfig::load_from_file("scene.yaml"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }
}
