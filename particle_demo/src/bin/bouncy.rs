//! Bouncy demo
//!
//! Particles fall inside a closed room, bounce off a sphere and the walls
//! and drain through a hole in the floor. Pass a `.toml` or `.ron` scene
//! file to replace the built-in scene.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use particle_demo::{DemoError, GroupStats};
use rust_particles::config::{ControllerDesc, DomainDesc, EmitterDesc};
use rust_particles::foundation::logging::{self, error, info};
use rust_particles::prelude::*;

const REPORT_INTERVAL: u32 = 60;

fn default_scene() -> SceneConfig {
    let mut domains = BTreeMap::new();
    domains.insert(
        "room".to_string(),
        DomainDesc::AABox {
            min: Vec3::new(-4.0, 0.0, -4.0),
            max: Vec3::new(4.0, 8.0, 4.0),
        },
    );
    domains.insert(
        "ball".to_string(),
        DomainDesc::Sphere {
            center: Vec3::new(0.0, 1.5, 0.0),
            outer_radius: 1.0,
            inner_radius: 0.0,
        },
    );
    domains.insert(
        "drain".to_string(),
        DomainDesc::Cylinder {
            end_point0: Vec3::new(3.0, -0.5, 0.0),
            end_point1: Vec3::new(3.0, 0.1, 0.0),
            outer_radius: 0.75,
            inner_radius: 0.0,
        },
    );
    domains.insert(
        "arena".to_string(),
        DomainDesc::AABox {
            min: Vec3::new(-10.0, -1.0, -10.0),
            max: Vec3::new(10.0, 20.0, 10.0),
        },
    );

    SceneConfig {
        seed: 42,
        frames: 900,
        domains,
        controllers: vec![
            ControllerDesc::Gravity {
                acceleration: Vec3::new(0.0, -9.8, 0.0),
            },
            ControllerDesc::Movement {
                damping: Some(Vec3::repeat(0.9)),
                min_speed: None,
                max_speed: Some(20.0),
            },
            ControllerDesc::Bounce {
                domain: "ball".to_string(),
                bounce: 0.9,
                friction: 0.05,
                max_bounces: 2,
            },
            ControllerDesc::Bounce {
                domain: "room".to_string(),
                bounce: 0.6,
                friction: 0.2,
                max_bounces: 3,
            },
            ControllerDesc::Collector {
                domain: "arena".to_string(),
                collect_inside: false,
            },
            ControllerDesc::Lifetime { max_age: 12.0 },
        ],
        particles: Some(EmitterDesc {
            count: 500,
            position: DomainDesc::Disc {
                center: Vec3::new(0.0, 5.0, 0.0),
                normal: Vec3::y(),
                outer_radius: 0.5,
                inner_radius: 0.0,
            },
            velocity: DomainDesc::Sphere {
                center: Vec3::new(1.0, 0.0, 0.0),
                outer_radius: 0.5,
                inner_radius: 0.0,
            },
            color: Color::rgb(0.3, 0.6, 1.0),
            size: 0.05,
        }),
        ..SceneConfig::default()
    }
}

fn run() -> Result<(), DemoError> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading scene from {path}");
            SceneConfig::load_from_file(&path)?
        }
        None => {
            info!("Using built-in scene");
            default_scene()
        }
    };

    let mut scene = config.build()?;

    // The drain is counted separately so its tally can be reported
    let drained = Rc::new(Cell::new(0_u64));
    if let Some(drain) = scene.domain("drain").cloned() {
        let counter = drained.clone();
        let collector = Collector::new(drain).with_callback(move |_, _| counter.set(counter.get() + 1));
        scene.group.bind_controller(Box::new(collector));
    }

    info!("Simulating {} frames at {:.4}s per frame", scene.frames, scene.time_step);
    for frame in 1..=scene.frames {
        scene.group.update(scene.time_step)?;
        if frame % REPORT_INTERVAL == 0 || frame == scene.frames {
            GroupStats::measure(&scene.group).log(frame);
        }
    }
    info!("{} particles drained, {} remaining", drained.get(), scene.group.len());
    Ok(())
}

fn main() {
    logging::init();
    info!("Starting bouncy demo");

    if let Err(e) = run() {
        error!("Demo failed: {e}");
        std::process::exit(1);
    }
}
