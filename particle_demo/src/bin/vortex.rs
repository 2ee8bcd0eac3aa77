//! Vortex demo
//!
//! A steady stream of particles pours into a hollow funnel whose apex
//! wobbles around the vertical axis. Particles slide down the inside of the
//! funnel, are drawn toward its axis and a nucleus hovering above the spout,
//! and are collected at the spout.

use std::cell::Cell;
use std::rc::Rc;

use particle_demo::{DemoError, GroupStats};
use rand::{rngs::StdRng, SeedableRng};
use rust_particles::foundation::logging::{self, debug, error, info};
use rust_particles::foundation::math::constants::TAU;
use rust_particles::prelude::*;

const FRAMES: u32 = 1200;
const TIME_STEP: f32 = 1.0 / 60.0;
const SPAWN_PER_FRAME: usize = 8;
const REPORT_INTERVAL: u32 = 120;
const WOBBLE_RADIUS: f32 = 0.4;
const WOBBLE_PERIOD: f32 = 5.0;

fn apex_at(time: f32) -> Vec3 {
    let angle = TAU * time / WOBBLE_PERIOD;
    Vec3::new(WOBBLE_RADIUS * angle.cos(), 0.0, WOBBLE_RADIUS * angle.sin())
}

fn run() -> Result<(), DemoError> {
    let base = Vec3::new(0.0, 4.0, 0.0);
    let funnel = Domain::from(Cone::new(apex_at(0.0), base, 3.0, 3.0)?).into_shared();
    let axis = Domain::from(Line::new(apex_at(0.0), base)?).into_shared();
    let spout = Domain::from(Sphere::new(apex_at(0.0), 0.3, 0.0)?).into_shared();
    let nucleus = Domain::from(Sphere::new(apex_at(0.0) + Vec3::new(0.0, 1.0, 0.0), 0.4, 0.0)?).into_shared();

    let source = Domain::from(Disc::new(Vec3::new(0.0, 5.0, 0.0), Vec3::y(), 2.0, 1.5)?);
    let jitter = Domain::from(Sphere::new(Vec3::new(0.0, -1.0, 0.0), 0.5, 0.0)?);

    let collected = Rc::new(Cell::new(0_u64));
    let counter = collected.clone();

    let mut group = ParticleGroup::with_capacity(SPAWN_PER_FRAME * FRAMES as usize);
    group.bind_controller(Box::new(Gravity::new(Vec3::new(0.0, -9.8, 0.0))));
    group.bind_controller(Box::new(Magnet::new(axis.clone(), 3.0)?.with_exponent(1.0)?.with_cutoffs(0.2, 3.0)?.scaled_by_time()));
    // Long-range pull into the nucleus, short-range push off its surface
    group.bind_controller(Box::new(Magnet::new(nucleus.clone(), 2.0)?.with_cutoffs(0.05, 4.0)?.scaled_by_time()));
    group.bind_controller(Box::new(
        Magnet::new(nucleus.clone(), -0.05)?.with_exponent(3.0)?.with_cutoffs(0.05, 0.5)?.scaled_by_time(),
    ));
    group.bind_controller(Box::new(Movement::new().with_damping(0.8)?.with_speed_limits(0.0, 12.0)?));
    group.bind_controller(Box::new(Bounce::new(funnel.clone()).with_coefficients(0.3, 0.1)?.with_max_bounces(3)));
    group.bind_controller(Box::new(
        Collector::new(spout.clone()).with_callback(move |_, _| counter.set(counter.get() + 1)),
    ));
    group.bind_controller(Box::new(Lifetime::new(15.0)?));

    let mut rng = StdRng::seed_from_u64(2024);
    info!("Simulating {FRAMES} frames, {SPAWN_PER_FRAME} new particles per frame");

    for frame in 1..=FRAMES {
        let time = frame as f32 * TIME_STEP;
        let apex = apex_at(time);

        // Move the funnel and everything attached to its spout
        if let Domain::Cone(cone) = &mut *funnel.borrow_mut() {
            cone.set_apex(apex)?;
        }
        if let Domain::Line(line) = &mut *axis.borrow_mut() {
            line.set_start_point(apex)?;
        }
        *spout.borrow_mut() = Sphere::new(apex, 0.3, 0.0)?.into();
        if let Domain::Sphere(sphere) = &mut *nucleus.borrow_mut() {
            sphere.set_center(apex + Vec3::new(0.0, 1.0, 0.0))?;
        }
        debug!("frame {frame}: apex at {:?}", apex);

        for _ in 0..SPAWN_PER_FRAME {
            let particle = Particle::new(source.generate_with(&mut rng), jitter.generate_with(&mut rng))
                .with_color(Color::rgb(0.2, 0.9, 0.6).lerp(&Color::WHITE, time / (FRAMES as f32 * TIME_STEP)));
            group.new_particle(particle);
        }

        group.update(TIME_STEP)?;

        if frame % REPORT_INTERVAL == 0 {
            GroupStats::measure(&group).log(frame);
        }
    }

    info!("{} particles collected at the spout, {} still in flight", collected.get(), group.len());
    Ok(())
}

fn main() {
    logging::init();
    info!("Starting vortex demo");

    if let Err(e) = run() {
        error!("Demo failed: {e}");
        std::process::exit(1);
    }
}
