//! End-to-end scenarios
//!
//! Whole frames run through a group with several controllers bound, plus the
//! reference domain queries the controllers rely on.

use std::cell::Cell;
use std::rc::Rc;

use crate::controller::{Bounce, Collector, Gravity, Lifetime, Magnet, Movement};
use crate::domain::{AABox, Domain, Plane, Point, Sphere};
use crate::foundation::math::Vec3;
use crate::particle::{Particle, ParticleGroup};
use approx::assert_relative_eq;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Controller;

    const TOLERANCE: f32 = 1e-5;

    fn floor() -> Domain {
        Plane::new(Vec3::zeros(), Vec3::y()).unwrap().into()
    }

    #[test]
    fn test_segment_through_sphere() {
        let sphere: Domain = Sphere::new(Vec3::zeros(), 4.0, 0.0).unwrap().into();

        let (point, normal) = sphere.intersect(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(point, Vec3::new(-4.0, 0.0, 0.0), epsilon = TOLERANCE);
        assert_relative_eq!(normal, Vec3::new(-1.0, 0.0, 0.0), epsilon = TOLERANCE);

        let (point, normal) = sphere.intersect(Vec3::new(5.0, 0.0, 0.0), Vec3::new(-5.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(point, Vec3::new(4.0, 0.0, 0.0), epsilon = TOLERANCE);
        assert_relative_eq!(normal, Vec3::new(1.0, 0.0, 0.0), epsilon = TOLERANCE);
    }

    #[test]
    fn test_segment_into_box() {
        let aabox: Domain = AABox::new(Vec3::new(-3.0, -1.0, 0.0), Vec3::new(-2.0, 1.0, 3.0)).unwrap().into();
        let (point, normal) = aabox.intersect(Vec3::new(-4.0, 0.0, 1.0), Vec3::new(-2.0, 0.0, 1.0)).unwrap();
        assert_relative_eq!(point, Vec3::new(-3.0, 0.0, 1.0), epsilon = TOLERANCE);
        assert_relative_eq!(normal, Vec3::new(-1.0, 0.0, 0.0), epsilon = TOLERANCE);
    }

    #[test]
    fn test_particle_bounces_back_above_floor() {
        let mut bounce = Bounce::new(floor().into_shared());
        let mut group = ParticleGroup::new();
        let mut particle = Particle::new(Vec3::new(0.0, -0.5, 0.0), Vec3::new(0.0, -1.0, 0.0));
        particle.last_position = Vec3::y();
        let key = group.new_particle(particle);

        bounce.update(1.0, &mut group).unwrap();
        let particle = group.get(key).unwrap();
        assert_relative_eq!(particle.velocity, Vec3::y(), epsilon = TOLERANCE);
        assert_relative_eq!(particle.position, Vec3::new(0.0, 0.5, 0.0), epsilon = TOLERANCE);
    }

    #[test]
    fn test_magnet_pulls_toward_sphere_surface() {
        let sphere = Domain::from(Sphere::new(Vec3::zeros(), 5.0, 0.0).unwrap()).into_shared();
        let mut group = ParticleGroup::new();
        group.bind_controller(Box::new(Magnet::new(sphere, 100.0).unwrap().with_exponent(2.0).unwrap()));
        let key = group.new_particle(Particle::new(Vec3::new(10.0, 0.0, 0.0), Vec3::zeros()));

        group.update(1.0).unwrap();
        assert_relative_eq!(group.get(key).unwrap().velocity, Vec3::new(-4.0, 0.0, 0.0), epsilon = TOLERANCE);
    }

    #[test]
    fn test_full_frame_pipeline() {
        let far_box = Domain::from(AABox::new(Vec3::repeat(10.0), Vec3::repeat(11.0)).unwrap()).into_shared();
        let mut group = ParticleGroup::new();
        group.bind_controller(Box::new(Gravity::new(Vec3::new(0.0, -10.0, 0.0))));
        group.bind_controller(Box::new(Movement::new()));
        group.bind_controller(Box::new(Bounce::new(floor().into_shared())));
        group.bind_controller(Box::new(Collector::new(far_box)));
        let key = group.new_particle(Particle::new(Vec3::new(0.0, 0.05, 0.0), Vec3::new(0.0, -3.0, 0.0)));

        group.update(0.1).unwrap();
        let particle = group.get(key).unwrap();
        assert_relative_eq!(particle.last_position, Vec3::new(0.0, 0.05, 0.0));
        assert_relative_eq!(particle.last_velocity, Vec3::new(0.0, -3.0, 0.0));
        assert_relative_eq!(particle.velocity, Vec3::new(0.0, 4.0, 0.0), epsilon = TOLERANCE);
        assert_relative_eq!(particle.position, Vec3::new(0.0, 0.35, 0.0), epsilon = TOLERANCE);
        assert_relative_eq!(particle.age, 0.1);
    }

    #[test]
    fn test_group_drains_through_collector_and_lifetime() {
        let target = Domain::from(Sphere::new(Vec3::zeros(), 1.0, 0.0).unwrap()).into_shared();
        let collected = Rc::new(Cell::new(0_u32));
        let counter = collected.clone();

        let mut group = ParticleGroup::new();
        group.bind_controller(Box::new(Movement::new()));
        group.bind_controller(Box::new(
            Collector::new(target).with_callback(move |_, _| counter.set(counter.get() + 1)),
        ));
        group.bind_controller(Box::new(Lifetime::new(0.25).unwrap()));

        let runner = group.new_particle(Particle::new(Vec3::new(3.0, 0.0, 0.0), Vec3::new(-10.0, 0.0, 0.0)));
        let idler = group.new_particle(Particle::new(Vec3::repeat(5.0), Vec3::zeros()));

        group.update(0.1).unwrap();
        assert_eq!(group.len(), 2);
        assert_eq!(collected.get(), 0);

        group.update(0.1).unwrap();
        assert!(!group.contains(runner));
        assert!(group.contains(idler));
        assert_eq!(collected.get(), 1);

        group.update(0.1).unwrap();
        assert!(group.is_empty());
        assert_eq!(collected.get(), 1);
    }

    #[test]
    fn test_moving_domain_between_frames() {
        let target = Domain::from(Point::new(Vec3::zeros())).into_shared();
        let mut group = ParticleGroup::new();
        group.bind_controller(Box::new(Magnet::new(target.clone(), 4.0).unwrap()));
        let key = group.new_particle(Particle::new(Vec3::new(0.0, 2.0, 0.0), Vec3::zeros()));

        group.update(0.1).unwrap();
        assert_relative_eq!(group.get(key).unwrap().velocity, Vec3::new(0.0, -1.0, 0.0), epsilon = TOLERANCE);

        *target.borrow_mut() = Point::new(Vec3::new(0.0, 4.0, 0.0)).into();
        group.update(0.1).unwrap();
        assert_relative_eq!(group.get(key).unwrap().velocity, Vec3::zeros(), epsilon = TOLERANCE);
    }
}
