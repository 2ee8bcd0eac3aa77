//! Collision response against a domain surface

use std::fmt;

use super::{require_finite, Controller, ControllerError};
use crate::domain::{SharedDomain, EPSILON};
use crate::foundation::logging::{trace, warn};
use crate::foundation::math::Vec3;
use crate::particle::{GroupError, ParticleGroup, ParticleKey};

/// Details of one bounce, passed to the bounce callback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BounceEvent {
    /// Particle that bounced
    pub key: ParticleKey,
    /// Where the particle's path met the surface
    pub point: Vec3,
    /// Surface normal facing the side the particle came from
    pub normal: Vec3,
    /// Restitution coefficient in effect
    pub bounce: f32,
    /// Friction coefficient in effect
    pub friction: f32,
}

/// Called after each bounce, while the particle is still in the group
pub type BounceCallback = Box<dyn FnMut(&mut ParticleGroup, &BounceEvent)>;

/// Reflects particles whose path crossed the surface of a domain
///
/// The path tested each frame runs from `last_position` to `position`. At a
/// crossing the displacement past the surface is split into a normal part,
/// which is mirrored and scaled by `bounce`, and a tangential part, which is
/// scaled by `1 - friction`. Velocity is decomposed the same way.
pub struct Bounce {
    domain: SharedDomain,
    bounce: f32,
    friction: f32,
    max_bounces: u32,
    callback: Option<BounceCallback>,
}

impl Bounce {
    /// Perfectly elastic, frictionless bounce off `domain`
    pub fn new(domain: SharedDomain) -> Self {
        Self {
            domain,
            bounce: 1.0,
            friction: 0.0,
            max_bounces: 1,
            callback: None,
        }
    }

    /// Set the restitution and friction coefficients
    pub fn with_coefficients(mut self, bounce: f32, friction: f32) -> Result<Self, ControllerError> {
        self.set_bounce(bounce)?;
        self.set_friction(friction)?;
        Ok(self)
    }

    /// Allow up to `max_bounces` reflections per particle per frame
    ///
    /// More than one is needed when a fast particle can cross the surface
    /// again after reflecting, e.g. inside a box corner.
    pub fn with_max_bounces(mut self, max_bounces: u32) -> Self {
        self.max_bounces = max_bounces.max(1);
        self
    }

    /// Call `callback` after every bounce
    pub fn with_callback(mut self, callback: impl FnMut(&mut ParticleGroup, &BounceEvent) + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    /// Restitution coefficient
    pub fn bounce(&self) -> f32 {
        self.bounce
    }

    /// Friction coefficient
    pub fn friction(&self) -> f32 {
        self.friction
    }

    /// Maximum reflections per particle per frame
    pub fn max_bounces(&self) -> u32 {
        self.max_bounces
    }

    /// Domain the particles bounce off
    pub fn domain(&self) -> &SharedDomain {
        &self.domain
    }

    /// Change the restitution coefficient
    pub fn set_bounce(&mut self, bounce: f32) -> Result<(), ControllerError> {
        self.bounce = require_finite("bounce", bounce)?;
        if !(0.0..=1.0).contains(&self.bounce) {
            warn!("bounce coefficient {} outside [0, 1] adds energy on impact", self.bounce);
        }
        Ok(())
    }

    /// Change the friction coefficient
    pub fn set_friction(&mut self, friction: f32) -> Result<(), ControllerError> {
        self.friction = require_finite("friction", friction)?;
        if !(0.0..=1.0).contains(&self.friction) {
            warn!("friction coefficient {} outside [0, 1]", self.friction);
        }
        Ok(())
    }

    /// Split `vector` into normal and tangential parts and recombine them
    fn respond(&self, vector: Vec3, normal: &Vec3) -> Vec3 {
        let normal_part = normal * normal.dot(&vector);
        let tangential_part = vector - normal_part;
        -normal_part * self.bounce + tangential_part * (1.0 - self.friction)
    }
}

impl Controller for Bounce {
    fn update(&mut self, _time_delta: f32, group: &mut ParticleGroup) -> Result<(), GroupError> {
        let domain = self.domain.borrow().clone();

        for key in group.keys() {
            let Some(particle) = group.get(key) else {
                continue;
            };
            let was_inside = domain.contains(particle.last_position);
            let mut segment_start = particle.last_position;

            for _ in 0..self.max_bounces {
                let Some(particle) = group.get_mut(key) else {
                    break;
                };
                let Some((point, normal)) = domain.intersect(segment_start, particle.position) else {
                    break;
                };

                particle.position = point + self.respond(particle.position - point, &normal);
                particle.velocity = self.respond(particle.velocity, &normal);
                let is_inside = domain.contains(particle.position);
                trace!("bounce {key:?} at {point:?} normal {normal:?}");

                if let Some(callback) = self.callback.as_mut() {
                    let event = BounceEvent {
                        key,
                        point,
                        normal,
                        bounce: self.bounce,
                        friction: self.friction,
                    };
                    callback(group, &event);
                }

                if is_inside == was_inside {
                    break;
                }
                // Start just off the surface so the same crossing is not found again
                segment_start = point + normal * EPSILON;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Bounce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bounce")
            .field("domain", &self.domain.borrow().kind())
            .field("bounce", &self.bounce)
            .field("friction", &self.friction)
            .field("max_bounces", &self.max_bounces)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::domain::{AABox, Domain, Plane, Sphere};
    use crate::particle::Particle;
    use approx::assert_relative_eq;

    const TOLERANCE: f32 = 1e-5;

    fn floor() -> SharedDomain {
        Domain::from(Plane::new(Vec3::zeros(), Vec3::y()).unwrap()).into_shared()
    }

    /// Particle that moved from `last` to `position` this frame
    fn moved(last: Vec3, position: Vec3, velocity: Vec3) -> Particle {
        let mut particle = Particle::new(position, velocity);
        particle.last_position = last;
        particle
    }

    fn run(controller: &mut Bounce, particles: &[Particle]) -> (ParticleGroup, Vec<ParticleKey>) {
        let mut group = ParticleGroup::new();
        let keys = particles.iter().map(|p| group.new_particle(*p)).collect();
        controller.update(1.0, &mut group).unwrap();
        (group, keys)
    }

    #[test]
    fn test_elastic_bounce_off_plane() {
        let mut bounce = Bounce::new(floor());
        let (group, keys) = run(
            &mut bounce,
            &[
                moved(Vec3::y(), Vec3::zeros(), -Vec3::y()),
                moved(Vec3::y(), Vec3::new(0.0, -0.5, 0.0), Vec3::new(0.0, -1.5, 0.0)),
                moved(Vec3::new(-1.0, -1.0, 1.0), Vec3::new(1.0, 1.0, 1.0), Vec3::new(2.0, 2.0, 0.0)),
                moved(Vec3::new(1.0, 1.0, 1.0), Vec3::new(1.0, 2.0, 1.0), Vec3::y()),
            ],
        );

        // Ending exactly on the plane is a crossing at the end point
        let p = group.get(keys[0]).unwrap();
        assert_relative_eq!(p.position, Vec3::zeros(), epsilon = TOLERANCE);
        assert_relative_eq!(p.velocity, Vec3::y(), epsilon = TOLERANCE);

        let p = group.get(keys[1]).unwrap();
        assert_relative_eq!(p.position, Vec3::new(0.0, 0.5, 0.0), epsilon = TOLERANCE);
        assert_relative_eq!(p.velocity, Vec3::new(0.0, 1.5, 0.0), epsilon = TOLERANCE);

        // Crossing from below reflects back below
        let p = group.get(keys[2]).unwrap();
        assert_relative_eq!(p.position, Vec3::new(1.0, -1.0, 1.0), epsilon = TOLERANCE);
        assert_relative_eq!(p.velocity, Vec3::new(2.0, -2.0, 0.0), epsilon = TOLERANCE);

        // No crossing, untouched
        let p = group.get(keys[3]).unwrap();
        assert_eq!(p.position, Vec3::new(1.0, 2.0, 1.0));
        assert_eq!(p.velocity, Vec3::y());
    }

    #[test]
    fn test_restitution_and_friction() {
        let mut bounce = Bounce::new(floor()).with_coefficients(0.5, 0.25).unwrap();
        let (group, keys) = run(
            &mut bounce,
            &[moved(Vec3::new(0.0, 1.0, 0.0), Vec3::new(2.0, -1.0, 0.0), Vec3::new(2.0, -2.0, 0.0))],
        );
        let p = group.get(keys[0]).unwrap();
        // Crossing at (1, 0, 0); overshoot (1, -1, 0)
        assert_relative_eq!(p.position, Vec3::new(1.75, 0.5, 0.0), epsilon = TOLERANCE);
        assert_relative_eq!(p.velocity, Vec3::new(1.5, 1.0, 0.0), epsilon = TOLERANCE);
    }

    #[test]
    fn test_zero_bounce_stops_on_surface() {
        let mut bounce = Bounce::new(floor()).with_coefficients(0.0, 0.0).unwrap();
        let (group, keys) = run(&mut bounce, &[moved(Vec3::y(), Vec3::new(0.0, -3.0, 0.0), Vec3::new(0.0, -4.0, 0.0))]);
        let p = group.get(keys[0]).unwrap();
        assert_relative_eq!(p.position, Vec3::zeros(), epsilon = TOLERANCE);
        assert_relative_eq!(p.velocity, Vec3::zeros(), epsilon = TOLERANCE);
    }

    #[test]
    fn test_energy_never_grows_for_unit_coefficients() {
        let sphere = Domain::from(Sphere::new(Vec3::zeros(), 2.0, 0.0).unwrap()).into_shared();
        for (bounce, friction) in [(1.0, 0.0), (0.5, 0.5), (0.0, 1.0), (0.8, 0.1)] {
            let mut controller = Bounce::new(sphere.clone()).with_coefficients(bounce, friction).unwrap();
            let velocity = Vec3::new(3.0, 1.0, -0.5);
            let (group, keys) = run(&mut controller, &[moved(Vec3::new(-3.0, 0.2, 0.1), Vec3::new(0.0, 1.0, -0.4), velocity)]);
            let p = group.get(keys[0]).unwrap();
            assert!(p.velocity.norm() <= velocity.norm() + TOLERANCE);
        }
    }

    #[test]
    fn test_callback_sees_reflected_particle() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        let mut bounce = Bounce::new(floor()).with_callback(move |group, event| {
            let position = group.get(event.key).map(|p| p.position);
            sink.borrow_mut().push((*event, position));
        });
        let (_, keys) = run(&mut bounce, &[moved(Vec3::y(), Vec3::new(0.0, -0.5, 0.0), -Vec3::y())]);

        let events = events.borrow();
        assert_eq!(events.len(), 1);
        let (event, position) = events[0];
        assert_eq!(event.key, keys[0]);
        assert_relative_eq!(event.point, Vec3::zeros(), epsilon = TOLERANCE);
        assert_relative_eq!(event.normal, Vec3::y(), epsilon = TOLERANCE);
        assert_eq!(event.bounce, 1.0);
        assert_relative_eq!(position.unwrap(), Vec3::new(0.0, 0.5, 0.0), epsilon = TOLERANCE);
    }

    #[test]
    fn test_callback_may_kill_particle() {
        let mut bounce = Bounce::new(floor()).with_max_bounces(4).with_callback(|group, event| {
            group.kill(event.key).unwrap();
        });
        let (group, _) = run(&mut bounce, &[moved(Vec3::y(), -Vec3::y(), -Vec3::y())]);
        assert!(group.is_empty());
    }

    #[test]
    fn test_multi_bounce_keeps_particle_in_box() {
        let aabox = Domain::from(AABox::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0)).unwrap()).into_shared();
        let count = Rc::new(RefCell::new(0));
        let counter = count.clone();

        // Heads into the corner fast enough to cross two faces in one frame
        let particle = moved(Vec3::new(0.5, 0.5, 0.5), Vec3::new(1.3, 1.2, 0.5), Vec3::new(0.8, 0.7, 0.0));

        let mut single = Bounce::new(aabox.clone());
        let (group, keys) = run(&mut single, &[particle]);
        assert!(!aabox.borrow().contains(group.get(keys[0]).unwrap().position));

        let mut multi = Bounce::new(aabox.clone()).with_max_bounces(4).with_callback(move |_, _| {
            *counter.borrow_mut() += 1;
        });
        let (group, keys) = run(&mut multi, &[particle]);
        let p = group.get(keys[0]).unwrap();
        assert!(aabox.borrow().contains(p.position), "{:?}", p.position);
        assert_relative_eq!(p.position, Vec3::new(0.7, 0.8, 0.5), epsilon = 1e-3);
        assert_relative_eq!(p.velocity, Vec3::new(-0.8, -0.7, 0.0), epsilon = TOLERANCE);
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn test_coefficients_must_be_finite() {
        assert!(Bounce::new(floor()).with_coefficients(f32::NAN, 0.0).is_err());
        assert!(Bounce::new(floor()).with_coefficients(1.0, f32::INFINITY).is_err());
        // Out-of-range but finite values are allowed
        let bounce = Bounce::new(floor()).with_coefficients(1.5, -0.5).unwrap();
        assert_eq!(bounce.bounce(), 1.5);
        assert_eq!(bounce.friction(), -0.5);
    }

    #[test]
    fn test_domain_changes_apply_next_pass() {
        let domain = floor();
        let mut bounce = Bounce::new(domain.clone());
        *domain.borrow_mut() = Domain::from(Plane::new(Vec3::new(0.0, -10.0, 0.0), Vec3::y()).unwrap());
        let (group, keys) = run(&mut bounce, &[moved(Vec3::y(), -Vec3::y(), -Vec3::y())]);
        assert_eq!(group.get(keys[0]).unwrap().position, -Vec3::y());
    }
}
