use hecs::{Entity, World};

use crate::components::{masks_allow, Body, Collision, Motion, Shape};

use super::{plane_sphere, probe, sphere_sphere, CollisionDetector, Probe};

/// Brute-force all-pairs detector for the space-shooter mode: spheres and
/// planes only.
///
/// The outer loop skips perfectly still bodies — a body that is not moving
/// cannot start a new contact this tick, though it is still found as the
/// inner partner of something that is. The flip side is documented
/// behavior, not a defect: two overlapping bodies that are both still
/// (e.g. spawned intersecting) stay unreported until one of them moves.
pub struct ShooterDetector;

impl ShooterDetector {
    /// Whether a body qualifies to drive the outer loop.
    fn initiates(body: &Body) -> bool {
        body.collisions_enabled
            && body.motion == Motion::Dynamic
            && body.velocity.length_squared() > f32::EPSILON
    }

    fn narrow(&self, one: &Probe, two: &Probe) -> Option<Collision> {
        match (one.body.shape, two.body.shape) {
            (Shape::Sphere { radius: r1 }, Shape::Sphere { radius: r2 }) => {
                sphere_sphere(one, r1, two, r2)
            }
            (Shape::Sphere { radius }, Shape::Plane { normal, offset }) => {
                plane_sphere(one, radius, two, normal, offset, false)
            }
            (Shape::Plane { normal, offset }, Shape::Sphere { radius }) => {
                plane_sphere(two, radius, one, normal, offset, true)
            }
            _ => {
                #[cfg(debug_assertions)]
                log::warn!(
                    "shooter detector cannot pair {:?} with {:?}",
                    one.body.shape,
                    two.body.shape
                );
                None
            }
        }
    }
}

impl CollisionDetector for ShooterDetector {
    fn detect(&self, world: &World, entities: &[Entity]) -> Vec<Collision> {
        let probes: Vec<Probe> = entities.iter().filter_map(|&e| probe(world, e)).collect();

        let mut collisions = Vec::new();
        for (i, one) in probes.iter().enumerate() {
            if !Self::initiates(&one.body) {
                continue;
            }
            for (j, two) in probes.iter().enumerate() {
                if j == i {
                    continue;
                }
                if !two.body.collisions_enabled {
                    continue;
                }
                if !masks_allow(&one.body, &two.body) {
                    continue;
                }
                // The pair already reported when `two` drove the outer loop.
                if j < i && Self::initiates(&two.body) {
                    continue;
                }
                if let Some(collision) = self.narrow(one, two) {
                    collisions.push(collision);
                }
            }
        }
        collisions
    }

    fn detect_pairs(&self, world: &World, pairs: &[(Entity, Entity)]) -> Vec<Collision> {
        let mut collisions = Vec::new();
        for &(a, b) in pairs {
            if a == b {
                continue;
            }
            let (Some(one), Some(two)) = (probe(world, a), probe(world, b)) else {
                continue;
            };
            if !one.body.collisions_enabled || !two.body.collisions_enabled {
                continue;
            }
            if !masks_allow(&one.body, &two.body) {
                continue;
            }
            if let Some(collision) = self.narrow(&one, &two) {
                collisions.push(collision);
            }
        }
        collisions
    }
}
