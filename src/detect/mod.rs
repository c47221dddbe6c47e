mod geometry;
mod mesh;
mod sphere;

pub use geometry::{CollisionMesh, MeshStore};
pub use mesh::MeshDetector;
pub use sphere::ShooterDetector;

use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{world_position, Body, Collision};

/// Reports all current overlaps among the given entities as fresh
/// [`Collision`] records. Detection is a pure read: it never mutates
/// entity state. Records hold the pair in detection order, with the
/// contact normal pointing from the second entity toward the first.
pub trait CollisionDetector {
    fn detect(&self, world: &World, entities: &[Entity]) -> Vec<Collision>;

    /// Narrow-phase only: test pairs someone else already selected.
    /// Eligibility (enabled flags, masks) is still enforced.
    fn detect_pairs(&self, world: &World, pairs: &[(Entity, Entity)]) -> Vec<Collision>;
}

/// Per-entity snapshot taken before pair testing, so the inner loops work
/// on plain copies instead of repeated component lookups.
pub(crate) struct Probe {
    pub entity: Entity,
    pub position: Vec3,
    pub body: Body,
}

pub(crate) fn probe(world: &World, entity: Entity) -> Option<Probe> {
    let position = world_position(world, entity)?;
    let body = *world.get::<&Body>(entity).ok()?;
    Some(Probe {
        entity,
        position,
        body,
    })
}

/// Tolerance on the squared-radius comparison: slightly oversized hit
/// spheres catch fast-moving approaches the exact test would miss.
pub(crate) const RADIUS_SLOP: f32 = 1.05;

/// Sphere-sphere overlap with a cheap per-axis rejection before the exact
/// squared-distance test. Normal points from `two` toward `one`; coincident
/// centers produce the zero normal ("nothing meaningful to resolve").
pub(crate) fn sphere_sphere(one: &Probe, r1: f32, two: &Probe, r2: f32) -> Option<Collision> {
    let radius_sum = r1 + r2;
    let diff = one.position - two.position;
    // Per-axis rejection box, widened by the same slop as the exact test.
    let reach = radius_sum * RADIUS_SLOP;
    if diff.x.abs() > reach || diff.y.abs() > reach || diff.z.abs() > reach {
        return None;
    }

    let dist_sq = diff.length_squared();
    if dist_sq > radius_sum * radius_sum * RADIUS_SLOP {
        return None;
    }

    let dist = dist_sq.sqrt();
    let normal = if dist > 1e-6 { diff / dist } else { Vec3::ZERO };
    let depth = (radius_sum - dist).max(0.0);
    Some(Collision::new(one.entity, two.entity, normal, depth))
}

/// Sphere (`sphere`) against an infinite plane (`plane_normal`/`offset`).
/// `flip` is set when the plane is the *first* entity of the pair, so the
/// returned normal still points from the second entity toward the first.
pub(crate) fn plane_sphere(
    sphere: &Probe,
    radius: f32,
    plane: &Probe,
    plane_normal: Vec3,
    offset: f32,
    flip: bool,
) -> Option<Collision> {
    let dist = sphere.position.dot(plane_normal) - offset;
    let depth = radius - dist;
    if depth <= 0.0 {
        return None;
    }
    if flip {
        Some(Collision::new(plane.entity, sphere.entity, -plane_normal, depth))
    } else {
        Some(Collision::new(sphere.entity, plane.entity, plane_normal, depth))
    }
}
