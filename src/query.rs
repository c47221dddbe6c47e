use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{world_position, Body, Shape};

pub struct RayHit {
    pub entity: Entity,
    pub distance: f32,
    pub point: Vec3,
}

/// Cast a ray against every collision-enabled body, returning the nearest
/// hit within `max_distance`. Used by gameplay (aiming, grabbing, camera
/// occlusion), not by the tick itself.
///
/// Mesh shapes are skipped here; level geometry queries go through the
/// detector that owns the mesh store.
pub fn raycast(
    world: &World,
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
) -> Option<RayHit> {
    let dir = direction.normalize_or_zero();
    if dir == Vec3::ZERO {
        return None;
    }

    let mut best: Option<RayHit> = None;
    for (entity, body) in world.query::<&Body>().iter() {
        if !body.collisions_enabled {
            continue;
        }
        let Some(center) = world_position(world, entity) else {
            continue;
        };

        let t = match body.shape {
            Shape::Sphere { radius } => ray_sphere_intersection(origin, dir, center, radius),
            Shape::Aabb { half_extents } => {
                ray_aabb_intersection(origin, dir, center, half_extents)
            }
            Shape::Plane { normal, offset } => ray_plane_intersection(origin, dir, normal, offset),
            Shape::Mesh(_) => None,
        };

        if let Some(t) = t {
            if t > 0.0 && t <= max_distance {
                let is_closer = best.as_ref().map_or(true, |b| t < b.distance);
                if is_closer {
                    best = Some(RayHit {
                        entity,
                        distance: t,
                        point: origin + dir * t,
                    });
                }
            }
        }
    }

    best
}

fn ray_sphere_intersection(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let a = dir.dot(dir);
    let b = 2.0 * oc.dot(dir);
    let c = oc.dot(oc) - radius * radius;
    let discriminant = b * b - 4.0 * a * c;

    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let t1 = (-b - sqrt_d) / (2.0 * a);
    let t2 = (-b + sqrt_d) / (2.0 * a);

    if t1 > 0.0 {
        Some(t1)
    } else if t2 > 0.0 {
        Some(t2)
    } else {
        None
    }
}

fn ray_aabb_intersection(origin: Vec3, dir: Vec3, center: Vec3, half: Vec3) -> Option<f32> {
    let min = center - half;
    let max = center + half;
    let inv_dir = Vec3::new(1.0 / dir.x, 1.0 / dir.y, 1.0 / dir.z);

    let t1 = (min.x - origin.x) * inv_dir.x;
    let t2 = (max.x - origin.x) * inv_dir.x;
    let t3 = (min.y - origin.y) * inv_dir.y;
    let t4 = (max.y - origin.y) * inv_dir.y;
    let t5 = (min.z - origin.z) * inv_dir.z;
    let t6 = (max.z - origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    if tmax < 0.0 || tmin > tmax {
        return None;
    }
    // If tmin < 0, ray starts inside the box — return tmax
    Some(if tmin < 0.0 { tmax } else { tmin })
}

fn ray_plane_intersection(origin: Vec3, dir: Vec3, normal: Vec3, offset: f32) -> Option<f32> {
    let denom = dir.dot(normal);
    if denom.abs() < 1e-6 {
        return None;
    }
    let t = (offset - origin.dot(normal)) / denom;
    if t > 0.0 {
        Some(t)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::LocalTransform;

    #[test]
    fn nearest_body_wins() {
        let mut world = World::new();
        let near = world.spawn((
            LocalTransform::new(Vec3::new(5.0, 0.0, 0.0)),
            Body::dynamic_sphere(1.0),
        ));
        world.spawn((
            LocalTransform::new(Vec3::new(9.0, 0.0, 0.0)),
            Body::dynamic_sphere(1.0),
        ));

        let hit = raycast(&world, Vec3::ZERO, Vec3::X, 100.0).unwrap();
        assert_eq!(hit.entity, near);
        assert!((hit.distance - 4.0).abs() < 1e-4);
        assert!((hit.point - Vec3::new(4.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn range_and_direction_misses() {
        let mut world = World::new();
        world.spawn((
            LocalTransform::new(Vec3::new(5.0, 0.0, 0.0)),
            Body::dynamic_sphere(1.0),
        ));

        assert!(raycast(&world, Vec3::ZERO, Vec3::X, 3.0).is_none());
        assert!(raycast(&world, Vec3::ZERO, -Vec3::X, 100.0).is_none());
        assert!(raycast(&world, Vec3::ZERO, Vec3::ZERO, 100.0).is_none());
    }

    #[test]
    fn boxes_and_planes_intersect() {
        let mut world = World::new();
        let wall = world.spawn((
            LocalTransform::new(Vec3::new(0.0, 0.0, -8.0)),
            Body::static_aabb(Vec3::ONE),
        ));
        let floor = world.spawn((
            LocalTransform::new(Vec3::ZERO),
            Body::static_plane(Vec3::Y, 0.0),
        ));

        let hit = raycast(&world, Vec3::ZERO, Vec3::NEG_Z, 100.0).unwrap();
        assert_eq!(hit.entity, wall);
        assert!((hit.distance - 7.0).abs() < 1e-4);

        let hit = raycast(
            &world,
            Vec3::new(0.0, 4.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            100.0,
        )
        .unwrap();
        assert_eq!(hit.entity, floor);
        assert!((hit.distance - 4.0).abs() < 1e-4);
    }

    #[test]
    fn disabled_bodies_are_invisible_to_rays() {
        let mut world = World::new();
        world.spawn((
            LocalTransform::new(Vec3::new(5.0, 0.0, 0.0)),
            Body::dynamic_sphere(1.0).with_collisions_disabled(),
        ));

        assert!(raycast(&world, Vec3::ZERO, Vec3::X, 100.0).is_none());
    }
}
