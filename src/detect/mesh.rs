use hecs::{Entity, World};

use crate::components::{masks_allow, world_matrix, Body, Collision, Motion, Shape};

use super::geometry::{sphere_aabb_contact, sphere_mesh_contact};
use super::{plane_sphere, probe, sphere_sphere, CollisionDetector, MeshStore, Probe};

/// Detector for the first-person mode: spheres against level geometry —
/// boxes, planes, and triangle meshes pulled from the detector's mesh
/// store. Still brute-force all-pairs; the level sets are small enough
/// that a broad phase has never been worth it.
pub struct MeshDetector {
    meshes: MeshStore,
}

impl MeshDetector {
    pub fn new(meshes: MeshStore) -> Self {
        Self { meshes }
    }

    pub fn meshes(&self) -> &MeshStore {
        &self.meshes
    }

    fn initiates(body: &Body) -> bool {
        body.collisions_enabled && body.motion == Motion::Dynamic
    }

    fn narrow(&self, world: &World, one: &Probe, two: &Probe) -> Option<Collision> {
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
            (Shape::Sphere { radius }, Shape::Aabb { half_extents }) => {
                let (normal, depth) =
                    sphere_aabb_contact(two.position, half_extents, one.position, radius)?;
                Some(Collision::new(one.entity, two.entity, normal, depth))
            }
            (Shape::Aabb { half_extents }, Shape::Sphere { radius }) => {
                let (normal, depth) =
                    sphere_aabb_contact(one.position, half_extents, two.position, radius)?;
                Some(Collision::new(one.entity, two.entity, -normal, depth))
            }
            (Shape::Sphere { radius }, Shape::Mesh(handle)) => {
                let mesh = self.meshes.get(handle)?;
                let transform = world_matrix(world, two.entity)?;
                let (normal, depth) =
                    sphere_mesh_contact(mesh, transform, one.position, radius)?;
                Some(Collision::new(one.entity, two.entity, normal, depth))
            }
            (Shape::Mesh(handle), Shape::Sphere { radius }) => {
                let mesh = self.meshes.get(handle)?;
                let transform = world_matrix(world, one.entity)?;
                let (normal, depth) =
                    sphere_mesh_contact(mesh, transform, two.position, radius)?;
                Some(Collision::new(one.entity, two.entity, -normal, depth))
            }
            _ => {
                #[cfg(debug_assertions)]
                log::warn!(
                    "mesh detector cannot pair {:?} with {:?}",
                    one.body.shape,
                    two.body.shape
                );
                None
            }
        }
    }
}

impl CollisionDetector for MeshDetector {
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
                if j < i && Self::initiates(&two.body) {
                    continue;
                }
                if let Some(collision) = self.narrow(world, one, two) {
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
            if let Some(collision) = self.narrow(world, &one, &two) {
                collisions.push(collision);
            }
        }
        collisions
    }
}
