mod body;
mod collision;

pub use body::{masks_allow, Body, MeshHandle, Motion, Shape};
pub use collision::Collision;

use glam::{Mat4, Quat, Vec3};
use hecs::{Entity, World};

/// Spatial transform with position, rotation, and scale (local space).
pub struct LocalTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl LocalTransform {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Computed world-space transform matrix, updated by the propagation system.
pub struct GlobalTransform(pub Mat4);

/// Points to the parent entity in the transform hierarchy.
pub struct Parent(pub Entity);

/// Lists child entities in the transform hierarchy.
pub struct Children(pub Vec<Entity>);

/// Attach `child` under `parent` in the transform hierarchy.
pub fn add_child(world: &mut World, parent: Entity, child: Entity) {
    let has_children = world.get::<&Children>(parent).is_ok();
    if has_children {
        let mut children = world.get::<&mut Children>(parent).unwrap();
        if !children.0.contains(&child) {
            children.0.push(child);
        }
    } else {
        world.insert_one(parent, Children(vec![child])).unwrap();
    }

    let _ = world.insert_one(child, Parent(parent));
}

/// Detach `child` from `parent` in the transform hierarchy.
pub fn remove_child(world: &mut World, parent: Entity, child: Entity) {
    if let Ok(mut children) = world.get::<&mut Children>(parent) {
        children.0.retain(|&e| e != child);
    }
    let _ = world.remove_one::<Parent>(child);
}

/// World-space position of an entity: the propagated `GlobalTransform`
/// translation when present, the local position otherwise.
pub fn world_position(world: &World, entity: Entity) -> Option<Vec3> {
    if let Ok(global) = world.get::<&GlobalTransform>(entity) {
        return Some(global.0.w_axis.truncate());
    }
    world.get::<&LocalTransform>(entity).ok().map(|lt| lt.position)
}

/// World-space matrix of an entity, with the same fallback as
/// [`world_position`].
pub fn world_matrix(world: &World, entity: Entity) -> Option<Mat4> {
    if let Ok(global) = world.get::<&GlobalTransform>(entity) {
        return Some(global.0);
    }
    world.get::<&LocalTransform>(entity).ok().map(|lt| lt.matrix())
}
