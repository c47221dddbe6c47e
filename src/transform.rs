use std::collections::VecDeque;

use glam::Mat4;
use hecs::{Entity, World};

use crate::components::{Children, GlobalTransform, LocalTransform, Parent};

/// Propagates LocalTransform down the hierarchy via BFS.
/// Roots (entities with LocalTransform but no Parent) compute GlobalTransform
/// from their own LocalTransform. Children inherit parent's GlobalTransform
/// multiplied by their own LocalTransform.
pub fn transform_propagation_system(world: &mut World) {
    let mut queue: VecDeque<(Entity, Mat4)> = VecDeque::new();

    // Phase 1: update roots and seed BFS with their children.
    // Collect first so the query borrow is released before we write
    // GlobalTransform.
    let roots: Vec<(Entity, Mat4)> = world
        .query::<&LocalTransform>()
        .without::<&Parent>()
        .iter()
        .map(|(entity, local)| (entity, local.matrix()))
        .collect();

    for (entity, global_mat) in &roots {
        if let Ok(mut gt) = world.get::<&mut GlobalTransform>(*entity) {
            gt.0 = *global_mat;
        }
        if let Ok(children) = world.get::<&Children>(*entity) {
            for &child in &children.0 {
                queue.push_back((child, *global_mat));
            }
        }
    }

    // Phase 2: BFS propagation
    while let Some((entity, parent_global)) = queue.pop_front() {
        let child_global = if let Ok(local) = world.get::<&LocalTransform>(entity) {
            parent_global * local.matrix()
        } else {
            parent_global
        };

        if let Ok(mut gt) = world.get::<&mut GlobalTransform>(entity) {
            gt.0 = child_global;
        }

        if let Ok(children) = world.get::<&Children>(entity) {
            for &child in &children.0 {
                queue.push_back((child, child_global));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{add_child, world_position};
    use glam::Vec3;

    #[test]
    fn child_inherits_parent_translation() {
        let mut world = World::new();
        let parent = world.spawn((
            LocalTransform::new(Vec3::new(10.0, 0.0, 0.0)),
            GlobalTransform(Mat4::IDENTITY),
        ));
        let child = world.spawn((
            LocalTransform::new(Vec3::new(0.0, 2.0, 0.0)),
            GlobalTransform(Mat4::IDENTITY),
        ));
        add_child(&mut world, parent, child);

        transform_propagation_system(&mut world);

        assert_eq!(
            world_position(&world, child),
            Some(Vec3::new(10.0, 2.0, 0.0))
        );
    }

    #[test]
    fn root_global_matches_local() {
        let mut world = World::new();
        let root = world.spawn((
            LocalTransform::new(Vec3::new(-3.0, 1.0, 4.0)),
            GlobalTransform(Mat4::IDENTITY),
        ));

        transform_propagation_system(&mut world);

        assert_eq!(
            world_position(&world, root),
            Some(Vec3::new(-3.0, 1.0, 4.0))
        );
    }
}
