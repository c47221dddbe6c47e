use glam::Vec3;
use hecs::{Entity, World};

use super::{Body, Motion};

/// One overlapping entity pair, produced by the detection phase and
/// discarded at the end of the tick. Holds entity handles, never borrows —
/// a record outliving its tick simply fails its lookups.
pub struct Collision {
    /// First participant, in detection order.
    pub one: Entity,
    /// Second participant, in detection order.
    pub two: Entity,
    /// Unit vector pointing from `two` toward `one`. A zero vector means
    /// there is nothing meaningful to resolve and resolvers must no-op.
    pub normal: Vec3,
    /// Overlap distance along the normal, never negative.
    pub depth: f32,
    /// Set by a resolver once a response has been applied.
    pub resolved: bool,

    /// Participants classified by motion class. Populated lazily by
    /// [`classify`](Self::classify); empty until then.
    pub dynamic: Vec<Entity>,
    pub kinematic: Vec<Entity>,
    pub statics: Vec<Entity>,
}

impl Collision {
    pub fn new(one: Entity, two: Entity, normal: Vec3, depth: f32) -> Self {
        Self {
            one,
            two,
            normal,
            depth,
            resolved: false,
            dynamic: Vec::new(),
            kinematic: Vec::new(),
            statics: Vec::new(),
        }
    }

    /// Sort `one` and `two` into the motion-class partitions. Runs at most
    /// once per record: the all-empty check keeps repeated calls from
    /// duplicating entries. Entities whose `Body` is gone are skipped.
    pub fn classify(&mut self, world: &World) {
        if !(self.dynamic.is_empty() && self.kinematic.is_empty() && self.statics.is_empty()) {
            return;
        }
        for entity in [self.one, self.two] {
            if let Ok(body) = world.get::<&Body>(entity) {
                match body.motion {
                    Motion::Dynamic => self.dynamic.push(entity),
                    Motion::Kinematic => self.kinematic.push(entity),
                    Motion::Static => self.statics.push(entity),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Body;

    #[test]
    fn classify_partitions_by_motion() {
        let mut world = World::new();
        let ball = world.spawn((Body::dynamic_sphere(0.5),));
        let wall = world.spawn((Body::static_plane(Vec3::Y, 0.0),));

        let mut collision = Collision::new(ball, wall, Vec3::Y, 0.1);
        collision.classify(&world);

        assert_eq!(collision.dynamic, vec![ball]);
        assert_eq!(collision.statics, vec![wall]);
        assert!(collision.kinematic.is_empty());
    }

    #[test]
    fn classify_runs_at_most_once() {
        let mut world = World::new();
        let ball = world.spawn((Body::dynamic_sphere(0.5),));
        let wall = world.spawn((Body::static_plane(Vec3::Y, 0.0),));

        let mut collision = Collision::new(ball, wall, Vec3::Y, 0.1);
        collision.classify(&world);
        collision.classify(&world);

        assert_eq!(collision.dynamic.len(), 1);
        assert_eq!(collision.statics.len(), 1);
    }

    #[test]
    fn classify_skips_despawned_entities() {
        let mut world = World::new();
        let ball = world.spawn((Body::dynamic_sphere(0.5),));
        let wall = world.spawn((Body::static_plane(Vec3::Y, 0.0),));
        world.despawn(wall).unwrap();

        let mut collision = Collision::new(ball, wall, Vec3::Y, 0.1);
        collision.classify(&world);

        assert_eq!(collision.dynamic, vec![ball]);
        assert!(collision.statics.is_empty());
    }
}
