use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{Body, LocalTransform};
use crate::events::EventQueue;

use super::{face_toward, Integrator, GRAVITY, MIN_DT};

/// Overworld character integrator: characters and mobs walk along their
/// prescribed control velocity, fall under gravity, and turn to face the
/// direction they are moving in.
pub struct OverworldIntegrator {
    pub gravity: Vec3,
}

impl OverworldIntegrator {
    pub fn new() -> Self {
        Self { gravity: GRAVITY }
    }

    pub fn with_gravity(gravity: Vec3) -> Self {
        Self { gravity }
    }
}

impl Default for OverworldIntegrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Integrator for OverworldIntegrator {
    fn integrate_dynamic(
        &self,
        world: &mut World,
        entities: &[Entity],
        dt: f32,
        _events: &mut EventQueue,
    ) {
        if dt <= MIN_DT {
            return;
        }

        for &entity in entities {
            let Ok((local, body)) =
                world.query_one_mut::<(&mut LocalTransform, &mut Body)>(entity)
            else {
                continue;
            };

            body.velocity += self.gravity * body.gravity_scale * dt;
            body.velocity *= body.linear_damping;

            // Walk input overrides the ground plane; vertical motion is
            // left to gravity and jumps.
            let walk = local.rotation * body.relative_velocity;
            body.velocity.x = walk.x;
            body.velocity.z = walk.z;

            local.position += body.velocity * dt;

            // Characters face where they walk, not where they fall.
            let heading = Vec3::new(body.velocity.x, 0.0, body.velocity.z);
            if let Some(facing) = face_toward(heading) {
                local.rotation = facing;
            }

            body.acceleration = self.gravity * body.gravity_scale;
        }
    }

    fn integrate_kinematic(
        &self,
        world: &mut World,
        entities: &[Entity],
        dt: f32,
        _events: &mut EventQueue,
    ) {
        if dt <= MIN_DT {
            return;
        }

        // Patrolling mobs and platforms: prescribed velocity, facing kept.
        for &entity in entities {
            let Ok((local, body)) =
                world.query_one_mut::<(&mut LocalTransform, &mut Body)>(entity)
            else {
                continue;
            };
            local.position += body.velocity * dt;
            if let Some(facing) = face_toward(Vec3::new(body.velocity.x, 0.0, body.velocity.z)) {
                local.rotation = facing;
            }
        }
    }
}
