use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{Body, LocalTransform};
use crate::events::EventQueue;

use super::{face_toward, integrate_spin, refresh_momentum, Integrator, GRAVITY, MIN_DT};

/// Generic force-based integrator: gravity, accumulated external forces,
/// and local-frame control inputs, advanced with semi-implicit Euler.
/// The default choice when a game mode has no special movement rules.
pub struct ForceIntegrator {
    pub gravity: Vec3,
}

impl ForceIntegrator {
    pub fn new() -> Self {
        Self { gravity: GRAVITY }
    }

    pub fn with_gravity(gravity: Vec3) -> Self {
        Self { gravity }
    }
}

impl Default for ForceIntegrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Integrator for ForceIntegrator {
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

            // Effective acceleration: gravity, external forces over mass,
            // and local thrust rotated into world space.
            let accel = self.gravity * body.gravity_scale
                + body.force * body.inverse_mass
                + local.rotation * body.relative_acceleration;

            // Semi-implicit Euler: update velocity first, then position.
            body.velocity += accel * dt;
            // One damping factor per tick, tied to the fixed step rate.
            body.velocity *= body.linear_damping;

            // Control velocity is rotated by the current orientation and
            // moves the body, but is never damped.
            let world_velocity = body.velocity + local.rotation * body.relative_velocity;
            local.position += world_velocity * dt;

            if body.face_velocity {
                if let Some(facing) = face_toward(world_velocity) {
                    local.rotation = facing;
                }
            } else {
                local.rotation = integrate_spin(local.rotation, body.spin, dt);
            }

            body.acceleration = accel;
            body.force = Vec3::ZERO;
            refresh_momentum(body);
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

        for &entity in entities {
            let Ok((local, body)) =
                world.query_one_mut::<(&mut LocalTransform, &mut Body)>(entity)
            else {
                continue;
            };

            // Prescribed motion only: no forces, no damping.
            let world_velocity = body.velocity + local.rotation * body.relative_velocity;
            local.position += world_velocity * dt;
            local.rotation = integrate_spin(local.rotation, body.spin, dt);
        }
    }
}
