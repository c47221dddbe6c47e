use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{Body, LocalTransform};
use crate::events::EventQueue;

use super::{Integrator, GRAVITY, MIN_DT};

/// Tuning for first-person movement.
#[derive(Clone, Copy, Debug)]
pub struct FirstPersonConfig {
    pub gravity: Vec3,
    /// Hard ceiling on downward speed (terminal velocity), in m/s.
    pub max_fall_speed: f32,
}

impl Default for FirstPersonConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            max_fall_speed: 50.0,
        }
    }
}

/// First-person integrator: gravity drives the vertical axis while the
/// horizontal plane is overridden from the body's control velocity rotated
/// by its orientation — walking is direct, falling is simulated.
pub struct FirstPersonIntegrator {
    pub config: FirstPersonConfig,
}

impl FirstPersonIntegrator {
    pub fn new(config: FirstPersonConfig) -> Self {
        Self { config }
    }
}

impl Integrator for FirstPersonIntegrator {
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

            body.velocity += self.config.gravity * body.gravity_scale * dt;
            body.velocity *= body.linear_damping;
            if body.velocity.y < -self.config.max_fall_speed {
                body.velocity.y = -self.config.max_fall_speed;
            }

            // Walk input: rotate the control velocity by the current facing
            // and override the horizontal plane after damping, so intended
            // movement never decays.
            let walk = local.rotation * body.relative_velocity;
            body.velocity.x = walk.x;
            body.velocity.z = walk.z;

            local.position += body.velocity * dt;
            body.acceleration = self.config.gravity * body.gravity_scale;
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

        // Moving platforms, doors: prescribed velocity only.
        for &entity in entities {
            let Ok((local, body)) =
                world.query_one_mut::<(&mut LocalTransform, &mut Body)>(entity)
            else {
                continue;
            };
            local.position += body.velocity * dt;
        }
    }
}
