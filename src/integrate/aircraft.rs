use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{Body, LocalTransform};
use crate::events::EventQueue;

use super::{integrate_spin, refresh_momentum, scale_spin, Integrator, GRAVITY, MIN_DT};

/// Tuning for the flight mode.
#[derive(Clone, Copy, Debug)]
pub struct FlightConfig {
    pub gravity: Vec3,
    /// Overall speed ceiling, in m/s.
    pub max_speed: f32,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            max_speed: 200.0,
        }
    }
}

/// Aircraft integrator: thrust is a local-frame acceleration rotated by the
/// current attitude, attitude itself advances by spin-quaternion
/// integration, and both linear and angular motion are damped per frame.
pub struct FlightIntegrator {
    pub config: FlightConfig,
}

impl FlightIntegrator {
    pub fn new(config: FlightConfig) -> Self {
        Self { config }
    }
}

impl Integrator for FlightIntegrator {
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

            let thrust = local.rotation * body.relative_acceleration;
            let accel = self.config.gravity * body.gravity_scale + thrust;

            body.velocity += accel * dt;
            body.velocity *= body.linear_damping;
            body.velocity = body.velocity.clamp_length_max(self.config.max_speed);

            local.position += body.velocity * dt;

            // Attitude: decay the spin per frame, then apply it over dt.
            body.spin = scale_spin(body.spin, body.angular_damping);
            local.rotation = integrate_spin(local.rotation, body.spin, dt);

            body.acceleration = accel;
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
            local.position += body.velocity * dt;
            local.rotation = integrate_spin(local.rotation, body.spin, dt);
        }
    }
}
