use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{Body, LocalTransform};
use crate::events::{Axis, EventQueue, PhysicsEvent, Side};

use super::{face_toward, FrameBounds, Integrator, MIN_DT};

/// Tuning for the space-shooter mode.
#[derive(Clone, Copy, Debug)]
pub struct ShooterConfig {
    /// Combat plane: Z is clamped here and Z velocity zeroed.
    pub plane_z: f32,
    /// Ship/projectile speed ceiling, in m/s.
    pub max_speed: f32,
    /// Optional arena box. Crossing a face stops motion on that axis and
    /// emits a boundary event; `None` leaves the field open.
    pub bounds: Option<FrameBounds>,
}

impl Default for ShooterConfig {
    fn default() -> Self {
        Self {
            plane_z: 0.0,
            max_speed: 60.0,
            bounds: None,
        }
    }
}

/// Space-shooter integrator: no gravity, thrust from local-frame
/// acceleration, plane-locked, ships optionally snapped to face their
/// velocity.
pub struct ShooterIntegrator {
    pub config: ShooterConfig,
}

impl ShooterIntegrator {
    pub fn new(config: ShooterConfig) -> Self {
        Self { config }
    }

    fn handle_bounds(
        &self,
        entity: Entity,
        position: &mut Vec3,
        velocity: &mut Vec3,
        events: &mut EventQueue,
    ) {
        let Some(bounds) = self.config.bounds else {
            return;
        };
        for axis in [Axis::X, Axis::Y] {
            let p = axis.get(*position);
            let crossed = if p < axis.get(bounds.min) {
                axis.set(position, axis.get(bounds.min));
                Some(Side::Min)
            } else if p > axis.get(bounds.max) {
                axis.set(position, axis.get(bounds.max));
                Some(Side::Max)
            } else {
                None
            };
            if let Some(side) = crossed {
                axis.set(velocity, 0.0);
                events.push(PhysicsEvent::BoundaryCrossed { entity, axis, side });
            }
        }
    }
}

impl Integrator for ShooterIntegrator {
    fn integrate_dynamic(
        &self,
        world: &mut World,
        entities: &[Entity],
        dt: f32,
        events: &mut EventQueue,
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
            body.velocity += thrust * dt;
            body.velocity *= body.linear_damping;
            body.velocity = body.velocity.clamp_length_max(self.config.max_speed);

            let world_velocity = body.velocity + local.rotation * body.relative_velocity;
            local.position += world_velocity * dt;

            local.position.z = self.config.plane_z;
            body.velocity.z = 0.0;

            if body.face_velocity {
                if let Some(facing) = face_toward(body.velocity) {
                    local.rotation = facing;
                }
            }

            self.handle_bounds(entity, &mut local.position, &mut body.velocity, events);

            body.acceleration = thrust;
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
            local.position.z = self.config.plane_z;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drift_continues_without_thrust_or_damping() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let body = Body::dynamic_sphere(0.5).with_velocity(Vec3::new(5.0, 0.0, 0.0));
        let e = world.spawn((LocalTransform::new(Vec3::ZERO), body));

        let integrator = ShooterIntegrator::new(ShooterConfig::default());
        integrator.integrate_dynamic(&mut world, &[e], 1.0, &mut events);
        integrator.integrate_dynamic(&mut world, &[e], 1.0, &mut events);

        // Newtonian drift: no gravity, nothing slows the ship down.
        assert_eq!(world.get::<&Body>(e).unwrap().velocity, Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(
            world.get::<&LocalTransform>(e).unwrap().position,
            Vec3::new(10.0, 0.0, 0.0)
        );
    }

    #[test]
    fn facing_snaps_to_velocity() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let body = Body::dynamic_sphere(0.5)
            .with_velocity(Vec3::new(0.0, 4.0, 0.0))
            .with_face_velocity();
        let e = world.spawn((LocalTransform::new(Vec3::ZERO), body));

        ShooterIntegrator::new(ShooterConfig::default())
            .integrate_dynamic(&mut world, &[e], 0.1, &mut events);

        let local = world.get::<&LocalTransform>(e).unwrap();
        let forward = local.rotation * Vec3::NEG_Z;
        assert!((forward - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn arena_edge_stops_the_crossed_axis_and_reports() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let body = Body::dynamic_sphere(0.5).with_velocity(Vec3::new(-20.0, 1.0, 0.0));
        let e = world.spawn((LocalTransform::new(Vec3::new(-9.5, 0.0, 0.0)), body));

        let integrator = ShooterIntegrator::new(ShooterConfig {
            bounds: Some(FrameBounds::new(
                Vec3::new(-10.0, -10.0, -1.0),
                Vec3::new(10.0, 10.0, 1.0),
            )),
            ..Default::default()
        });
        integrator.integrate_dynamic(&mut world, &[e], 0.1, &mut events);

        let body = world.get::<&Body>(e).unwrap();
        assert_eq!(body.velocity.x, 0.0);
        assert_eq!(body.velocity.y, 1.0);
        drop(body);
        assert_eq!(world.get::<&LocalTransform>(e).unwrap().position.x, -10.0);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn damping_decays_drift_per_tick() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let body = Body::dynamic_sphere(0.5)
            .with_velocity(Vec3::new(8.0, 0.0, 0.0))
            .with_damping(0.5, 1.0);
        let e = world.spawn((LocalTransform::new(Vec3::ZERO), body));

        ShooterIntegrator::new(ShooterConfig::default())
            .integrate_dynamic(&mut world, &[e], 0.25, &mut events);

        assert_eq!(world.get::<&Body>(e).unwrap().velocity.x, 4.0);
    }
}
