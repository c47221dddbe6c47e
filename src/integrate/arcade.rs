use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{Body, LocalTransform};
use crate::events::{Axis, EventQueue, PhysicsEvent, Side};

use super::{FrameBounds, Integrator, MIN_DT};

/// Tuning for the 2D-constrained arcade modes (paddle-and-ball games).
#[derive(Clone, Copy, Debug)]
pub struct ArcadeConfig {
    /// Playfield box. Crossing a face reflects (or stops, on the goal
    /// axis) and emits a boundary event.
    pub bounds: FrameBounds,
    /// The playfield lives on this Z plane; positions are clamped to it
    /// and Z velocity is zeroed every tick.
    pub plane_z: f32,
    pub gravity: Vec3,
    /// Axis the ball must keep moving along.
    pub primary_axis: Axis,
    /// Crossing this axis' boundary means a score: velocity is zeroed
    /// instead of reflected.
    pub goal_axis: Axis,
    /// Minimum speed along the primary axis; slower balls are rescaled up.
    pub min_primary_speed: f32,
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            bounds: FrameBounds::new(Vec3::new(-10.0, -6.0, -1.0), Vec3::new(10.0, 6.0, 1.0)),
            plane_z: 0.0,
            gravity: Vec3::ZERO,
            primary_axis: Axis::X,
            goal_axis: Axis::X,
            min_primary_speed: 4.0,
        }
    }
}

/// Integrator for the 2D paddle games: plane-locked motion, a speed floor
/// on the primary axis so rallies never stall, and frame-boundary handling
/// that reports goal crossings.
pub struct ArcadeIntegrator {
    pub config: ArcadeConfig,
}

impl ArcadeIntegrator {
    pub fn new(config: ArcadeConfig) -> Self {
        Self { config }
    }

    /// Reflect or stop at any crossed playfield face, clamping the
    /// position back inside so a crossing reports exactly once.
    fn handle_boundaries(
        &self,
        entity: Entity,
        position: &mut Vec3,
        velocity: &mut Vec3,
        events: &mut EventQueue,
    ) {
        let bounds = self.config.bounds;
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
                if axis == self.config.goal_axis {
                    // Goal line: the ball is dead until gameplay resets it.
                    *velocity = Vec3::ZERO;
                } else {
                    axis.set(velocity, -axis.get(*velocity));
                }
                log::debug!("boundary crossed: {:?} {:?} {:?}", entity, axis, side);
                events.push(PhysicsEvent::BoundaryCrossed { entity, axis, side });
            }
        }
    }
}

impl Integrator for ArcadeIntegrator {
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

            body.velocity += self.config.gravity * body.gravity_scale * dt;
            body.velocity *= body.linear_damping;

            // Speed floor on the primary axis. Guard the zero component: a
            // ball that has been stopped (scored) stays stopped.
            let primary = self.config.primary_axis.get(body.velocity);
            if primary != 0.0 && primary.abs() < self.config.min_primary_speed {
                self.config
                    .primary_axis
                    .set(&mut body.velocity, self.config.min_primary_speed * primary.signum());
            }

            local.position += body.velocity * dt;

            // Keep play on the 2D plane.
            local.position.z = self.config.plane_z;
            body.velocity.z = 0.0;

            self.handle_boundaries(entity, &mut local.position, &mut body.velocity, events);

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

        // Paddles: prescribed velocity, silently clamped to the playfield.
        for &entity in entities {
            let Ok((local, body)) =
                world.query_one_mut::<(&mut LocalTransform, &mut Body)>(entity)
            else {
                continue;
            };

            local.position += body.velocity * dt;
            local.position = local
                .position
                .clamp(self.config.bounds.min, self.config.bounds.max);
            local.position.z = self.config.plane_z;
        }
    }
}
