use glam::Vec3;
use hecs::World;

use crate::components::{Body, Collision, LocalTransform};
use crate::events::{Axis, EventQueue};

use super::{classify_pairing, notify, reflect, CollisionResolver, Pairing};

/// Bounce tuning for the paddle games.
#[derive(Clone, Copy, Debug)]
pub struct BounceTuning {
    /// Axis the ball must keep crossing the field along.
    pub primary_axis: Axis,
    /// Axis the steepness cap applies to.
    pub vertical_axis: Axis,
    /// Starting minimum speed along the primary axis.
    pub min_primary_speed: f32,
    /// Added to the running minimum after every real bounce, so rallies
    /// speed up over time.
    pub ratchet_increment: f32,
    /// Sign-preserving cap on the vertical component after a bounce, so a
    /// deflection can never turn into a near-vertical stall.
    pub max_vertical_speed: f32,
    /// A bounce may grow the overall speed by at most this factor.
    pub max_growth: f32,
}

impl Default for BounceTuning {
    fn default() -> Self {
        Self {
            primary_axis: Axis::X,
            vertical_axis: Axis::Y,
            min_primary_speed: 4.0,
            ratchet_increment: 0.2,
            max_vertical_speed: 12.0,
            max_growth: 1.2,
        }
    }
}

/// Wall-response resolver for the paddle games. Same reflection core as
/// the general resolver, plus the arcade post-pass: play stays on the 2D
/// plane, bounces cannot go near-vertical, the primary-axis speed is held
/// at a ratcheting minimum, and the overall speed gain per bounce is
/// capped.
pub struct ArcadeResolver {
    pub tuning: BounceTuning,
    current_min_speed: f32,
}

impl ArcadeResolver {
    pub fn new(tuning: BounceTuning) -> Self {
        Self {
            tuning,
            current_min_speed: tuning.min_primary_speed,
        }
    }

    /// The ratcheted minimum currently in force.
    pub fn current_min_speed(&self) -> f32 {
        self.current_min_speed
    }

    /// Drop the ratchet back to the configured starting minimum
    /// (new serve, new level).
    pub fn reset(&mut self) {
        self.current_min_speed = self.tuning.min_primary_speed;
    }

    fn post_process(&mut self, pre_speed: f32, mut velocity: Vec3) -> Vec3 {
        // Play never leaves the 2D plane.
        velocity.z = 0.0;

        let vertical = self.tuning.vertical_axis.get(velocity);
        if vertical.abs() > self.tuning.max_vertical_speed {
            self.tuning
                .vertical_axis
                .set(&mut velocity, self.tuning.max_vertical_speed * vertical.signum());
        }

        // Hold the primary axis at the running minimum. Guard the zero
        // component: no sign to rescale along.
        let primary = self.tuning.primary_axis.get(velocity);
        if primary != 0.0 && primary.abs() < self.current_min_speed {
            self.tuning
                .primary_axis
                .set(&mut velocity, self.current_min_speed * primary.signum());
        }
        self.current_min_speed += self.tuning.ratchet_increment;

        // The floor rescale above must not snowball the ball's speed.
        let speed = velocity.length();
        let ceiling = pre_speed * self.tuning.max_growth;
        if pre_speed > 0.0 && speed > ceiling {
            velocity *= ceiling / speed;
        }

        velocity
    }
}

impl CollisionResolver for ArcadeResolver {
    fn resolve(
        &mut self,
        world: &mut World,
        collision: &mut Collision,
        events: &mut EventQueue,
    ) -> bool {
        if collision.normal.length_squared() <= f32::EPSILON {
            return false;
        }

        let hit = match classify_pairing(world, collision) {
            Pairing::DynamicsOnly => {
                notify(world, collision, events);
                return false;
            }
            Pairing::WallsOnly => {
                collision.resolved = true;
                notify(world, collision, events);
                return true;
            }
            Pairing::WallAndBody(hit) => hit,
        };

        let velocity = world
            .get::<&Body>(hit.body)
            .map(|b| b.velocity)
            .unwrap_or(Vec3::ZERO);

        if velocity.dot(hit.normal) >= 0.0 {
            return false;
        }

        if !hit.skip_response {
            let bounced = reflect(velocity, hit.normal, hit.friction, hit.restitution);
            let bounced = self.post_process(velocity.length(), bounced);
            if let Ok(mut body) = world.get::<&mut Body>(hit.body) {
                body.velocity = bounced;
            }
            if let Ok(mut local) = world.get::<&mut LocalTransform>(hit.body) {
                local.position += hit.normal * collision.depth;
            }
        }

        collision.resolved = true;
        notify(world, collision, events);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hecs::Entity;

    fn tuning() -> BounceTuning {
        BounceTuning {
            primary_axis: Axis::X,
            vertical_axis: Axis::Y,
            min_primary_speed: 2.0,
            ratchet_increment: 0.5,
            max_vertical_speed: 10.0,
            max_growth: 1.2,
        }
    }

    /// Ball moving with `velocity` against a paddle face whose normal is +X.
    fn ball_against_paddle(velocity: Vec3) -> (World, Entity, Entity) {
        let mut world = World::new();
        let ball = world.spawn((
            LocalTransform::new(Vec3::ZERO),
            Body::dynamic_sphere(0.2).with_velocity(velocity),
        ));
        let paddle = world.spawn((
            LocalTransform::new(Vec3::new(-0.3, 0.0, 0.0)),
            Body::kinematic_sphere(0.5).with_restitution(1.0),
        ));
        (world, ball, paddle)
    }

    #[test]
    fn bounce_respects_floor_and_growth_cap() {
        let (mut world, ball, paddle) = ball_against_paddle(Vec3::new(-3.0, 1.0, 0.0));
        let mut resolver = ArcadeResolver::new(tuning());
        let mut events = EventQueue::new();
        let pre_speed = Vec3::new(-3.0, 1.0, 0.0).length();

        let mut collision = Collision::new(ball, paddle, Vec3::X, 0.05);
        assert!(resolver.resolve(&mut world, &mut collision, &mut events));

        let v = world.get::<&Body>(ball).unwrap().velocity;
        assert!(v.x >= 2.0); // at least the configured minimum
        assert!(v.length() <= pre_speed * 1.2 + 1e-4);
        assert_eq!(v.z, 0.0);
    }

    #[test]
    fn ratchet_raises_the_minimum_every_bounce() {
        let mut resolver = ArcadeResolver::new(tuning());
        assert_eq!(resolver.current_min_speed(), 2.0);

        for bounce in 1..=3 {
            let (mut world, ball, paddle) = ball_against_paddle(Vec3::new(-5.0, 0.0, 0.0));
            let mut collision = Collision::new(ball, paddle, Vec3::X, 0.05);
            let mut events = EventQueue::new();
            assert!(resolver.resolve(&mut world, &mut collision, &mut events));
            assert_eq!(resolver.current_min_speed(), 2.0 + 0.5 * bounce as f32);
        }

        resolver.reset();
        assert_eq!(resolver.current_min_speed(), 2.0);
    }

    #[test]
    fn slow_reflection_is_rescaled_up_to_the_minimum() {
        let (mut world, ball, paddle) = ball_against_paddle(Vec3::new(-1.0, 0.0, 0.0));
        // raise the ratchet past the incoming speed
        let mut resolver = ArcadeResolver::new(BounceTuning {
            min_primary_speed: 1.1,
            ratchet_increment: 0.0,
            max_growth: 1.2,
            ..tuning()
        });
        let mut events = EventQueue::new();

        let mut collision = Collision::new(ball, paddle, Vec3::X, 0.0);
        resolver.resolve(&mut world, &mut collision, &mut events);

        let v = world.get::<&Body>(ball).unwrap().velocity;
        // floored to 1.1, still under the 1.2x growth ceiling
        assert!((v.x - 1.1).abs() < 1e-5);
    }

    #[test]
    fn steep_bounce_is_capped_sign_preserved() {
        let (mut world, ball, paddle) = ball_against_paddle(Vec3::new(-4.0, -20.0, 0.0));
        let mut resolver = ArcadeResolver::new(tuning());
        let mut events = EventQueue::new();

        let mut collision = Collision::new(ball, paddle, Vec3::X, 0.0);
        resolver.resolve(&mut world, &mut collision, &mut events);

        let v = world.get::<&Body>(ball).unwrap().velocity;
        assert_eq!(v.y, -10.0); // magnitude capped, direction kept
        assert!(v.x > 0.0);
    }

    #[test]
    fn no_resolve_skips_the_ratchet() {
        let mut world = World::new();
        let ball = world.spawn((
            LocalTransform::new(Vec3::ZERO),
            Body::dynamic_sphere(0.2)
                .with_velocity(Vec3::new(-3.0, 0.0, 0.0))
                .with_no_resolve(),
        ));
        let paddle = world.spawn((
            LocalTransform::new(Vec3::new(-0.3, 0.0, 0.0)),
            Body::kinematic_sphere(0.5),
        ));

        let mut resolver = ArcadeResolver::new(tuning());
        let mut collision = Collision::new(ball, paddle, Vec3::X, 0.05);
        let mut events = EventQueue::new();

        assert!(resolver.resolve(&mut world, &mut collision, &mut events));
        assert_eq!(
            world.get::<&Body>(ball).unwrap().velocity,
            Vec3::new(-3.0, 0.0, 0.0)
        );
        assert_eq!(resolver.current_min_speed(), 2.0);
        assert_eq!(events.len(), 2);
    }
}
