mod arcade;
mod contact;

pub use arcade::{ArcadeResolver, BounceTuning};
pub use contact::ContactResolver;

use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{Body, Collision};
use crate::events::{EventQueue, PhysicsEvent};

/// Consumes detected collisions, mutating velocities and positions and
/// notifying both participants. `resolve` reports whether the record was
/// handled; implementations differ in their game-specific response rules.
pub trait CollisionResolver {
    fn resolve(
        &mut self,
        world: &mut World,
        collision: &mut Collision,
        events: &mut EventQueue,
    ) -> bool;

    /// Resolve every record in order, first to last, and count the
    /// handled ones. No ordering by depth, no pair dedup.
    fn resolve_all(
        &mut self,
        world: &mut World,
        collisions: &mut [Collision],
        events: &mut EventQueue,
    ) -> usize {
        let mut handled = 0;
        for collision in collisions.iter_mut() {
            if self.resolve(world, collision, events) {
                handled += 1;
            }
        }
        handled
    }
}

/// The ball-and-wall case: one dynamic body against one static or
/// kinematic surface. `normal` is re-oriented to point from the wall
/// toward the body, so a positive dot with the body's velocity always
/// means "moving apart".
pub(crate) struct WallHit {
    pub body: Entity,
    pub wall: Entity,
    pub normal: Vec3,
    pub friction: f32,
    pub restitution: f32,
    /// Either side opted out of physical response (`no_resolve`).
    pub skip_response: bool,
}

pub(crate) enum Pairing {
    /// One dynamic body against a wall.
    WallAndBody(WallHit),
    /// Nothing can move: both sides static/kinematic.
    WallsOnly,
    /// Both sides dynamic (or the record has gone stale).
    DynamicsOnly,
}

/// Classify a collision for the wall-response resolvers. Surface material
/// (friction, restitution) always comes from the wall side.
pub(crate) fn classify_pairing(world: &World, collision: &mut Collision) -> Pairing {
    collision.classify(world);

    let wall = collision
        .statics
        .first()
        .or_else(|| collision.kinematic.first())
        .copied();
    match (wall, collision.dynamic.first().copied()) {
        (Some(wall), Some(body)) => {
            let normal = if collision.one == body {
                collision.normal
            } else {
                -collision.normal
            };
            let (friction, restitution, wall_opts_out) = world
                .get::<&Body>(wall)
                .map(|b| (b.friction, b.restitution, b.no_resolve))
                .unwrap_or((0.0, 0.0, false));
            let body_opts_out = world
                .get::<&Body>(body)
                .map(|b| b.no_resolve)
                .unwrap_or(false);
            Pairing::WallAndBody(WallHit {
                body,
                wall,
                normal,
                friction,
                restitution,
                skip_response: wall_opts_out || body_opts_out,
            })
        }
        (Some(_), None) => Pairing::WallsOnly,
        _ => Pairing::DynamicsOnly,
    }
}

/// Split the velocity at the contact and recombine: the tangential part
/// loses the wall's friction share, the normal part reflects scaled by
/// the wall's restitution.
pub(crate) fn reflect(velocity: Vec3, normal: Vec3, friction: f32, restitution: f32) -> Vec3 {
    let normal_vel = velocity.dot(normal) * normal;
    let tangent_vel = velocity - normal_vel;
    tangent_vel * (1.0 - friction) - normal_vel * restitution
}

/// Tell both participants about the contact. Each side receives the
/// normal oriented toward itself; bodies with `contact_hints` set get the
/// lightweight variant as well.
pub(crate) fn notify(world: &World, collision: &Collision, events: &mut EventQueue) {
    for (entity, other, normal) in [
        (collision.one, collision.two, collision.normal),
        (collision.two, collision.one, -collision.normal),
    ] {
        events.push(PhysicsEvent::Contact {
            entity,
            other,
            normal,
            depth: collision.depth,
        });
        let wants_hint = world
            .get::<&Body>(entity)
            .map(|b| b.contact_hints)
            .unwrap_or(false);
        if wants_hint {
            events.push(PhysicsEvent::ContactHint { entity, normal });
        }
    }
}
