use glam::Vec3;
use hecs::World;

use crate::components::{Body, Collision, LocalTransform};
use crate::events::EventQueue;

use super::{classify_pairing, notify, reflect, CollisionResolver, Pairing};

/// General wall-response resolver used by the 3D modes: reflect the
/// dynamic body's velocity off the surface with the wall's restitution
/// and friction, then push it out of penetration.
///
/// Dynamic-dynamic contacts carry no impulse response in this resolver —
/// both sides are notified and gameplay decides what the hit means.
pub struct ContactResolver;

impl CollisionResolver for ContactResolver {
    fn resolve(
        &mut self,
        world: &mut World,
        collision: &mut Collision,
        events: &mut EventQueue,
    ) -> bool {
        // A zero normal means detection had nothing meaningful to say.
        if collision.normal.length_squared() <= f32::EPSILON {
            return false;
        }

        let hit = match classify_pairing(world, collision) {
            Pairing::DynamicsOnly => {
                notify(world, collision, events);
                return false;
            }
            Pairing::WallsOnly => {
                // Nothing can move, but both sides still hear about it.
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

        // Already separating (or sliding parallel): leave it alone, or a
        // resting contact would re-reflect every tick and jitter.
        if velocity.dot(hit.normal) >= 0.0 {
            return false;
        }

        if !hit.skip_response {
            let bounced = reflect(velocity, hit.normal, hit.friction, hit.restitution);
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
