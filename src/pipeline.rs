use std::collections::HashSet;

use hecs::{Entity, World};

use crate::components::{Body, Collision, Motion};
use crate::detect::{CollisionDetector, MeshDetector, MeshStore, ShooterDetector};
use crate::events::{EventQueue, PhysicsEvent};
use crate::integrate::{
    ArcadeConfig, ArcadeIntegrator, FirstPersonConfig, FirstPersonIntegrator, FlightConfig,
    FlightIntegrator, ForceIntegrator, Integrator, OverworldIntegrator, ShooterConfig,
    ShooterIntegrator,
};
use crate::resolve::{ArcadeResolver, BounceTuning, CollisionResolver, ContactResolver};

/// Below these speeds a dynamic body counts as resting. Control inputs
/// (relative acceleration, queued forces) break rest immediately.
const REST_SPEED_THRESHOLD: f32 = 0.05;
const REST_INPUT_THRESHOLD: f32 = 0.05;

/// Runs the per-tick physics pipeline over a caller-owned roster:
/// integrate kinematics, integrate dynamics, detect, resolve, refresh
/// per-body state flags. The three strategies are injected at composition
/// time; the presets below wire up the triad for each game mode.
///
/// The tick is strictly sequential and single-threaded. Holding the
/// `&mut World` for the whole call keeps spawns and despawns at phase
/// boundaries by construction.
pub struct PhysicsPipeline {
    integrator: Box<dyn Integrator>,
    detector: Box<dyn CollisionDetector>,
    resolver: Box<dyn CollisionResolver>,
    events: EventQueue,
}

impl PhysicsPipeline {
    pub fn new(
        integrator: Box<dyn Integrator>,
        detector: Box<dyn CollisionDetector>,
        resolver: Box<dyn CollisionResolver>,
    ) -> Self {
        Self {
            integrator,
            detector,
            resolver,
            events: EventQueue::new(),
        }
    }

    /// Generic force-driven mode: gravity, forces, sphere/plane contacts.
    pub fn force(integrator: ForceIntegrator) -> Self {
        Self::new(
            Box::new(integrator),
            Box::new(ShooterDetector),
            Box::new(ContactResolver),
        )
    }

    /// Paddle games: plane-locked ball, ratcheting bounce speed.
    pub fn arcade(config: ArcadeConfig, tuning: BounceTuning) -> Self {
        Self::new(
            Box::new(ArcadeIntegrator::new(config)),
            Box::new(ShooterDetector),
            Box::new(ArcadeResolver::new(tuning)),
        )
    }

    /// Space shooter: drifting ships, sphere-vs-sphere hits.
    pub fn shooter(config: ShooterConfig) -> Self {
        Self::new(
            Box::new(ShooterIntegrator::new(config)),
            Box::new(ShooterDetector),
            Box::new(ContactResolver),
        )
    }

    /// First-person mode walking over level geometry.
    pub fn first_person(config: FirstPersonConfig, meshes: MeshStore) -> Self {
        Self::new(
            Box::new(FirstPersonIntegrator::new(config)),
            Box::new(MeshDetector::new(meshes)),
            Box::new(ContactResolver),
        )
    }

    /// Flight mode over terrain meshes.
    pub fn flight(config: FlightConfig, meshes: MeshStore) -> Self {
        Self::new(
            Box::new(FlightIntegrator::new(config)),
            Box::new(MeshDetector::new(meshes)),
            Box::new(ContactResolver),
        )
    }

    /// Overworld characters and mobs.
    pub fn overworld(meshes: MeshStore) -> Self {
        Self::new(
            Box::new(OverworldIntegrator::new()),
            Box::new(MeshDetector::new(meshes)),
            Box::new(ContactResolver),
        )
    }

    /// Advance one physics tick. Returns the number of handled collisions.
    pub fn tick(&mut self, world: &mut World, dt: f32) -> usize {
        let mut dynamic = Vec::new();
        let mut kinematic = Vec::new();
        let mut roster = Vec::new();
        for (entity, body) in world.query::<&Body>().iter() {
            roster.push(entity);
            match body.motion {
                Motion::Dynamic => dynamic.push(entity),
                Motion::Kinematic => kinematic.push(entity),
                Motion::Static => {}
            }
        }

        self.integrator
            .integrate_kinematic(world, &kinematic, dt, &mut self.events);
        self.integrator
            .integrate_dynamic(world, &dynamic, dt, &mut self.events);

        let mut collisions = self.detector.detect(world, &roster);
        let handled = self
            .resolver
            .resolve_all(world, &mut collisions, &mut self.events);

        update_state_flags(world, &collisions);
        handled
    }

    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    /// Hand the tick's notifications to the outside world, oldest first.
    pub fn drain_events(&mut self) -> Vec<PhysicsEvent> {
        self.events.drain()
    }
}

/// Refresh the rest/colliding flags of every dynamic body from this
/// tick's outcome. A body that took part in a handled contact is
/// COLLIDING; a body below the rest thresholds enters AT_REST and settles
/// into IN_REST on the following ticks; the flags never mix.
fn update_state_flags(world: &mut World, collisions: &[Collision]) {
    let mut touched: HashSet<Entity> = HashSet::new();
    for collision in collisions {
        if collision.resolved {
            touched.insert(collision.one);
            touched.insert(collision.two);
        }
    }

    for (entity, body) in world.query_mut::<&mut Body>() {
        if body.motion != Motion::Dynamic {
            continue;
        }
        if touched.contains(&entity) {
            body.state = Body::COLLIDING;
        } else {
            let still = body.velocity.length_squared()
                < REST_SPEED_THRESHOLD * REST_SPEED_THRESHOLD;
            let no_input = body.relative_velocity.length_squared()
                < REST_INPUT_THRESHOLD * REST_INPUT_THRESHOLD
                && body.relative_acceleration.length_squared()
                    < REST_INPUT_THRESHOLD * REST_INPUT_THRESHOLD
                && body.force.length_squared() < REST_INPUT_THRESHOLD * REST_INPUT_THRESHOLD;
            if still && no_input {
                body.state = if body.is_at_rest() {
                    Body::IN_REST
                } else {
                    Body::AT_REST
                };
            } else {
                body.state = 0;
            }
        }
    }
}
