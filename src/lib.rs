//! Physics core of the Javelin engine: entity physics state, pluggable
//! integrator / collision-detector / collision-resolver strategies, and
//! the per-tick pipeline that runs them in order.
//!
//! Each game mode composes its own triad (see the presets on
//! [`PhysicsPipeline`]); the entity roster is a caller-owned
//! [`hecs::World`], borrowed for the duration of a tick. Everything the
//! outside world needs to react to — contacts, boundary crossings — comes
//! out of the tick as [`PhysicsEvent`]s, never as callbacks.

pub mod components;
pub mod detect;
pub mod events;
pub mod integrate;
pub mod pipeline;
pub mod query;
pub mod resolve;
pub mod timestep;
pub mod transform;

pub use components::{Body, Collision, LocalTransform, Motion, Shape};
pub use detect::{CollisionDetector, CollisionMesh, MeshDetector, MeshStore, ShooterDetector};
pub use events::{EventQueue, PhysicsEvent};
pub use integrate::{
    ArcadeIntegrator, FirstPersonIntegrator, FlightIntegrator, ForceIntegrator, Integrator,
    OverworldIntegrator, ShooterIntegrator,
};
pub use pipeline::PhysicsPipeline;
pub use resolve::{ArcadeResolver, CollisionResolver, ContactResolver};
pub use timestep::{FixedTimestep, PHYSICS_DT};
pub use transform::transform_propagation_system;
