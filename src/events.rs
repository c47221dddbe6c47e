use std::collections::VecDeque;

use glam::Vec3;
use hecs::Entity;

/// World axis, used by boundary events and the 2D-constrained tunings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn get(self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    pub fn set(self, v: &mut Vec3, value: f32) {
        match self {
            Axis::X => v.x = value,
            Axis::Y => v.y = value,
            Axis::Z => v.z = value,
        }
    }
}

/// Which side of a frame boundary was crossed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Min,
    Max,
}

/// Outgoing notifications produced by the physics tick. Fire-and-forget:
/// gameplay, audio, and UI consumers drain the queue after the tick; the
/// physics side never waits on them.
#[derive(Clone, Copy, Debug)]
pub enum PhysicsEvent {
    /// Full contact notification, emitted to each participant of a
    /// handled collision. `normal` points toward `entity`.
    Contact {
        entity: Entity,
        other: Entity,
        normal: Vec3,
        depth: f32,
    },
    /// Lightweight variant carrying only the impact normal, emitted for
    /// bodies with the `contact_hints` flag set.
    ContactHint { entity: Entity, normal: Vec3 },
    /// An entity crossed a frame boundary (e.g. a goal line).
    BoundaryCrossed {
        entity: Entity,
        axis: Axis,
        side: Side,
    },
}

/// FIFO queue of physics notifications for one or more ticks.
#[derive(Default)]
pub struct EventQueue {
    events: VecDeque<PhysicsEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: PhysicsEvent) {
        self.events.push_back(event);
    }

    /// Remove and return all queued events, oldest first.
    pub fn drain(&mut self) -> Vec<PhysicsEvent> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhysicsEvent> {
        self.events.iter()
    }
}
