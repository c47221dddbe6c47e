use glam::{Quat, Vec3};

/// How a body participates in the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Motion {
    /// Never moves; acts as an immovable collision surface.
    Static,
    /// Moves along its prescribed velocity; ignores collision impulses.
    Kinematic,
    /// Fully simulated: forces, gravity, and collision response.
    Dynamic,
}

/// Index into the collision [`MeshStore`](crate::detect::MeshStore).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshHandle(pub usize);

/// Collision shape attached to a body.
#[derive(Clone, Copy, Debug)]
pub enum Shape {
    Sphere { radius: f32 },
    Aabb { half_extents: Vec3 },
    Plane { normal: Vec3, offset: f32 },
    Mesh(MeshHandle),
}

impl Shape {
    /// Bounding radius of the shape. Meshes report zero; their extent lives
    /// in the mesh store, not on the body.
    pub fn bounding_radius(&self) -> f32 {
        match self {
            Shape::Sphere { radius } => *radius,
            Shape::Aabb { half_extents } => half_extents.length(),
            Shape::Plane { .. } | Shape::Mesh(_) => 0.0,
        }
    }
}

/// Physical state of one entity. One `Body` per entity, mutated every
/// physics tick by the integrator (velocity, position bookkeeping) and the
/// resolver (velocity on impact).
#[derive(Clone, Copy, Debug)]
pub struct Body {
    pub motion: Motion,
    pub shape: Shape,

    /// Linear velocity in world space.
    pub velocity: Vec3,
    /// Effective acceleration applied last tick (world space).
    pub acceleration: Vec3,
    /// Control-input velocity in the body's local frame. Rotated into world
    /// space at integration time and never damped.
    pub relative_velocity: Vec3,
    /// Control-input acceleration (thrust) in the body's local frame.
    pub relative_acceleration: Vec3,
    /// External force accumulator, cleared after each integration.
    pub force: Vec3,

    pub linear_momentum: Vec3,
    pub angular_momentum: Vec3,

    pub mass: f32,
    /// Kept in sync with `mass`; zero for immovable bodies.
    pub inverse_mass: f32,

    /// Multiplicative velocity factor applied once per physics frame,
    /// not scaled by dt. 1.0 = no damping.
    pub linear_damping: f32,
    /// Same convention as `linear_damping`, applied to the spin angle.
    pub angular_damping: f32,

    pub gravity_scale: f32,
    pub friction: f32,
    pub restitution: f32,

    /// Angular velocity as a unit quaternion per second.
    pub spin: Quat,
    /// Snap orientation to the velocity direction instead of integrating spin.
    pub face_velocity: bool,

    /// What this body *is* (bitmask).
    pub category: u32,
    /// Which categories this body reacts to (bitmask). A pair collides only
    /// if the test passes in both directions.
    pub filter: u32,

    pub collisions_enabled: bool,
    /// Emit a lightweight contact hint (normal only) in addition to the
    /// full contact notification.
    pub contact_hints: bool,
    /// Detect collisions but never apply velocity changes or push-out.
    pub no_resolve: bool,

    /// Rest/colliding bit flags, updated once per tick. See the associated
    /// `AT_REST` / `IN_REST` / `COLLIDING` constants.
    pub state: u8,
}

impl Body {
    /// Set on the tick a body first drops below the rest thresholds.
    pub const AT_REST: u8 = 1 << 0;
    /// Set while a body stays below the rest thresholds on later ticks.
    pub const IN_REST: u8 = 1 << 1;
    /// Set on any tick the body took part in a resolved contact.
    /// Mutually exclusive with the rest flags.
    pub const COLLIDING: u8 = 1 << 2;

    pub fn new(motion: Motion, shape: Shape) -> Self {
        let mass = 1.0;
        let inverse_mass = match motion {
            Motion::Dynamic => 1.0 / mass,
            Motion::Static | Motion::Kinematic => 0.0,
        };
        Self {
            motion,
            shape,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            relative_velocity: Vec3::ZERO,
            relative_acceleration: Vec3::ZERO,
            force: Vec3::ZERO,
            linear_momentum: Vec3::ZERO,
            angular_momentum: Vec3::ZERO,
            mass,
            inverse_mass,
            linear_damping: 1.0,
            angular_damping: 1.0,
            gravity_scale: 1.0,
            friction: 0.0,
            restitution: 0.0,
            spin: Quat::IDENTITY,
            face_velocity: false,
            category: !0,
            filter: !0,
            collisions_enabled: true,
            contact_hints: false,
            no_resolve: false,
            state: 0,
        }
    }

    pub fn dynamic_sphere(radius: f32) -> Self {
        Self::new(Motion::Dynamic, Shape::Sphere { radius })
    }

    pub fn kinematic_sphere(radius: f32) -> Self {
        Self::new(Motion::Kinematic, Shape::Sphere { radius })
    }

    pub fn static_plane(normal: Vec3, offset: f32) -> Self {
        Self::new(Motion::Static, Shape::Plane { normal, offset })
    }

    pub fn static_aabb(half_extents: Vec3) -> Self {
        Self::new(Motion::Static, Shape::Aabb { half_extents })
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.set_mass(mass);
        self
    }

    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    pub fn with_gravity_scale(mut self, scale: f32) -> Self {
        self.gravity_scale = scale;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_masks(mut self, category: u32, filter: u32) -> Self {
        self.category = category;
        self.filter = filter;
        self
    }

    pub fn with_spin(mut self, spin: Quat) -> Self {
        self.spin = spin;
        self
    }

    pub fn with_face_velocity(mut self) -> Self {
        self.face_velocity = true;
        self
    }

    pub fn with_contact_hints(mut self) -> Self {
        self.contact_hints = true;
        self
    }

    pub fn with_no_resolve(mut self) -> Self {
        self.no_resolve = true;
        self
    }

    pub fn with_collisions_disabled(mut self) -> Self {
        self.collisions_enabled = false;
        self
    }

    /// Update mass and keep `inverse_mass` in sync. Non-dynamic bodies
    /// always report zero inverse mass.
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
        self.inverse_mass = if self.motion == Motion::Dynamic && mass > 0.0 {
            1.0 / mass
        } else {
            0.0
        };
    }

    /// Accumulate an external force for the next integration step.
    pub fn apply_force(&mut self, force: Vec3) {
        self.force += force;
    }

    pub fn physical_radius(&self) -> f32 {
        self.shape.bounding_radius()
    }

    pub fn is_at_rest(&self) -> bool {
        self.state & (Self::AT_REST | Self::IN_REST) != 0
    }

    pub fn is_colliding(&self) -> bool {
        self.state & Self::COLLIDING != 0
    }
}

/// Bidirectional category/filter test: each side must react to the other's
/// category for the pair to be eligible at all.
pub fn masks_allow(a: &Body, b: &Body) -> bool {
    a.filter & b.category != 0 && b.filter & a.category != 0
}
