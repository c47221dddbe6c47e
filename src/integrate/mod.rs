mod aircraft;
mod arcade;
mod first_person;
mod force;
mod overworld;
mod shooter;

pub use aircraft::{FlightConfig, FlightIntegrator};
pub use arcade::{ArcadeConfig, ArcadeIntegrator};
pub use first_person::{FirstPersonConfig, FirstPersonIntegrator};
pub use force::ForceIntegrator;
pub use overworld::OverworldIntegrator;
pub use shooter::{ShooterConfig, ShooterIntegrator};

use glam::{Quat, Vec3};
use hecs::{Entity, World};

use crate::components::Body;
use crate::events::EventQueue;

pub const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

/// Timesteps at or below this are treated as "no time passed" and skipped
/// entirely, so damping and clamps cannot act without elapsed time.
pub(crate) const MIN_DT: f32 = 1e-8;

/// Advances position and velocity of one motion class over a timestep.
/// One implementation per game mode, injected into the pipeline at
/// composition time.
///
/// Callers guarantee the entity lists match the motion class named by the
/// method; entities without a `LocalTransform` + `Body` pair are skipped.
pub trait Integrator {
    fn integrate_dynamic(
        &self,
        world: &mut World,
        entities: &[Entity],
        dt: f32,
        events: &mut EventQueue,
    );

    fn integrate_kinematic(
        &self,
        world: &mut World,
        entities: &[Entity],
        dt: f32,
        events: &mut EventQueue,
    );
}

/// Axis-aligned playfield box used by the 2D-constrained modes.
#[derive(Clone, Copy, Debug)]
pub struct FrameBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl FrameBounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }
}

/// Scale the rotation angle of `spin` by `factor`, renormalized.
/// Identity (or near-identity) spin stays identity.
pub(crate) fn scale_spin(spin: Quat, factor: f32) -> Quat {
    let (axis, angle) = spin.to_axis_angle();
    if angle.abs() <= f32::EPSILON {
        return Quat::IDENTITY;
    }
    Quat::from_axis_angle(axis, angle * factor).normalize()
}

/// One step of angular-velocity quaternion integration: scale the spin
/// angle by `dt`, left-multiply into the current orientation, and
/// renormalize so repeated updates cannot drift off unit length.
pub(crate) fn integrate_spin(rotation: Quat, spin: Quat, dt: f32) -> Quat {
    (scale_spin(spin, dt) * rotation).normalize()
}

/// Orientation looking along `dir` (local -Z forward), or `None` when the
/// direction is too short to normalize.
pub(crate) fn face_toward(dir: Vec3) -> Option<Quat> {
    let len_sq = dir.length_squared();
    if len_sq <= f32::EPSILON {
        return None;
    }
    Some(Quat::from_rotation_arc(Vec3::NEG_Z, dir / len_sq.sqrt()))
}

/// Refresh the momentum bookkeeping from the current velocity and spin.
/// Angular momentum approximates the moment of inertia with plain mass.
pub(crate) fn refresh_momentum(body: &mut Body) {
    body.linear_momentum = body.velocity * body.mass;
    let (axis, angle) = body.spin.to_axis_angle();
    body.angular_momentum = if angle.abs() <= f32::EPSILON {
        Vec3::ZERO
    } else {
        axis * angle * body.mass
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn spin_integration_keeps_quaternions_unit_length() {
        let spin = Quat::from_axis_angle(Vec3::Y, FRAC_PI_2);
        let mut rotation = Quat::IDENTITY;
        for _ in 0..1000 {
            rotation = integrate_spin(rotation, spin, 1.0 / 60.0);
            assert!((rotation.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn scaled_spin_covers_the_expected_angle() {
        let spin = Quat::from_axis_angle(Vec3::Y, 1.0);
        let half = scale_spin(spin, 0.5);
        let (_, angle) = half.to_axis_angle();
        assert!((angle - 0.5).abs() < 1e-5);
    }

    #[test]
    fn identity_spin_is_a_fixed_point() {
        assert_eq!(scale_spin(Quat::IDENTITY, 0.25), Quat::IDENTITY);
    }

    #[test]
    fn face_toward_guards_zero_direction() {
        assert!(face_toward(Vec3::ZERO).is_none());
        let q = face_toward(Vec3::new(0.0, 0.0, -3.0)).unwrap();
        let forward = q * Vec3::NEG_Z;
        assert!((forward - Vec3::NEG_Z).length() < 1e-5);
    }
}
