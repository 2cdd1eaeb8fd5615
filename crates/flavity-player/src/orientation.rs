//! Body orientation under cardinal gravity.
//!
//! The body rotation is `Rz(roll) * Ry(-yaw)`: yaw first, about the body's own
//! up axis, then a roll about world Z that carries local `-Y` onto the gravity
//! direction. Because the roll is applied last, local down equals gravity down
//! for every yaw, and yaw survives a gravity switch untouched.

use std::f32::consts::{FRAC_PI_2, PI};

use flavity_physics::GravityDirection;
use glam::{Quat, Vec3};

use crate::view_roll::ViewRollState;

/// Yaw plus the gravity direction the body is rolled for.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BodyOrientation {
    /// Radians about local up. Positive turns right. Unbounded.
    pub yaw: f32,
    pub direction: GravityDirection,
}

impl BodyOrientation {
    #[must_use]
    pub fn new(yaw: f32, direction: GravityDirection) -> Self {
        Self { yaw, direction }
    }

    #[must_use]
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_z(OrientationAligner::canonical_roll(self.direction))
            * Quat::from_rotation_y(-self.yaw)
    }

    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.rotation() * Vec3::Y
    }

    #[must_use]
    pub fn down(&self) -> Vec3 {
        -self.up()
    }

    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }

    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.rotation() * Vec3::X
    }

    /// Local-frame vector into world space.
    #[must_use]
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.rotation() * local
    }
}

/// Keeps a body's roll locked to the active gravity direction.
pub struct OrientationAligner;

impl OrientationAligner {
    /// Roll about world Z for each direction: South 0°, West −90°,
    /// North 180°, East +90°.
    #[must_use]
    pub fn canonical_roll(direction: GravityDirection) -> f32 {
        match direction {
            GravityDirection::South => 0.0,
            GravityDirection::West => -FRAC_PI_2,
            GravityDirection::North => PI,
            GravityDirection::East => FRAC_PI_2,
        }
    }

    /// View roll matching [`canonical_roll`](Self::canonical_roll) in quarter
    /// turns (`-90°` is roll 3).
    #[must_use]
    pub fn canonical_view_roll(direction: GravityDirection) -> ViewRollState {
        ViewRollState::new(4 - direction.index())
    }

    /// Same yaw, roll reset to `direction`'s canonical angle.
    #[must_use]
    pub fn align(body: BodyOrientation, direction: GravityDirection) -> BodyOrientation {
        if body.direction != direction {
            tracing::debug!(
                "Aligning body {:?} -> {:?} (yaw {:.3})",
                body.direction,
                direction,
                body.yaw
            );
        }
        BodyOrientation {
            yaw: body.yaw,
            direction,
        }
    }
}
