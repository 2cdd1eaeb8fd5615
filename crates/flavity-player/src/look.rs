//! Mouse look: yaw turns the body, pitch tilts only the camera.

use bevy_ecs::prelude::*;
use flavity_config::LookConfig;
use glam::{Quat, Vec2};

use crate::view_roll::ViewRollState;

/// Receives the camera's rotation relative to the body.
pub trait CameraMount {
    fn set_local_rotation(&mut self, rotation: Quat);
}

/// Camera node attached to a character. Renderers combine it with the body
/// rotation.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    pub local_rotation: Quat,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            local_rotation: Quat::IDENTITY,
        }
    }
}

impl CameraMount for CameraRig {
    fn set_local_rotation(&mut self, rotation: Quat) {
        self.local_rotation = rotation;
    }
}

/// Look tuning with angles already in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookController {
    /// Radians per raw device count.
    pub sensitivity: f32,
    /// Pitch is kept within `±max_look_angle` radians.
    pub max_look_angle: f32,
}

impl From<&LookConfig> for LookController {
    fn from(config: &LookConfig) -> Self {
        Self {
            sensitivity: config.mouse_sensitivity.to_radians(),
            max_look_angle: config.max_look_angle.abs().to_radians(),
        }
    }
}

impl Default for LookController {
    fn default() -> Self {
        Self::from(&LookConfig::default())
    }
}

impl LookController {
    /// Apply one raw look delta through the view-roll remap. Adds to `yaw`
    /// without bound and keeps `pitch` clamped. Non-finite deltas are dropped.
    pub fn apply(&self, look: Vec2, roll: ViewRollState, yaw: &mut f32, pitch: &mut f32) {
        if !look.is_finite() {
            return;
        }
        let delta = roll.remap(look);
        *yaw += delta.x * self.sensitivity;
        *pitch = self.clamp_pitch(*pitch - delta.y * self.sensitivity);
    }

    #[must_use]
    pub fn clamp_pitch(&self, pitch: f32) -> f32 {
        if pitch.is_nan() {
            return 0.0;
        }
        pitch.clamp(-self.max_look_angle, self.max_look_angle)
    }

    /// Camera rotation relative to the body. Positive pitch looks down.
    #[must_use]
    pub fn camera_rotation(pitch: f32) -> Quat {
        Quat::from_rotation_x(-pitch)
    }
}
