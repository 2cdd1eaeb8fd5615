//! Per-tick kinematic state of one character.

use glam::Vec3;

use crate::movement::JumpPhase;
use crate::orientation::BodyOrientation;

/// Per-character state rewritten every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CharacterKinematics {
    pub position: Vec3,
    pub orientation: BodyOrientation,
    /// Camera pitch in radians, clamped by the look controller.
    pub pitch: f32,
    /// Last world velocity written to the body.
    pub velocity: Vec3,
    pub grounded: bool,
    pub jump_phase: JumpPhase,
    pub jump_time_remaining: f32,
}
