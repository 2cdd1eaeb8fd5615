//! The character controller.
//!
//! One [`CharacterController::tick`] runs, in order: gravity and roll commands,
//! the ground probe along the current down axis, the jump transition, the
//! velocity write, then look. The physics step runs after the tick.

use bevy_ecs::prelude::*;
use flavity_config::{Config, RollCoupling};
use flavity_input::InputSnapshot;
use flavity_physics::{CharacterBody, GravityDirection, GravityField, GravityState, GroundSensor};
use glam::{Vec2, Vec3};

use crate::kinematics::CharacterKinematics;
use crate::look::{CameraMount, LookController};
use crate::movement::{JumpPhase, MovementController, MovementSettings};
use crate::orientation::OrientationAligner;
use crate::view_roll::ViewRollState;

/// Everything the controller needs from the physics side, as one object.
pub trait CharacterPhysics: CharacterBody + GroundSensor + GravityField {}

impl<T> CharacterPhysics for T where T: CharacterBody + GroundSensor + GravityField + ?Sized {}

/// Read-only view for animation and UI collaborators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterStatus {
    pub grounded: bool,
    pub jumping: bool,
    pub gravity: GravityDirection,
    pub view_roll: u8,
    /// Length of the move input, `0..=√2`.
    pub move_magnitude: f32,
    pub sprinting: bool,
    pub look: Vec2,
    pub position: Vec3,
    pub velocity: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

#[derive(Component, Debug, Clone, Default)]
pub struct CharacterController {
    kinematics: CharacterKinematics,
    view_roll: ViewRollState,
    movement: MovementController,
    look: LookController,
    roll_coupling: RollCoupling,
    last_input: InputSnapshot,
    warned_no_body: bool,
    warned_no_camera: bool,
}

impl CharacterController {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self::with_parts(
            MovementSettings::from(&config.movement),
            LookController::from(&config.look),
            config.look.roll_coupling,
        )
    }

    #[must_use]
    pub fn with_parts(
        movement: MovementSettings,
        look: LookController,
        roll_coupling: RollCoupling,
    ) -> Self {
        Self {
            movement: MovementController::new(movement),
            look,
            roll_coupling,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn kinematics(&self) -> &CharacterKinematics {
        &self.kinematics
    }

    #[must_use]
    pub fn view_roll(&self) -> ViewRollState {
        self.view_roll
    }

    #[must_use]
    pub fn is_grounded(&self) -> bool {
        self.kinematics.grounded
    }

    #[must_use]
    pub fn is_jumping(&self) -> bool {
        self.kinematics.jump_phase == JumpPhase::Rising
    }

    /// The direction the body is currently aligned to.
    ///
    /// This is the controller's view, not [`GravityState::current`]: after a
    /// switch made elsewhere it keeps the old direction until the next
    /// [`tick`](Self::tick) or [`align_to_gravity`](Self::align_to_gravity).
    #[must_use]
    pub fn current_gravity_direction(&self) -> GravityDirection {
        self.kinematics.orientation.direction
    }

    #[must_use]
    pub fn status(&self) -> CharacterStatus {
        CharacterStatus {
            grounded: self.kinematics.grounded,
            jumping: self.is_jumping(),
            gravity: self.current_gravity_direction(),
            view_roll: self.view_roll.roll(),
            move_magnitude: self.last_input.move_axis.length(),
            sprinting: self.last_input.sprint,
            look: self.last_input.look,
            position: self.kinematics.position,
            velocity: self.kinematics.velocity,
            yaw: self.kinematics.orientation.yaw,
            pitch: self.kinematics.pitch,
        }
    }

    /// Re-apply the alignment for the active gravity, e.g. after a teleport.
    pub fn align_to_gravity(
        &mut self,
        gravity: &GravityState,
        body: Option<&mut dyn CharacterPhysics>,
    ) {
        self.align_to(gravity.current());
        if let Some(body) = body {
            body.set_rotation(self.kinematics.orientation.rotation());
        }
    }

    /// Run one tick of `dt` seconds.
    ///
    /// A missing `body` skips the probe and the velocity write (the character
    /// counts as airborne); a missing `camera` skips the camera write. Both are
    /// reported once.
    pub fn tick(
        &mut self,
        input: &InputSnapshot,
        dt: f32,
        gravity: &mut GravityState,
        mut body: Option<&mut dyn CharacterPhysics>,
        camera: Option<&mut dyn CameraMount>,
    ) {
        self.last_input = *input;

        if let Some(delta) = input.gravity_delta {
            match body.as_deref_mut() {
                Some(field) => gravity.advance_in(field, delta),
                None => gravity.advance(delta),
            };
        }
        // Another character or system may have switched gravity since our last tick.
        if gravity.current() != self.kinematics.orientation.direction {
            self.align_to(gravity.current());
        }
        if let Some(delta) = input.roll_delta {
            let roll = self.view_roll.apply(delta);
            tracing::debug!("View roll -> {}", roll);
        }

        let settings = self.movement.settings;
        let previous_velocity = match body.as_deref() {
            Some(body) => {
                self.kinematics.position = body.position();
                self.kinematics.grounded = body.probe(
                    self.kinematics.position,
                    gravity.down(),
                    settings.ground_check_distance,
                    settings.ground_mask,
                );
                body.linear_velocity()
            }
            None => {
                if !self.warned_no_body {
                    tracing::warn!(
                        "Character has no physics body; ground probe and velocity write skipped"
                    );
                    self.warned_no_body = true;
                }
                self.kinematics.grounded = false;
                self.kinematics.velocity
            }
        };

        self.kinematics.jump_phase = self
            .movement
            .update_jump(input, self.kinematics.grounded, dt);
        self.kinematics.jump_time_remaining = self.movement.jump_time_remaining();

        let velocity = self
            .movement
            .velocity(input, &self.kinematics.orientation, previous_velocity);
        self.kinematics.velocity = velocity;

        let kinematics = &mut self.kinematics;
        self.look.apply(
            input.look,
            self.view_roll,
            &mut kinematics.orientation.yaw,
            &mut kinematics.pitch,
        );

        if let Some(body) = body {
            body.set_linear_velocity(velocity);
            body.set_rotation(kinematics.orientation.rotation());
        }
        match camera {
            Some(camera) => {
                camera.set_local_rotation(LookController::camera_rotation(kinematics.pitch));
            }
            None if !self.warned_no_camera => {
                tracing::warn!("Character has no camera mount; pitch is tracked but not applied");
                self.warned_no_camera = true;
            }
            None => {}
        }

        tracing::trace!(
            "grounded={} phase={:?} v=({:.2}, {:.2}, {:.2}) yaw={:.3} pitch={:.3}",
            kinematics.grounded,
            kinematics.jump_phase,
            velocity.x,
            velocity.y,
            velocity.z,
            kinematics.orientation.yaw,
            kinematics.pitch
        );
    }

    fn align_to(&mut self, direction: GravityDirection) {
        let changed = direction != self.kinematics.orientation.direction;
        self.kinematics.orientation =
            OrientationAligner::align(self.kinematics.orientation, direction);
        if changed && self.roll_coupling == RollCoupling::ResetOnGravityChange {
            self.view_roll = OrientationAligner::canonical_view_roll(direction);
        }
    }
}

#[cfg(test)]
#[path = "character_tests.rs"]
mod tests;
