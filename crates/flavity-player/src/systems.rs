//! ECS wiring for character controllers.

use bevy_ecs::prelude::*;
use flavity_input::InputSnapshot;
use flavity_physics::{CharacterBodyHandle, GravityState, PhysicsWorld, RapierCharacter};

use crate::character::{CharacterController, CharacterPhysics};
use crate::look::{CameraMount, CameraRig};

/// Fixed simulation step shared by all character systems.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct FixedTick {
    pub dt: f32,
    /// Ticks completed so far.
    pub tick: u64,
}

impl FixedTick {
    #[must_use]
    pub fn new(dt: f32) -> Self {
        Self { dt, tick: 0 }
    }
}

/// Input for a character's next tick. Overwritten by whatever drives it.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct CharacterInput(pub InputSnapshot);

/// Apply every character's gravity command for this tick to the shared
/// [`GravityState`] (and the physics world, when present) before any character
/// moves, so all of them align to the same direction in the same tick.
/// Must run before [`character_control_system`].
pub fn gravity_command_system(
    mut gravity: ResMut<GravityState>,
    mut physics: Option<ResMut<PhysicsWorld>>,
    inputs: Query<&CharacterInput>,
) {
    for delta in inputs.iter().filter_map(|input| input.0.gravity_delta) {
        match physics.as_deref_mut() {
            Some(world) => gravity.advance_in(world, delta),
            None => gravity.advance(delta),
        };
    }
}

/// Tick every character against the shared gravity and, when present, the
/// physics world. Runs after [`gravity_command_system`] and before
/// [`flavity_physics::physics_step_system`].
pub fn character_control_system(
    clock: Res<FixedTick>,
    mut gravity: ResMut<GravityState>,
    mut physics: Option<ResMut<PhysicsWorld>>,
    mut characters: Query<(
        &mut CharacterController,
        &CharacterInput,
        Option<&mut CharacterBodyHandle>,
        Option<&mut CameraRig>,
    )>,
) {
    for (mut controller, input, mut handle, mut rig) in &mut characters {
        let mut binding = match (physics.as_deref_mut(), handle.as_deref_mut()) {
            (Some(world), Some(handle)) => Some(RapierCharacter::new(world, handle)),
            _ => None,
        };
        let body = binding
            .as_mut()
            .map(|binding| binding as &mut dyn CharacterPhysics);
        let camera = rig.as_deref_mut().map(|rig| rig as &mut dyn CameraMount);

        // Already applied by gravity_command_system.
        let input = InputSnapshot {
            gravity_delta: None,
            ..input.0
        };
        controller.tick(&input, clock.dt, &mut gravity, body, camera);
    }
}

/// Advance the tick counter. Runs last.
pub fn advance_tick_system(mut clock: ResMut<FixedTick>) {
    clock.tick += 1;
}
