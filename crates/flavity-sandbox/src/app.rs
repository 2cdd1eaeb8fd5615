//! World and schedule for a headless session in the gravity room.

use bevy_ecs::prelude::*;
use flavity_config::Config;
use flavity_physics::{
    GravityDirection, GravityState, GroundMask, PhysicsWorld, gravity_sync_system,
    physics_step_system, spawn_character_body, spawn_room,
};
use flavity_player::{
    CameraRig, CharacterController, CharacterInput, CharacterStatus, FixedTick,
    advance_tick_system, character_control_system, gravity_command_system,
};
use glam::Vec3;
use tracing::info;

use crate::script::{Cue, ScriptedDevices, script_input_system};

/// How often [`status_report_system`] logs, in ticks. Zero disables it.
#[derive(Resource, Debug, Clone, Copy)]
pub struct StatusInterval(pub u32);

/// Marks the scripted character.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// End-of-session summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSummary {
    pub ticks: u64,
    pub gravity: GravityDirection,
    pub status: Option<CharacterStatus>,
}

pub fn build_world(config: &Config, timeline: Vec<Cue>) -> World {
    let mut world = World::new();
    let gravity = GravityState::new(config.physics.gravity_magnitude);
    let mut physics = PhysicsWorld::with_gravity(&gravity, config.physics.fixed_dt);

    let ground = GroundMask(config.movement.ground_layers);
    let half_extent = config.sandbox.room_half_extent.max(1.0);
    spawn_room(&mut physics, half_extent, ground);
    let handle = spawn_character_body(&mut physics, Vec3::new(0.0, -half_extent + 1.0, 0.0));
    info!(
        "Room: half extent {:.1}m, ground layers {:#b}",
        half_extent, ground.0
    );

    world.insert_resource(gravity);
    world.insert_resource(physics);
    world.insert_resource(FixedTick::new(config.physics.fixed_dt));
    world.insert_resource(StatusInterval(config.debug.status_interval));
    world.insert_resource(ScriptedDevices::new(timeline));

    world.spawn((
        Player,
        CharacterController::new(config),
        CharacterInput::default(),
        handle,
        CameraRig::default(),
    ));
    world
}

/// Script, then gravity commands, then characters, then physics. Gravity is
/// re-synced before the step.
pub fn build_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            script_input_system,
            gravity_command_system,
            character_control_system,
            gravity_sync_system,
            physics_step_system,
            status_report_system,
            advance_tick_system,
        )
            .chain(),
    );
    schedule
}

pub fn status_report_system(
    clock: Res<FixedTick>,
    interval: Res<StatusInterval>,
    players: Query<&CharacterController, With<Player>>,
) {
    if interval.0 == 0 || clock.tick % u64::from(interval.0) != 0 {
        return;
    }
    for controller in &players {
        let status = controller.status();
        info!(
            "tick {:>5} | gravity {:?} roll {} | grounded {} jumping {} | pos ({:.2}, {:.2}, {:.2}) | speed {:.2}",
            clock.tick,
            status.gravity,
            status.view_roll,
            status.grounded,
            status.jumping,
            status.position.x,
            status.position.y,
            status.position.z,
            status.velocity.length()
        );
    }
}

/// Run `config.sandbox.ticks` fixed ticks.
pub fn run(config: &Config, timeline: Vec<Cue>) -> SessionSummary {
    let mut world = build_world(config, timeline);
    let mut schedule = build_schedule();
    for _ in 0..config.sandbox.ticks {
        schedule.run(&mut world);
    }

    let status = world
        .query_filtered::<&CharacterController, With<Player>>()
        .iter(&world)
        .next()
        .map(CharacterController::status);
    SessionSummary {
        ticks: world.resource::<FixedTick>().tick,
        gravity: world.resource::<GravityState>().current(),
        status,
    }
}
