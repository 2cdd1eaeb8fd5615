//! Character rigid body: the physics-side half of the controller.
//!
//! The character is a dynamic, rotation-locked ball. Rapier integrates gravity
//! into its velocity between ticks; the controller reads that velocity, keeps
//! its component along local up and overwrites the rest. A ball keeps the same
//! collision shape under all four gravity directions.

use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};
use rapier3d::prelude::*;

use crate::PhysicsWorld;
use crate::gravity::GravityField;
use crate::ground::{GroundMask, GroundSensor};

/// Collision radius of the character ball, in meters.
pub const CHARACTER_RADIUS: f32 = 0.5;

/// Layer mask the character's own collider lives on. Not ground.
pub const CHARACTER_LAYER: GroundMask = GroundMask::layer(31);

/// What the controller needs from the body it drives.
pub trait CharacterBody {
    fn position(&self) -> Vec3;
    fn linear_velocity(&self) -> Vec3;
    fn set_linear_velocity(&mut self, velocity: Vec3);
    /// Presentation rotation of the body (yaw plus gravity roll).
    fn set_rotation(&mut self, rotation: Quat);
}

/// Handles to a spawned character body.
#[derive(Component, Debug, Clone, Copy)]
pub struct CharacterBodyHandle {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
    /// Last rotation commanded by the controller. The Rapier body itself has
    /// locked rotations; renderers read this instead.
    pub rotation: Quat,
}

/// Spawns the character body at `position` (local physics frame, meters).
pub fn spawn_character_body(physics: &mut PhysicsWorld, position: Vec3) -> CharacterBodyHandle {
    let body = RigidBodyBuilder::dynamic()
        .translation(Vector::new(position.x, position.y, position.z))
        .lock_rotations()
        .can_sleep(false)
        .ccd_enabled(true)
        .build();
    let body_handle = physics.rigid_body_set.insert(body);

    let collider = ColliderBuilder::ball(CHARACTER_RADIUS)
        .friction(0.0)
        .friction_combine_rule(CoefficientCombineRule::Min)
        .user_data(CHARACTER_LAYER.to_user_data())
        .build();
    let collider_handle =
        physics
            .collider_set
            .insert_with_parent(collider, body_handle, &mut physics.rigid_body_set);

    tracing::debug!(
        "Spawned character body at ({:.2}, {:.2}, {:.2})",
        position.x,
        position.y,
        position.z
    );

    CharacterBodyHandle {
        body: body_handle,
        collider: collider_handle,
        rotation: Quat::IDENTITY,
    }
}

/// Adds a fixed box centered at `center` with the given half extents on `layers`.
pub fn spawn_static_box(
    physics: &mut PhysicsWorld,
    center: Vec3,
    half_extents: Vec3,
    layers: GroundMask,
) -> ColliderHandle {
    let body = RigidBodyBuilder::fixed()
        .translation(Vector::new(center.x, center.y, center.z))
        .build();
    let body_handle = physics.rigid_body_set.insert(body);
    let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
        .user_data(layers.to_user_data())
        .build();
    physics
        .collider_set
        .insert_with_parent(collider, body_handle, &mut physics.rigid_body_set)
}

/// A character body bound to its world for one tick.
///
/// Implements every collaborator trait the controller needs: body access,
/// ground probing that ignores the character's own collider, and gravity.
pub struct RapierCharacter<'w> {
    physics: &'w mut PhysicsWorld,
    handle: &'w mut CharacterBodyHandle,
}

impl<'w> RapierCharacter<'w> {
    pub fn new(physics: &'w mut PhysicsWorld, handle: &'w mut CharacterBodyHandle) -> Self {
        Self { physics, handle }
    }
}

impl CharacterBody for RapierCharacter<'_> {
    fn position(&self) -> Vec3 {
        self.physics
            .rigid_body_set
            .get(self.handle.body)
            .map(|body| {
                let t = body.translation();
                Vec3::new(t.x, t.y, t.z)
            })
            .unwrap_or(Vec3::ZERO)
    }

    fn linear_velocity(&self) -> Vec3 {
        self.physics
            .rigid_body_set
            .get(self.handle.body)
            .map(|body| {
                let v = body.linvel();
                Vec3::new(v.x, v.y, v.z)
            })
            .unwrap_or(Vec3::ZERO)
    }

    fn set_linear_velocity(&mut self, velocity: Vec3) {
        if let Some(body) = self.physics.rigid_body_set.get_mut(self.handle.body) {
            body.set_linvel(Vector::new(velocity.x, velocity.y, velocity.z), true);
        }
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.handle.rotation = rotation;
    }
}

impl GroundSensor for RapierCharacter<'_> {
    fn probe(&self, origin: Vec3, down: Vec3, max_distance: f32, mask: GroundMask) -> bool {
        self.physics
            .cast_ground_ray(origin, down, max_distance, mask, Some(self.handle.body))
            .is_some()
    }
}

impl GravityField for RapierCharacter<'_> {
    fn set_gravity(&mut self, gravity: Vec3) {
        self.physics.set_gravity(gravity);
    }
}
