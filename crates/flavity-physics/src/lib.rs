//! Physics collaborator for the character controller.
//!
//! Holds the cardinal gravity model ([`GravityState`]), the ground-probe contract
//! ([`GroundSensor`]), and a Rapier 3D backed [`PhysicsWorld`] that integrates
//! character bodies between controller ticks.

pub mod character_body;
pub mod gravity;
pub mod ground;

use bevy_ecs::prelude::*;
use glam::Vec3;
use rapier3d::prelude::*;

pub use character_body::{
    CHARACTER_LAYER, CHARACTER_RADIUS, CharacterBody, CharacterBodyHandle, RapierCharacter,
    spawn_character_body, spawn_static_box,
};
pub use gravity::{GRAVITY_MAGNITUDE, GravityDirection, GravityField, GravityState};
pub use ground::{GroundMask, GroundSensor, PlaneGround};

/// Central physics simulation resource owning all Rapier state.
#[derive(Resource)]
pub struct PhysicsWorld {
    /// World-space gravity vector. Kept equal to [`GravityState::vector`].
    pub gravity: Vector,
    /// Timestep and solver configuration.
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    /// Broad-phase collision detection (also provides the query pipeline).
    pub broad_phase: BroadPhaseBvh,
    pub narrow_phase: NarrowPhase,
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    /// A world stepping at `1/60` s under South gravity.
    pub fn new() -> Self {
        Self::with_gravity(&GravityState::default(), 1.0 / 60.0)
    }

    /// A world whose gravity matches `gravity` and whose step length is `dt`.
    pub fn with_gravity(gravity: &GravityState, dt: f32) -> Self {
        let integration_parameters = IntegrationParameters {
            dt,
            ..Default::default()
        };
        let g = gravity.vector();

        Self {
            gravity: Vector::new(g.x, g.y, g.z),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Advances the simulation by one fixed timestep.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            &(),
            &(),
        );
    }

    #[must_use]
    pub fn gravity(&self) -> Vec3 {
        Vec3::new(self.gravity.x, self.gravity.y, self.gravity.z)
    }

    /// Distance to the first collider on `mask` layers along the ray, skipping
    /// colliders attached to `exclude`.
    pub fn cast_ground_ray(
        &self,
        origin: Vec3,
        down: Vec3,
        max_distance: f32,
        mask: GroundMask,
        exclude: Option<RigidBodyHandle>,
    ) -> Option<f32> {
        let dir = down.try_normalize()?;
        let on_mask =
            |_: ColliderHandle, collider: &Collider| {
                GroundMask::from_user_data(collider.user_data).intersects(mask)
            };

        let mut filter = QueryFilter::new().predicate(&on_mask);
        if let Some(body) = exclude {
            filter = filter.exclude_rigid_body(body);
        }

        let query_pipeline = self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.rigid_body_set,
            &self.collider_set,
            filter,
        );

        let ray = Ray::new(
            Vector::new(origin.x, origin.y, origin.z),
            Vector::new(dir.x, dir.y, dir.z),
        );
        query_pipeline
            .cast_ray(&ray, max_distance, true)
            .map(|(_, toi)| toi)
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl GravityField for PhysicsWorld {
    fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = Vector::new(gravity.x, gravity.y, gravity.z);
    }
}

impl GroundSensor for PhysicsWorld {
    fn probe(&self, origin: Vec3, down: Vec3, max_distance: f32, mask: GroundMask) -> bool {
        self.cast_ground_ray(origin, down, max_distance, mask, None)
            .is_some()
    }
}

/// Closes a cube of side `2 * half_extent` centred on the origin with six
/// one-meter-thick slabs on `layers`, so every gravity direction has a floor.
pub fn spawn_room(
    physics: &mut PhysicsWorld,
    half_extent: f32,
    layers: GroundMask,
) -> [ColliderHandle; 6] {
    let offset = half_extent + 0.5;
    let span = half_extent + 1.0;
    let faces = [
        (Vec3::new(0.0, -offset, 0.0), Vec3::new(span, 0.5, span)),
        (Vec3::new(0.0, offset, 0.0), Vec3::new(span, 0.5, span)),
        (Vec3::new(-offset, 0.0, 0.0), Vec3::new(0.5, span, span)),
        (Vec3::new(offset, 0.0, 0.0), Vec3::new(0.5, span, span)),
        (Vec3::new(0.0, 0.0, -offset), Vec3::new(span, span, 0.5)),
        (Vec3::new(0.0, 0.0, offset), Vec3::new(span, span, 0.5)),
    ];
    faces.map(|(center, half_extents)| spawn_static_box(physics, center, half_extents, layers))
}

/// Steps the simulation once per invocation. Runs after the character systems.
pub fn physics_step_system(mut physics: ResMut<PhysicsWorld>) {
    physics.step();
}

/// Re-publishes [`GravityState`] to the world whenever the resource changed,
/// covering switches made outside [`GravityState::switch_in`].
pub fn gravity_sync_system(gravity: Res<GravityState>, mut physics: ResMut<PhysicsWorld>) {
    if gravity.is_changed() {
        physics.set_gravity(gravity.vector());
    }
}
