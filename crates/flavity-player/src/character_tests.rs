use super::*;
use crate::look::CameraRig;
use flavity_physics::{GRAVITY_MAGNITUDE, GroundMask, PlaneGround};
use glam::Quat;

struct FakeBody {
    position: Vec3,
    velocity: Vec3,
    rotation: Quat,
    gravity: Vec3,
    ground: PlaneGround,
}

impl FakeBody {
    /// Standing 0.5 m above a South floor at `y = 0`.
    fn on_floor() -> Self {
        Self {
            position: Vec3::new(0.0, 0.5, 0.0),
            velocity: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            gravity: Vec3::new(0.0, -GRAVITY_MAGNITUDE, 0.0),
            ground: PlaneGround::new().with_plane(Vec3::ZERO, Vec3::Y, GroundMask::layer(0)),
        }
    }

    fn floating() -> Self {
        Self {
            position: Vec3::new(0.0, 50.0, 0.0),
            ..Self::on_floor()
        }
    }
}

impl CharacterBody for FakeBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn linear_velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }
}

impl GroundSensor for FakeBody {
    fn probe(&self, origin: Vec3, down: Vec3, max_distance: f32, mask: GroundMask) -> bool {
        self.ground.probe(origin, down, max_distance, mask)
    }
}

impl GravityField for FakeBody {
    fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }
}

fn run(
    controller: &mut CharacterController,
    input: InputSnapshot,
    dt: f32,
    gravity: &mut GravityState,
    body: &mut FakeBody,
) {
    let mut rig = CameraRig::default();
    controller.tick(&input, dt, gravity, Some(body), Some(&mut rig));
}

fn approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-4
}

#[test]
fn test_session_defaults() {
    let controller = CharacterController::new(&Config::default());
    assert_eq!(controller.current_gravity_direction(), GravityDirection::South);
    assert_eq!(controller.view_roll().roll(), 0);
    assert!(!controller.is_grounded());
    assert!(!controller.is_jumping());
}

#[test]
fn test_forward_walk_keeps_vertical_speed() {
    let mut controller = CharacterController::new(&Config::default());
    let mut gravity = GravityState::default();
    let mut body = FakeBody::floating();
    body.velocity = Vec3::new(0.0, -3.0, 0.0);

    run(
        &mut controller,
        InputSnapshot::moving(Vec2::new(0.0, 1.0)),
        1.0 / 60.0,
        &mut gravity,
        &mut body,
    );

    assert!(approx(body.velocity, Vec3::new(0.0, -3.0, -5.0)));
    assert!(!controller.is_grounded());
}

#[test]
fn test_jump_rises_for_three_ticks() {
    let mut controller = CharacterController::new(&Config::default());
    let mut gravity = GravityState::default();
    let mut body = FakeBody::on_floor();

    let press = InputSnapshot::neutral().with_jump(true, true);
    let hold = InputSnapshot::neutral().with_jump(true, false);

    run(&mut controller, press, 0.1, &mut gravity, &mut body);
    assert!(controller.is_grounded());
    assert!(controller.is_jumping());
    assert_eq!(controller.kinematics().jump_time_remaining, 0.3);
    assert!(approx(body.velocity, Vec3::new(0.0, 5.0, 0.0)));

    let mut phases = Vec::new();
    for _ in 0..3 {
        run(&mut controller, hold, 0.1, &mut gravity, &mut body);
        phases.push(controller.kinematics().jump_phase);
    }
    assert_eq!(
        phases,
        vec![JumpPhase::Rising, JumpPhase::Rising, JumpPhase::Idle]
    );
}

#[test]
fn test_airborne_press_is_ignored() {
    let mut controller = CharacterController::new(&Config::default());
    let mut gravity = GravityState::default();
    let mut body = FakeBody::floating();

    run(
        &mut controller,
        InputSnapshot::neutral().with_jump(true, true),
        0.1,
        &mut gravity,
        &mut body,
    );
    assert_eq!(controller.kinematics().jump_phase, JumpPhase::Idle);
}

#[test]
fn test_gravity_switch_publishes_and_aligns_same_tick() {
    let mut controller = CharacterController::new(&Config::default());
    let mut gravity = GravityState::default();
    let mut body = FakeBody::floating();

    run(
        &mut controller,
        InputSnapshot::neutral().with_gravity_delta(1),
        0.1,
        &mut gravity,
        &mut body,
    );

    assert_eq!(gravity.current(), GravityDirection::West);
    assert_eq!(body.gravity, gravity.vector());
    assert_eq!(controller.current_gravity_direction(), GravityDirection::West);
    assert!(approx(body.rotation * Vec3::NEG_Y, Vec3::NEG_X));
}

#[test]
fn test_align_to_gravity_for_all_directions() {
    for direction in GravityDirection::ALL {
        let mut controller = CharacterController::new(&Config::default());
        let mut gravity = GravityState::default();
        let mut body = FakeBody::floating();
        gravity.switch(direction);

        controller.align_to_gravity(&gravity, Some(&mut body));

        let down = controller.kinematics().orientation.down();
        assert!(approx(down, gravity.vector().normalize()), "{direction:?}");
        assert!(approx(body.rotation * Vec3::NEG_Y, gravity.vector().normalize()));
    }
}

#[test]
fn test_jump_follows_new_up_after_switch() {
    let mut controller = CharacterController::new(&Config::default());
    let mut gravity = GravityState::default();
    let mut body = FakeBody::on_floor();

    run(
        &mut controller,
        InputSnapshot::neutral().with_jump(true, true),
        0.1,
        &mut gravity,
        &mut body,
    );
    run(
        &mut controller,
        InputSnapshot::neutral()
            .with_jump(true, false)
            .with_gravity_delta(1),
        0.1,
        &mut gravity,
        &mut body,
    );

    assert!(controller.is_jumping());
    assert!((controller.kinematics().jump_time_remaining - 0.2).abs() < 1e-5);
    // West gravity: up is +X.
    assert!(approx(body.velocity, Vec3::new(5.0, 0.0, 0.0)));
}

#[test]
fn test_grounded_is_reprobed_after_switch() {
    let mut controller = CharacterController::new(&Config::default());
    let mut gravity = GravityState::default();
    let mut body = FakeBody::on_floor();

    run(&mut controller, InputSnapshot::neutral(), 0.1, &mut gravity, &mut body);
    assert!(controller.is_grounded());

    run(
        &mut controller,
        InputSnapshot::neutral().with_gravity_delta(2),
        0.1,
        &mut gravity,
        &mut body,
    );
    assert_eq!(gravity.current(), GravityDirection::North);
    assert!(!controller.is_grounded());
}

#[test]
fn test_shared_gravity_aligns_other_characters() {
    let mut a = CharacterController::new(&Config::default());
    let mut b = CharacterController::new(&Config::default());
    let mut gravity = GravityState::default();
    let mut body_a = FakeBody::floating();
    let mut body_b = FakeBody::floating();

    run(
        &mut a,
        InputSnapshot::neutral().with_gravity_delta(2),
        0.1,
        &mut gravity,
        &mut body_a,
    );
    run(&mut b, InputSnapshot::neutral(), 0.1, &mut gravity, &mut body_b);

    assert_eq!(b.current_gravity_direction(), GravityDirection::North);
    assert!(approx(body_b.rotation * Vec3::NEG_Y, Vec3::Y));
}

#[test]
fn test_reported_direction_follows_alignment_not_state() {
    let mut controller = CharacterController::new(&Config::default());
    let mut gravity = GravityState::default();
    let mut body = FakeBody::floating();
    run(&mut controller, InputSnapshot::neutral(), 0.1, &mut gravity, &mut body);

    gravity.switch(GravityDirection::East);
    assert_eq!(controller.current_gravity_direction(), GravityDirection::South);

    controller.align_to_gravity(&gravity, Some(&mut body));
    assert_eq!(controller.current_gravity_direction(), GravityDirection::East);

    gravity.switch(GravityDirection::West);
    run(&mut controller, InputSnapshot::neutral(), 0.1, &mut gravity, &mut body);
    assert_eq!(controller.current_gravity_direction(), GravityDirection::West);
}

#[test]
fn test_roll_independent_of_gravity_by_default() {
    let mut controller = CharacterController::new(&Config::default());
    let mut gravity = GravityState::default();
    let mut body = FakeBody::floating();

    run(
        &mut controller,
        InputSnapshot::neutral().with_gravity_delta(1),
        0.1,
        &mut gravity,
        &mut body,
    );
    assert_eq!(controller.view_roll().roll(), 0);

    run(
        &mut controller,
        InputSnapshot::neutral().with_roll_delta(-1),
        0.1,
        &mut gravity,
        &mut body,
    );
    assert_eq!(controller.view_roll().roll(), 3);
}

#[test]
fn test_roll_reset_on_gravity_change_when_coupled() {
    let mut config = Config::default();
    config.look.roll_coupling = RollCoupling::ResetOnGravityChange;
    let mut controller = CharacterController::new(&config);
    let mut gravity = GravityState::default();
    let mut body = FakeBody::floating();

    run(
        &mut controller,
        InputSnapshot::neutral().with_roll_delta(2),
        0.1,
        &mut gravity,
        &mut body,
    );
    run(
        &mut controller,
        InputSnapshot::neutral().with_gravity_delta(3),
        0.1,
        &mut gravity,
        &mut body,
    );
    assert_eq!(gravity.current(), GravityDirection::East);
    assert_eq!(controller.view_roll().roll(), 1);

    // Re-aligning to the same direction leaves the roll alone.
    run(
        &mut controller,
        InputSnapshot::neutral().with_roll_delta(1),
        0.1,
        &mut gravity,
        &mut body,
    );
    controller.align_to_gravity(&gravity, Some(&mut body));
    assert_eq!(controller.view_roll().roll(), 2);
}

#[test]
fn test_look_updates_body_and_camera() {
    let mut controller = CharacterController::new(&Config::default());
    let mut gravity = GravityState::default();
    let mut body = FakeBody::floating();
    let mut rig = CameraRig::default();

    let input = InputSnapshot::neutral().with_look(Vec2::new(900.0, 100_000.0));
    controller.tick(&input, 0.1, &mut gravity, Some(&mut body), Some(&mut rig));

    let kinematics = controller.kinematics();
    assert!((kinematics.orientation.yaw - 90.0_f32.to_radians()).abs() < 1e-4);
    assert!((kinematics.pitch + std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    assert!(approx(body.rotation * Vec3::NEG_Z, Vec3::X));
    assert_eq!(rig.local_rotation, LookController::camera_rotation(kinematics.pitch));
}

#[test]
fn test_missing_collaborators_degrade() {
    let mut controller = CharacterController::new(&Config::default());
    let mut gravity = GravityState::default();
    let input = InputSnapshot::moving(Vec2::new(1.0, 0.0))
        .with_jump(true, true)
        .with_look(Vec2::new(10.0, 0.0));

    controller.tick(&input.with_gravity_delta(-1), 0.1, &mut gravity, None, None);
    for _ in 0..2 {
        controller.tick(&input, 0.1, &mut gravity, None, None);
    }

    assert_eq!(gravity.current(), GravityDirection::East);
    assert_eq!(controller.current_gravity_direction(), GravityDirection::East);
    assert!(!controller.is_grounded());
    assert!(!controller.is_jumping());
    let right = controller.kinematics().orientation.right();
    assert!(controller.kinematics().velocity.dot(right) > 4.9);
    assert!(controller.kinematics().orientation.yaw > 0.0);
}

#[test]
fn test_status_reflects_last_tick() {
    let mut controller = CharacterController::new(&Config::default());
    let mut gravity = GravityState::default();
    let mut body = FakeBody::on_floor();

    run(
        &mut controller,
        InputSnapshot::moving(Vec2::new(0.0, 1.0)).with_sprint(true),
        0.1,
        &mut gravity,
        &mut body,
    );

    let status = controller.status();
    assert!(status.grounded);
    assert!(status.sprinting);
    assert_eq!(status.move_magnitude, 1.0);
    assert_eq!(status.gravity, GravityDirection::South);
    assert!((status.velocity.length() - 8.0).abs() < 1e-4);
}
