//! Jump state machine and local-to-world velocity computation.

use flavity_config::MovementConfig;
use flavity_input::InputSnapshot;
use flavity_physics::GroundMask;
use glam::Vec3;

use crate::orientation::BodyOrientation;

/// Below this the move vector counts as zero and is not normalized.
const MOVE_EPSILON: f32 = 1e-4;

/// Remaining jump time below this is treated as exhausted.
const JUMP_TIME_EPSILON: f32 = 1e-5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum JumpPhase {
    #[default]
    Idle,
    /// Ascending with vertical speed pinned to the jump force.
    Rising,
}

/// Movement tuning, in meters and seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementSettings {
    pub move_speed: f32,
    pub sprint_speed: f32,
    pub jump_force: f32,
    pub max_jump_time: f32,
    pub ground_check_distance: f32,
    pub ground_mask: GroundMask,
}

impl From<&MovementConfig> for MovementSettings {
    fn from(config: &MovementConfig) -> Self {
        Self {
            move_speed: config.move_speed,
            sprint_speed: config.sprint_speed,
            jump_force: config.jump_force,
            max_jump_time: config.max_jump_time.max(0.0),
            ground_check_distance: config.ground_check_distance,
            ground_mask: GroundMask(config.ground_layers),
        }
    }
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self::from(&MovementConfig::default())
    }
}

/// Per-character jump timer and velocity solver.
#[derive(Debug, Clone, Default)]
pub struct MovementController {
    pub settings: MovementSettings,
    phase: JumpPhase,
    jump_time_remaining: f32,
}

impl MovementController {
    #[must_use]
    pub fn new(settings: MovementSettings) -> Self {
        Self {
            settings,
            phase: JumpPhase::Idle,
            jump_time_remaining: 0.0,
        }
    }

    #[must_use]
    pub fn phase(&self) -> JumpPhase {
        self.phase
    }

    #[must_use]
    pub fn jump_time_remaining(&self) -> f32 {
        self.jump_time_remaining
    }

    /// Advance the jump state machine by one tick.
    ///
    /// `grounded` must come from this tick's probe. The press tick starts the
    /// jump with the full timer; each later held tick drains `dt` and the jump
    /// ends on the tick the timer runs out or the button is released. Presses
    /// while airborne or already rising are ignored.
    pub fn update_jump(&mut self, input: &InputSnapshot, grounded: bool, dt: f32) -> JumpPhase {
        match self.phase {
            JumpPhase::Idle => {
                if input.jump_triggered && grounded {
                    self.phase = JumpPhase::Rising;
                    self.jump_time_remaining = self.settings.max_jump_time;
                    tracing::debug!("Jump started ({:.2}s)", self.jump_time_remaining);
                }
            }
            JumpPhase::Rising => {
                if input.jump_held {
                    self.jump_time_remaining = (self.jump_time_remaining - dt.max(0.0)).max(0.0);
                    if self.jump_time_remaining < JUMP_TIME_EPSILON {
                        self.jump_time_remaining = 0.0;
                    }
                }
                if !input.jump_held || self.jump_time_remaining <= 0.0 {
                    self.phase = JumpPhase::Idle;
                    self.jump_time_remaining = 0.0;
                    tracing::debug!("Jump ended (held={})", input.jump_held);
                }
            }
        }
        self.phase
    }

    /// Horizontal velocity in the local frame (x = right, z = back).
    #[must_use]
    pub fn horizontal_local(&self, input: &InputSnapshot) -> Vec3 {
        let wish = Vec3::new(input.move_axis.x, 0.0, -input.move_axis.y);
        if wish.length() <= MOVE_EPSILON {
            return Vec3::ZERO;
        }
        let speed = if input.sprint {
            self.settings.sprint_speed
        } else {
            self.settings.move_speed
        };
        wish.normalize() * speed
    }

    /// World velocity for this tick.
    ///
    /// `previous` is the body velocity before this tick's write; its component
    /// along the current local up is kept unless a jump is rising.
    #[must_use]
    pub fn velocity(&self, input: &InputSnapshot, body: &BodyOrientation, previous: Vec3) -> Vec3 {
        let horizontal = self.horizontal_local(input);
        let vertical = match self.phase {
            JumpPhase::Rising => self.settings.jump_force,
            JumpPhase::Idle => previous.dot(body.up()),
        };
        body.to_world(Vec3::new(horizontal.x, vertical, horizontal.z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flavity_physics::GravityDirection;
    use glam::Vec2;

    fn controller(max_jump_time: f32) -> MovementController {
        MovementController::new(MovementSettings {
            max_jump_time,
            ..MovementSettings::default()
        })
    }

    fn hold() -> InputSnapshot {
        InputSnapshot::neutral().with_jump(true, false)
    }

    fn press() -> InputSnapshot {
        InputSnapshot::neutral().with_jump(true, true)
    }

    #[test]
    fn test_press_while_grounded_starts_full_timer() {
        let mut movement = controller(0.3);
        assert_eq!(movement.update_jump(&press(), true, 0.1), JumpPhase::Rising);
        assert_eq!(movement.jump_time_remaining(), 0.3);
    }

    #[test]
    fn test_three_ticks_of_sustain() {
        let mut movement = controller(0.3);
        let mut phases = vec![movement.update_jump(&press(), true, 0.1)];
        for _ in 0..3 {
            phases.push(movement.update_jump(&hold(), false, 0.1));
        }
        assert_eq!(
            phases,
            vec![
                JumpPhase::Rising,
                JumpPhase::Rising,
                JumpPhase::Rising,
                JumpPhase::Idle
            ]
        );
    }

    #[test]
    fn test_timer_drains_monotonically_to_zero() {
        let mut movement = controller(0.3);
        movement.update_jump(&press(), true, 0.05);
        let mut last = movement.jump_time_remaining();
        let mut elapsed = 0.0;
        while movement.phase() == JumpPhase::Rising {
            movement.update_jump(&hold(), false, 0.05);
            elapsed += 0.05;
            assert!(movement.jump_time_remaining() <= last);
            last = movement.jump_time_remaining();
        }
        assert_eq!(last, 0.0);
        assert!(elapsed <= 0.3 + 1e-4);
    }

    #[test]
    fn test_release_ends_jump_immediately() {
        let mut movement = controller(0.3);
        movement.update_jump(&press(), true, 0.1);
        assert_eq!(
            movement.update_jump(&InputSnapshot::neutral(), false, 0.1),
            JumpPhase::Idle
        );
    }

    #[test]
    fn test_press_while_airborne_is_ignored() {
        let mut movement = controller(0.3);
        assert_eq!(movement.update_jump(&press(), false, 0.1), JumpPhase::Idle);
        assert_eq!(movement.jump_time_remaining(), 0.0);
    }

    #[test]
    fn test_press_while_rising_does_not_reset_timer() {
        let mut movement = controller(0.3);
        movement.update_jump(&press(), true, 0.1);
        movement.update_jump(&press(), true, 0.1);
        assert!((movement.jump_time_remaining() - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_forward_walk_keeps_fall_speed() {
        let movement = MovementController::default();
        let body = BodyOrientation::default();
        let input = InputSnapshot::moving(Vec2::new(0.0, 1.0));
        let v = movement.velocity(&input, &body, Vec3::new(0.3, -4.0, 2.0));

        assert!((v.y + 4.0).abs() < 1e-5);
        let horizontal = Vec3::new(v.x, 0.0, v.z);
        assert!((horizontal.length() - 5.0).abs() < 1e-4);
        assert!(horizontal.normalize().dot(body.forward()) > 0.9999);
    }

    #[test]
    fn test_diagonal_and_sprint_speed() {
        let movement = MovementController::default();
        let input = InputSnapshot::moving(Vec2::new(1.0, 1.0)).with_sprint(true);
        assert!((movement.horizontal_local(&input).length() - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_tiny_input_is_zero() {
        let movement = MovementController::default();
        let input = InputSnapshot::moving(Vec2::new(1e-6, 0.0));
        assert_eq!(movement.horizontal_local(&input), Vec3::ZERO);
    }

    #[test]
    fn test_rising_pins_along_current_up() {
        let mut movement = MovementController::default();
        movement.update_jump(&press(), true, 0.1);
        let body = BodyOrientation::new(0.0, GravityDirection::East);
        let v = movement.velocity(&hold(), &body, Vec3::new(30.0, 0.0, 0.0));
        assert!((v - Vec3::new(-5.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_strafe_follows_body_right_under_west_gravity() {
        let movement = MovementController::default();
        let body = BodyOrientation::new(0.4, GravityDirection::West);
        let v = movement.velocity(&InputSnapshot::moving(Vec2::new(1.0, 0.0)), &body, Vec3::ZERO);
        assert!((v - body.right() * 5.0).length() < 1e-4);
    }
}
