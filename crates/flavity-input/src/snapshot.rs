//! The per-tick input snapshot consumed by the character controller.
//!
//! The controller never subscribes to device callbacks. Whatever produces input
//! (keyboard and mouse through [`PlayerInput`], a replay script, a network peer)
//! builds one [`InputSnapshot`] per tick and passes it by value.

use glam::Vec2;

use crate::action_map::{Action, ActionResolver, ActionState, InputMap};
use crate::devices::{KeyboardState, MouseState};
use crate::mode::{CursorMode, InputMode};

/// Everything the controller reads from input for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    /// x = strafe (right positive), y = forward (forward positive), each in `[-1, 1]`.
    pub move_axis: Vec2,
    /// Raw look delta in device counts; x = right, y = up.
    pub look: Vec2,
    pub sprint: bool,
    /// Jump button currently held.
    pub jump_held: bool,
    /// Jump button went down this tick.
    pub jump_triggered: bool,
    /// Cyclic gravity change requested this tick.
    pub gravity_delta: Option<i32>,
    /// View roll change requested this tick (±1).
    pub roll_delta: Option<i32>,
}

impl InputSnapshot {
    /// No movement, no look, nothing held and no commands.
    #[must_use]
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Builder helpers used by scripts and tests.
    #[must_use]
    pub fn moving(move_axis: Vec2) -> Self {
        Self {
            move_axis,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_look(mut self, look: Vec2) -> Self {
        self.look = look;
        self
    }

    #[must_use]
    pub fn with_sprint(mut self, sprint: bool) -> Self {
        self.sprint = sprint;
        self
    }

    /// Hold jump; `triggered` marks the press tick.
    #[must_use]
    pub fn with_jump(mut self, held: bool, triggered: bool) -> Self {
        self.jump_held = held;
        self.jump_triggered = triggered;
        self
    }

    #[must_use]
    pub fn with_gravity_delta(mut self, delta: i32) -> Self {
        self.gravity_delta = Some(delta);
        self
    }

    #[must_use]
    pub fn with_roll_delta(mut self, delta: i32) -> Self {
        self.roll_delta = Some(delta);
        self
    }
}

/// Keyboard/mouse front end: resolves bindings, tracks the input mode and
/// emits one [`InputSnapshot`] per tick.
#[derive(Debug, Clone, Default)]
pub struct PlayerInput {
    pub input_map: InputMap,
    actions: ActionState,
    mode: InputMode,
}

impl PlayerInput {
    #[must_use]
    pub fn new(input_map: InputMap) -> Self {
        Self {
            input_map,
            actions: ActionState::new(),
            mode: InputMode::Gameplay,
        }
    }

    #[must_use]
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Cursor behavior the window should apply for the current mode.
    #[must_use]
    pub fn cursor_mode(&self) -> CursorMode {
        self.mode.cursor_mode()
    }

    #[must_use]
    pub fn actions(&self) -> &ActionState {
        &self.actions
    }

    /// Resolve this tick's devices into a snapshot.
    ///
    /// Call after the tick's device events have been processed and before the
    /// devices' transients are cleared. The tick that enters or leaves the menu
    /// yields a neutral snapshot.
    pub fn snapshot(&mut self, keyboard: &KeyboardState, mouse: &MouseState) -> InputSnapshot {
        ActionResolver::resolve(&self.input_map, keyboard, mouse, &mut self.actions);

        let next = self.mode.next(&self.actions);
        if next != self.mode {
            tracing::debug!("Input mode {:?} -> {:?}", self.mode, next);
            self.mode = next;
            return InputSnapshot::neutral();
        }
        if self.mode == InputMode::Menu {
            return InputSnapshot::neutral();
        }

        let actions = &self.actions;
        let gravity_delta = Action::GRAVITY
            .iter()
            .find(|(action, _)| actions.just_activated(*action))
            .map(|&(_, delta)| delta);

        let roll = i32::from(actions.just_activated(Action::RollRight))
            - i32::from(actions.just_activated(Action::RollLeft));

        InputSnapshot {
            move_axis: Vec2::new(
                actions.axis(Action::MoveLeft, Action::MoveRight),
                actions.axis(Action::MoveBack, Action::MoveForward),
            ),
            // Screen y grows downward; look y is "up".
            look: Vec2::new(mouse.delta().x, -mouse.delta().y),
            sprint: actions.is_active(Action::Sprint),
            jump_held: actions.is_active(Action::Jump),
            jump_triggered: actions.just_activated(Action::Jump),
            gravity_delta,
            roll_delta: (roll != 0).then_some(roll),
        }
    }
}
