//! Action mapping: abstract controller actions bound to keys and mouse buttons.
//!
//! [`InputMap`] says which inputs trigger which [`Action`]. [`ActionResolver`]
//! recomputes an [`ActionState`] from the devices once per tick, keeping the
//! previous tick's values for edge detection. A press and release that both
//! land between two ticks still counts as an activation edge.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use winit::event::MouseButton;
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::devices::{KeyboardState, MouseState};

/// RON support for [`KeyCode`], written as its debug name (e.g. `"KeyW"`).
mod keycode_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use winit::keyboard::KeyCode;

    pub fn serialize<S: Serializer>(code: &KeyCode, s: S) -> Result<S::Ok, S::Error> {
        format!("{code:?}").serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<KeyCode, D::Error> {
        let name = String::deserialize(d)?;
        keycode_from_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown key: {name}")))
    }

    /// Keys a controller layout plausibly binds. Anything else is rejected.
    fn keycode_from_name(name: &str) -> Option<KeyCode> {
        Some(match name {
            "KeyA" => KeyCode::KeyA,
            "KeyC" => KeyCode::KeyC,
            "KeyD" => KeyCode::KeyD,
            "KeyE" => KeyCode::KeyE,
            "KeyF" => KeyCode::KeyF,
            "KeyQ" => KeyCode::KeyQ,
            "KeyR" => KeyCode::KeyR,
            "KeyS" => KeyCode::KeyS,
            "KeyW" => KeyCode::KeyW,
            "KeyZ" => KeyCode::KeyZ,
            "KeyX" => KeyCode::KeyX,
            "Digit1" => KeyCode::Digit1,
            "Digit2" => KeyCode::Digit2,
            "Digit3" => KeyCode::Digit3,
            "Space" => KeyCode::Space,
            "Enter" => KeyCode::Enter,
            "Escape" => KeyCode::Escape,
            "Tab" => KeyCode::Tab,
            "Backspace" => KeyCode::Backspace,
            "ShiftLeft" => KeyCode::ShiftLeft,
            "ShiftRight" => KeyCode::ShiftRight,
            "ControlLeft" => KeyCode::ControlLeft,
            "ControlRight" => KeyCode::ControlRight,
            "AltLeft" => KeyCode::AltLeft,
            "ArrowUp" => KeyCode::ArrowUp,
            "ArrowDown" => KeyCode::ArrowDown,
            "ArrowLeft" => KeyCode::ArrowLeft,
            "ArrowRight" => KeyCode::ArrowRight,
            _ => return None,
        })
    }
}

/// Controller actions that can be bound to keys.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Action {
    MoveForward,
    MoveBack,
    MoveLeft,
    MoveRight,
    /// Held for a variable-height jump; the press edge starts it.
    Jump,
    Sprint,
    /// Rotate gravity one quarter turn (delta +1).
    GravityLeft,
    /// Flip gravity (delta +2).
    GravityUp,
    /// Rotate gravity three quarter turns (delta +3).
    GravityRight,
    /// Roll the view a quarter turn counter-clockwise (delta −1).
    RollLeft,
    /// Roll the view a quarter turn clockwise (delta +1).
    RollRight,
    /// Leave gameplay for the pause menu.
    Pause,
    /// Leave the menu and resume gameplay.
    Cancel,
}

impl Action {
    /// Gravity actions in the order they are checked, with their cyclic delta.
    pub const GRAVITY: [(Action, i32); 3] = [
        (Action::GravityLeft, 1),
        (Action::GravityUp, 2),
        (Action::GravityRight, 3),
    ];
}

/// A physical input bound to an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputBinding {
    Key(#[serde(with = "keycode_serde")] KeyCode),
    MouseButton(MouseButtonBinding),
}

impl InputBinding {
    fn is_held(self, keyboard: &KeyboardState, mouse: &MouseState) -> bool {
        match self {
            Self::Key(code) => keyboard.is_pressed(PhysicalKey::Code(code)),
            Self::MouseButton(button) => mouse.is_button_pressed(button.to_winit()),
        }
    }

    fn was_pressed(self, keyboard: &KeyboardState, mouse: &MouseState) -> bool {
        match self {
            Self::Key(code) => keyboard.just_pressed(PhysicalKey::Code(code)),
            Self::MouseButton(button) => mouse.just_button_pressed(button.to_winit()),
        }
    }
}

/// Serializable subset of [`winit::event::MouseButton`].
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum MouseButtonBinding {
    Left,
    Right,
    Middle,
}

impl MouseButtonBinding {
    #[must_use]
    pub fn to_winit(self) -> MouseButton {
        match self {
            Self::Left => MouseButton::Left,
            Self::Right => MouseButton::Right,
            Self::Middle => MouseButton::Middle,
        }
    }
}

/// Maps [`Action`]s to lists of bindings (any bound input activates the action).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputMap {
    pub bindings: HashMap<Action, Vec<InputBinding>>,
}

impl Default for InputMap {
    fn default() -> Self {
        Self::default_bindings()
    }
}

impl InputMap {
    /// An empty map with no bindings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// WASD movement, Space jump, Left Shift sprint, arrow keys for gravity,
    /// Q/E view roll, Escape for pause and cancel.
    #[must_use]
    pub fn default_bindings() -> Self {
        use InputBinding::Key;

        let mut map = Self::new();
        map.set_bindings(Action::MoveForward, vec![Key(KeyCode::KeyW)]);
        map.set_bindings(Action::MoveBack, vec![Key(KeyCode::KeyS)]);
        map.set_bindings(Action::MoveLeft, vec![Key(KeyCode::KeyA)]);
        map.set_bindings(Action::MoveRight, vec![Key(KeyCode::KeyD)]);
        map.set_bindings(Action::Jump, vec![Key(KeyCode::Space)]);
        map.set_bindings(
            Action::Sprint,
            vec![Key(KeyCode::ShiftLeft), Key(KeyCode::ShiftRight)],
        );
        map.set_bindings(Action::GravityLeft, vec![Key(KeyCode::ArrowLeft)]);
        map.set_bindings(Action::GravityUp, vec![Key(KeyCode::ArrowUp)]);
        map.set_bindings(Action::GravityRight, vec![Key(KeyCode::ArrowRight)]);
        map.set_bindings(Action::RollLeft, vec![Key(KeyCode::KeyQ)]);
        map.set_bindings(Action::RollRight, vec![Key(KeyCode::KeyE)]);
        map.set_bindings(Action::Pause, vec![Key(KeyCode::Escape)]);
        map.set_bindings(Action::Cancel, vec![Key(KeyCode::Escape)]);
        map
    }

    /// Set the bindings for an action, replacing any existing ones.
    pub fn set_bindings(&mut self, action: Action, bindings: Vec<InputBinding>) {
        self.bindings.insert(action, bindings);
    }

    #[must_use]
    pub fn get_bindings(&self, action: Action) -> &[InputBinding] {
        self.bindings.get(&action).map_or(&[], |v| v.as_slice())
    }

    /// Serialize to a RON string.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Deserialize from a RON string.
    ///
    /// # Errors
    /// Returns an error if the RON is malformed or names an unknown key.
    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }
}

/// Per-tick action activity, with the previous tick kept for edges.
#[derive(Debug, Clone, Default)]
pub struct ActionState {
    active: HashMap<Action, bool>,
    prev_active: HashMap<Action, bool>,
    /// Actions with a binding pressed since the last tick, held or not.
    pressed: HashSet<Action>,
}

impl ActionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_active(&self, action: Action) -> bool {
        self.active.get(&action).copied().unwrap_or(false)
    }

    /// True only on the tick the action went from inactive to active, or on
    /// the tick a bound input was pressed (even if already released again).
    #[must_use]
    pub fn just_activated(&self, action: Action) -> bool {
        let rose =
            self.is_active(action) && !self.prev_active.get(&action).copied().unwrap_or(false);
        rose || self.pressed.contains(&action)
    }

    /// True only on the tick the action went from active to inactive.
    #[must_use]
    pub fn just_deactivated(&self, action: Action) -> bool {
        !self.is_active(action) && self.prev_active.get(&action).copied().unwrap_or(false)
    }

    /// Signed axis from a negative/positive action pair, in `[-1, 1]`.
    #[must_use]
    pub fn axis(&self, negative: Action, positive: Action) -> f32 {
        let mut value = 0.0;
        if self.is_active(positive) {
            value += 1.0;
        }
        if self.is_active(negative) {
            value -= 1.0;
        }
        value
    }

    /// Forget everything, including the previous tick.
    pub fn reset(&mut self) {
        self.active.clear();
        self.prev_active.clear();
        self.pressed.clear();
    }
}

/// Evaluates an [`InputMap`] against the keyboard and mouse.
pub struct ActionResolver;

impl ActionResolver {
    /// Recompute `state` for this tick. Call once per tick after device events
    /// have been processed and before the devices' transients are cleared.
    pub fn resolve(
        input_map: &InputMap,
        keyboard: &KeyboardState,
        mouse: &MouseState,
        state: &mut ActionState,
    ) {
        std::mem::swap(&mut state.prev_active, &mut state.active);
        state.active.clear();
        state.pressed.clear();

        for (action, bindings) in &input_map.bindings {
            let active = bindings.iter().any(|b| b.is_held(keyboard, mouse));
            if bindings.iter().any(|b| b.was_pressed(keyboard, mouse)) {
                state.pressed.insert(*action);
            }
            state.active.insert(*action, active);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::RawKeyEvent;
    use winit::event::{ElementState, MouseButton};

    fn key(kb: &mut KeyboardState, code: KeyCode, state: ElementState) {
        kb.process_raw(RawKeyEvent {
            key: PhysicalKey::Code(code),
            state,
            repeat: false,
        });
    }

    #[test]
    fn test_bound_key_activates_action() {
        let map = InputMap::default_bindings();
        let mut kb = KeyboardState::new();
        let mouse = MouseState::new();
        key(&mut kb, KeyCode::KeyW, ElementState::Pressed);

        let mut state = ActionState::new();
        ActionResolver::resolve(&map, &kb, &mouse, &mut state);
        assert!(state.is_active(Action::MoveForward));
        assert!(!state.is_active(Action::MoveBack));
    }

    #[test]
    fn test_either_sprint_key_activates_sprint() {
        let map = InputMap::default_bindings();
        let mut kb = KeyboardState::new();
        let mouse = MouseState::new();
        key(&mut kb, KeyCode::ShiftRight, ElementState::Pressed);

        let mut state = ActionState::new();
        ActionResolver::resolve(&map, &kb, &mouse, &mut state);
        assert!(state.is_active(Action::Sprint));
    }

    #[test]
    fn test_edges_span_one_tick() {
        let map = InputMap::default_bindings();
        let mut kb = KeyboardState::new();
        let mouse = MouseState::new();
        let mut state = ActionState::new();

        key(&mut kb, KeyCode::Space, ElementState::Pressed);
        ActionResolver::resolve(&map, &kb, &mouse, &mut state);
        assert!(state.just_activated(Action::Jump));
        kb.clear_transients();

        ActionResolver::resolve(&map, &kb, &mouse, &mut state);
        assert!(state.is_active(Action::Jump));
        assert!(!state.just_activated(Action::Jump));

        key(&mut kb, KeyCode::Space, ElementState::Released);
        ActionResolver::resolve(&map, &kb, &mouse, &mut state);
        assert!(state.just_deactivated(Action::Jump));
    }

    #[test]
    fn test_tap_between_ticks_still_activates() {
        let map = InputMap::default_bindings();
        let mut kb = KeyboardState::new();
        let mouse = MouseState::new();
        let mut state = ActionState::new();

        key(&mut kb, KeyCode::Space, ElementState::Pressed);
        key(&mut kb, KeyCode::Space, ElementState::Released);
        ActionResolver::resolve(&map, &kb, &mouse, &mut state);
        assert!(!state.is_active(Action::Jump));
        assert!(state.just_activated(Action::Jump));

        kb.clear_transients();
        ActionResolver::resolve(&map, &kb, &mouse, &mut state);
        assert!(!state.just_activated(Action::Jump));
    }

    #[test]
    fn test_mouse_button_binding() {
        let mut map = InputMap::new();
        map.set_bindings(
            Action::Jump,
            vec![InputBinding::MouseButton(MouseButtonBinding::Right)],
        );
        let kb = KeyboardState::new();
        let mut mouse = MouseState::new();
        let mut state = ActionState::new();

        mouse.on_button(MouseButton::Right, ElementState::Pressed);
        ActionResolver::resolve(&map, &kb, &mouse, &mut state);
        assert!(state.is_active(Action::Jump));
        assert!(state.just_activated(Action::Jump));

        mouse.clear_transients();
        mouse.on_button(MouseButton::Right, ElementState::Released);
        ActionResolver::resolve(&map, &kb, &mouse, &mut state);
        assert!(state.just_deactivated(Action::Jump));
    }

    #[test]
    fn test_opposing_keys_cancel_on_axis() {
        let map = InputMap::default_bindings();
        let mut kb = KeyboardState::new();
        let mouse = MouseState::new();
        key(&mut kb, KeyCode::KeyA, ElementState::Pressed);
        key(&mut kb, KeyCode::KeyD, ElementState::Pressed);

        let mut state = ActionState::new();
        ActionResolver::resolve(&map, &kb, &mouse, &mut state);
        assert_eq!(state.axis(Action::MoveLeft, Action::MoveRight), 0.0);
    }

    #[test]
    fn test_unbound_action_is_inactive() {
        let map = InputMap::new();
        let kb = KeyboardState::new();
        let mouse = MouseState::new();
        let mut state = ActionState::new();
        ActionResolver::resolve(&map, &kb, &mouse, &mut state);
        assert!(!state.is_active(Action::Jump));
        assert!(map.get_bindings(Action::Jump).is_empty());
    }

    #[test]
    fn test_input_map_ron_keeps_bindings() {
        let map = InputMap::default_bindings();
        let ron_str = map.to_ron().unwrap();
        assert!(ron_str.contains("ArrowLeft"));
        let parsed = InputMap::from_ron(&ron_str).unwrap();
        assert_eq!(
            parsed.get_bindings(Action::RollLeft),
            &[InputBinding::Key(KeyCode::KeyQ)]
        );
    }

    #[test]
    fn test_unknown_key_name_rejected() {
        let result = InputMap::from_ron(r#"(bindings: {Jump: [Key("NotAKey")]})"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_mouse_binding_parses_from_ron() {
        let ron_str = r#"(bindings: {Sprint: [MouseButton(Middle), Key("ShiftLeft")]})"#;
        let map = InputMap::from_ron(ron_str).unwrap();
        assert_eq!(
            map.get_bindings(Action::Sprint),
            &[
                InputBinding::MouseButton(MouseButtonBinding::Middle),
                InputBinding::Key(KeyCode::ShiftLeft)
            ]
        );
    }
}
