//! Input for the character controller: device trackers, action bindings, and the
//! per-tick [`InputSnapshot`] handed to the simulation core.

pub mod action_map;
pub mod devices;
pub mod mode;
pub mod snapshot;

pub use action_map::{
    Action, ActionResolver, ActionState, InputBinding, InputMap, MouseButtonBinding,
};
pub use devices::{KeyboardState, MouseState, RawKeyEvent};
pub use mode::{CursorMode, InputMode};
pub use snapshot::{InputSnapshot, PlayerInput};
