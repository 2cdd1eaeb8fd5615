//! Gameplay vs. menu input mode and the cursor behavior each one wants.

use serde::{Deserialize, Serialize};

use crate::action_map::{Action, ActionState};

/// Whether the cursor is captured (gameplay look) or free (menus).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursorMode {
    /// Hidden, locked, raw motion drives look.
    Captured,
    /// Visible, normal cursor.
    Free,
}

/// Which action set is live.
///
/// In `Gameplay` the character receives movement, look and command input.
/// In `Menu` only `Cancel` is honoured and the character sees a neutral snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputMode {
    #[default]
    Gameplay,
    Menu,
}

impl InputMode {
    #[must_use]
    pub fn cursor_mode(self) -> CursorMode {
        match self {
            Self::Gameplay => CursorMode::Captured,
            Self::Menu => CursorMode::Free,
        }
    }

    /// The mode for the next tick given this tick's actions.
    #[must_use]
    pub fn next(self, actions: &ActionState) -> Self {
        match self {
            Self::Gameplay if actions.just_activated(Action::Pause) => Self::Menu,
            Self::Menu if actions.just_activated(Action::Cancel) => Self::Gameplay,
            other => other,
        }
    }
}
