//! Gravity-relative character control: orientation, movement, jump and look
//! for a character whose "down" can switch between four cardinal directions.

pub mod character;
pub mod kinematics;
pub mod look;
pub mod movement;
pub mod orientation;
pub mod systems;
pub mod view_roll;

pub use character::{CharacterController, CharacterPhysics, CharacterStatus};
pub use kinematics::CharacterKinematics;
pub use look::{CameraMount, CameraRig, LookController};
pub use movement::{JumpPhase, MovementController, MovementSettings};
pub use orientation::{BodyOrientation, OrientationAligner};
pub use systems::{
    CharacterInput, FixedTick, advance_tick_system, character_control_system,
    gravity_command_system,
};
pub use view_roll::ViewRollState;
