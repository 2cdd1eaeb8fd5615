//! Screen-space view roll and the look-axis remap it implies.

use glam::Vec2;

/// 90° screen rotation index in `0..4`, independent of gravity.
///
/// Roll `r` means the view is rolled by `r * 90°`; it only changes how raw
/// look deltas map onto yaw and pitch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ViewRollState {
    roll: u8,
}

impl ViewRollState {
    #[must_use]
    pub fn new(roll: i32) -> Self {
        let mut state = Self::default();
        state.set(roll);
        state
    }

    #[must_use]
    pub fn roll(self) -> u8 {
        self.roll
    }

    /// Wraps any integer into `0..4`.
    pub fn set(&mut self, roll: i32) {
        self.roll = roll.rem_euclid(4) as u8;
    }

    /// `roll = (roll + delta) mod 4`. Returns the new roll.
    pub fn apply(&mut self, delta: i32) -> u8 {
        self.set(i32::from(self.roll) + delta.rem_euclid(4));
        self.roll
    }

    /// Map a raw look delta `(dx, dy)` to `(yaw_delta, pitch_delta)`.
    #[must_use]
    pub fn remap(self, look: Vec2) -> Vec2 {
        let (dx, dy) = (look.x, look.y);
        match self.roll {
            0 => Vec2::new(dx, dy),
            1 => Vec2::new(-dy, dx),
            2 => Vec2::new(-dx, -dy),
            _ => Vec2::new(dy, -dx),
        }
    }
}
