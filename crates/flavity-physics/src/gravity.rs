//! Cardinal gravity: the four directions "down" can point and the shared state
//! holding the active one.
//!
//! Directions form a cyclic group of order four: [`GravityDirection::advance`]
//! adds a delta modulo 4, so advancing by `k` and then by `-k` always returns to
//! the starting direction.

use bevy_ecs::prelude::*;
use glam::Vec3;

/// Standard gravity acceleration in m/s².
pub const GRAVITY_MAGNITUDE: f32 = 9.81;

/// One of four mutually orthogonal "down" directions in the XY plane.
///
/// Indices follow the cycle `South → West → North → East → South`.
/// South/North and West/East are opposite pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GravityDirection {
    /// Down is `-Y`.
    #[default]
    South = 0,
    /// Down is `-X`.
    West = 1,
    /// Down is `+Y`.
    North = 2,
    /// Down is `+X`.
    East = 3,
}

impl GravityDirection {
    pub const ALL: [Self; 4] = [Self::South, Self::West, Self::North, Self::East];

    /// Position in the cycle, `0..4`.
    #[must_use]
    pub fn index(self) -> i32 {
        self as i32
    }

    /// Any integer is valid; it is wrapped into `0..4`.
    #[must_use]
    pub fn from_index(index: i32) -> Self {
        Self::ALL[index.rem_euclid(4) as usize]
    }

    /// `(index + delta) mod 4`, with negative results wrapped.
    #[must_use]
    pub fn advance(self, delta: i32) -> Self {
        Self::from_index(self.index().wrapping_add(delta.rem_euclid(4)))
    }

    /// The unit vector gravity pulls along.
    #[must_use]
    pub fn down(self) -> Vec3 {
        match self {
            Self::South => Vec3::NEG_Y,
            Self::West => Vec3::NEG_X,
            Self::North => Vec3::Y,
            Self::East => Vec3::X,
        }
    }

    /// The local up axis for a character standing in this gravity.
    #[must_use]
    pub fn up(self) -> Vec3 {
        -self.down()
    }

    #[must_use]
    pub fn opposite(self) -> Self {
        self.advance(2)
    }
}

/// Anything that integrates bodies under a global gravity vector.
pub trait GravityField {
    fn set_gravity(&mut self, gravity: Vec3);
}

/// The process-wide active gravity direction and its derived vector.
///
/// Owned once (as an ECS resource or a plain value) and handed by reference to
/// every character controller. Sessions always start with [`GravityDirection::South`].
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GravityState {
    current: GravityDirection,
    magnitude: f32,
    vector: Vec3,
}

impl Default for GravityState {
    fn default() -> Self {
        Self::new(GRAVITY_MAGNITUDE)
    }
}

impl GravityState {
    /// A fresh session state pulling toward South with the given magnitude.
    #[must_use]
    pub fn new(magnitude: f32) -> Self {
        let current = GravityDirection::South;
        Self {
            current,
            magnitude,
            vector: current.down() * magnitude,
        }
    }

    #[must_use]
    pub fn current(&self) -> GravityDirection {
        self.current
    }

    /// `magnitude * current.down()`.
    #[must_use]
    pub fn vector(&self) -> Vec3 {
        self.vector
    }

    #[must_use]
    pub fn down(&self) -> Vec3 {
        self.current.down()
    }

    #[must_use]
    pub fn magnitude(&self) -> f32 {
        self.magnitude
    }

    /// Make `direction` active. Returns `true` when the direction changed;
    /// switching to the current direction only re-derives the same vector.
    pub fn switch(&mut self, direction: GravityDirection) -> bool {
        let changed = direction != self.current;
        self.current = direction;
        self.vector = direction.down() * self.magnitude;
        if changed {
            tracing::info!(
                "Gravity switched to {:?}: ({:.2}, {:.2}, {:.2})",
                direction,
                self.vector.x,
                self.vector.y,
                self.vector.z
            );
        }
        changed
    }

    /// Switch to `current.advance(delta)` and return the new direction.
    pub fn advance(&mut self, delta: i32) -> GravityDirection {
        let next = self.current.advance(delta);
        self.switch(next);
        next
    }

    /// Switch and publish the new vector to `field` in one step, so the field
    /// never integrates with a vector from the previous direction.
    pub fn switch_in<F>(&mut self, field: &mut F, direction: GravityDirection) -> bool
    where
        F: GravityField + ?Sized,
    {
        let changed = self.switch(direction);
        field.set_gravity(self.vector);
        changed
    }

    /// [`advance`](Self::advance), publishing to `field`.
    pub fn advance_in<F>(&mut self, field: &mut F, delta: i32) -> GravityDirection
    where
        F: GravityField + ?Sized,
    {
        let next = self.current.advance(delta);
        self.switch_in(field, next);
        next
    }
}
