//! Ground detection contract.
//!
//! A [`GroundSensor`] answers one question: does a ray from `origin` along
//! `down` hit geometry on one of the `mask` layers within `max_distance`?
//! Sensors hold no state between calls; callers probe every tick with the
//! current down axis, since a gravity switch changes which way "down" is.

use glam::Vec3;

/// Bit mask of collider layers (bit `n` = layer `n`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GroundMask(pub u32);

impl GroundMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);

    /// Mask containing only `layer` (`0..32`).
    #[must_use]
    pub const fn layer(layer: u32) -> Self {
        Self(1 << layer)
    }

    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Layers are stored in collider user data.
    #[must_use]
    pub const fn to_user_data(self) -> u128 {
        self.0 as u128
    }

    #[must_use]
    pub const fn from_user_data(data: u128) -> Self {
        Self(data as u32)
    }
}

/// Answers "is the character supported?".
pub trait GroundSensor {
    /// `true` iff a ray from `origin` along `down` hits `mask` geometry within
    /// `max_distance`.
    fn probe(&self, origin: Vec3, down: Vec3, max_distance: f32, mask: GroundMask) -> bool;
}

impl<F> GroundSensor for F
where
    F: Fn(Vec3, Vec3, f32, GroundMask) -> bool,
{
    fn probe(&self, origin: Vec3, down: Vec3, max_distance: f32, mask: GroundMask) -> bool {
        self(origin, down, max_distance, mask)
    }
}

/// Infinite planes as ground, for tests and geometry-free setups.
///
/// Each plane is `(point, normal, layers)`; the normal faces the walkable side.
#[derive(Debug, Clone, Default)]
pub struct PlaneGround {
    planes: Vec<(Vec3, Vec3, GroundMask)>,
}

impl PlaneGround {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_plane(mut self, point: Vec3, normal: Vec3, layers: GroundMask) -> Self {
        self.planes.push((point, normal.normalize_or_zero(), layers));
        self
    }
}

impl GroundSensor for PlaneGround {
    fn probe(&self, origin: Vec3, down: Vec3, max_distance: f32, mask: GroundMask) -> bool {
        let Some(dir) = down.try_normalize() else {
            return false;
        };
        self.planes.iter().any(|&(point, normal, layers)| {
            if !layers.intersects(mask) {
                return false;
            }
            // Ray must approach the walkable face.
            let approach = -dir.dot(normal);
            if approach <= 1e-6 {
                return false;
            }
            let height = (origin - point).dot(normal);
            height >= 0.0 && height / approach <= max_distance
        })
    }
}
