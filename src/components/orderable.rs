//! Depth keys for back-to-front drawing.

use bevy::prelude::*;

/// Anything that can produce a fresh depth key from its current transform.
pub trait DepthKeySource {
    fn depth_key(&self, transform: &Transform) -> f32;
}

/// How a drawable derives its depth key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DepthKey {
    /// Keyed by the point where the sprite meets the ground: `offset`
    /// world units below the transform origin. Lower on screen = nearer.
    FootPoint { offset: f32 },
    /// Constant key, e.g. for backdrops.
    Fixed(f32),
}

impl DepthKeySource for DepthKey {
    fn depth_key(&self, transform: &Transform) -> f32 {
        match *self {
            DepthKey::FootPoint { offset } => -(transform.translation.y - offset),
            DepthKey::Fixed(key) => key,
        }
    }
}

/// Marks an entity as part of the depth-sorted draw order.
#[derive(Component, Debug, Clone)]
pub struct Orderable {
    pub key: DepthKey,
    /// Creation order, assigned when the entity is first seen.
    pub(crate) sequence: Option<u64>,
}

impl Orderable {
    pub fn new(key: DepthKey) -> Self {
        Self { key, sequence: None }
    }

    /// Keyed by the sprite's base, for sprites anchored at their center
    /// with the given height.
    pub fn centered_sprite(height: f32) -> Self {
        Self::new(DepthKey::FootPoint { offset: height * 0.5 })
    }

    /// Keyed by the transform origin, for sprites anchored at their base.
    pub fn base_anchored() -> Self {
        Self::new(DepthKey::FootPoint { offset: 0.0 })
    }

    pub fn sequence(&self) -> Option<u64> {
        self.sequence
    }
}

impl DepthKeySource for Orderable {
    fn depth_key(&self, transform: &Transform) -> f32 {
        self.key.depth_key(transform)
    }
}
