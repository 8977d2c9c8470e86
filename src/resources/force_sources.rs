//! Point force sources (e.g. the cursor pushing grass aside).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{non_negative, positive, ConfigError};

/// Whether a source pushes away from or pulls toward its center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForceMode {
    /// Force points from the source toward the sampled position.
    #[default]
    Repel,
    /// Force points from the sampled position toward the source.
    Attract,
}

/// A radius-limited point force with linear falloff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceSource {
    pub position: Vec2,
    radius: f32,
    strength: f32,
    mode: ForceMode,
}

impl ForceSource {
    pub fn new(position: Vec2, radius: f32, strength: f32, mode: ForceMode) -> Result<Self, ConfigError> {
        Ok(Self {
            position,
            radius: positive("force source radius", radius)?,
            strength: non_negative("force source strength", strength)?,
            mode,
        })
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }

    /// Scalar magnitude at `distance`: full strength at the center, zero at
    /// and beyond the radius.
    pub fn falloff(&self, distance: f32) -> f32 {
        self.strength * (1.0 - distance / self.radius).max(0.0)
    }

    /// Force vector at `position`.
    ///
    /// Exactly at the center the direction is undefined, so the
    /// contribution there is zero.
    pub fn force_at(&self, position: Vec2) -> Vec2 {
        let offset = position - self.position;
        let distance = offset.length();
        if distance >= self.radius {
            return Vec2::ZERO;
        }
        let dir = offset.normalize_or_zero();
        let signed = match self.mode {
            ForceMode::Repel => dir,
            ForceMode::Attract => -dir,
        };
        signed * self.falloff(distance)
    }
}

/// Point sources contributing to the wind field.
///
/// Holds one replaceable "live" source (overwritten every tick to follow
/// a moving pointer) plus any number of persistent sources.
#[derive(Resource, Debug, Clone, Default)]
pub struct ForceSourceSet {
    live: Option<ForceSource>,
    persistent: Vec<ForceSource>,
}

impl ForceSourceSet {
    /// Replaces the live source.
    pub fn set_live(&mut self, source: ForceSource) {
        self.live = Some(source);
    }

    /// Moves the live source, if any, to `position`.
    pub fn move_live(&mut self, position: Vec2) {
        if let Some(live) = &mut self.live {
            live.position = position;
        }
    }

    pub fn clear_live(&mut self) {
        self.live = None;
    }

    pub fn live(&self) -> Option<&ForceSource> {
        self.live.as_ref()
    }

    pub fn add_persistent(&mut self, source: ForceSource) {
        self.persistent.push(source);
    }

    pub fn clear_persistent(&mut self) {
        self.persistent.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &ForceSource> {
        self.live.iter().chain(self.persistent.iter())
    }

    pub fn len(&self) -> usize {
        self.persistent.len() + usize::from(self.live.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Summed force of every source at `position`.
    pub fn force_at(&self, position: Vec2) -> Vec2 {
        self.iter().map(|s| s.force_at(position)).sum()
    }
}
