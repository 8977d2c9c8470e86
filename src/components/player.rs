use bevy::prelude::*;

/// Marker for the player-controlled sprite.
#[derive(Component, Debug, Default)]
pub struct Player;

/// Movement speed in world units per second.
#[derive(Component, Debug, Clone, Copy)]
pub struct MoveSpeed(pub f32);

impl Default for MoveSpeed {
    fn default() -> Self {
        Self(60.0)
    }
}
