use bevy::prelude::*;

use crate::plugins::simulation::SimulationSet;
use crate::systems::{apply_blade_rotation, upload_grid_meshes};

/// Feeds vegetation responses to Bevy's 2D renderer: blade rotations into
/// transforms and grid offsets into mesh vertices.
pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (apply_blade_rotation, upload_grid_meshes).in_set(SimulationSet::Present),
        );
    }
}
