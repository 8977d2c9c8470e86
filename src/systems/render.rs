use bevy::prelude::*;

use crate::components::{BladeSway, GridDeformation, VegetationInstance};
use crate::utils::grid_mesh::write_grid_positions;

/// System that turns each blade's bend angle into a sprite rotation.
///
/// Blade sprites are anchored at their pivot, so rotating the transform
/// rotates around the pivot.
pub fn apply_blade_rotation(mut blades: Query<(&BladeSway, &mut Transform), Changed<BladeSway>>) {
    for (sway, mut transform) in &mut blades {
        transform.rotation = Quat::from_rotation_z(sway.angle);
    }
}

/// System that uploads deformed grid positions into the instance's mesh.
pub fn upload_grid_meshes(
    grids: Query<(&VegetationInstance, &GridDeformation, &Mesh2d), Changed<GridDeformation>>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    for (instance, grid, mesh) in &grids {
        if let Some(mesh) = meshes.get_mut(&mesh.0) {
            write_grid_positions(mesh, grid, instance.pivot);
        }
    }
}
