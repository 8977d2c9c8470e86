//! Triangle-list meshes for grid-deformed sprites.

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;

use crate::components::GridDeformation;

/// UVs for a grid, row-major. Row 0 is the bottom edge of the image.
pub fn grid_uvs(rows: usize, cols: usize) -> Vec<[f32; 2]> {
    let mut uvs = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        let v = 1.0 - row as f32 / (rows - 1) as f32;
        for col in 0..cols {
            uvs.push([col as f32 / (cols - 1) as f32, v]);
        }
    }
    uvs
}

/// Two counter-clockwise triangles per grid cell.
pub fn grid_indices(rows: usize, cols: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity((rows - 1) * (cols - 1) * 6);
    for row in 0..rows - 1 {
        for col in 0..cols - 1 {
            let i = (row * cols + col) as u32;
            let right = i + 1;
            let up = i + cols as u32;
            let up_right = up + 1;
            indices.extend_from_slice(&[i, right, up_right, i, up_right, up]);
        }
    }
    indices
}

/// Builds a mesh for `grid` in its current deformed state.
pub fn build_grid_mesh(grid: &GridDeformation, pivot: Vec2) -> Mesh {
    let positions = grid.positions(pivot);
    let normals = vec![[0.0, 0.0, 1.0]; positions.len()];
    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, grid_uvs(grid.rows(), grid.cols()))
    .with_inserted_indices(Indices::U32(grid_indices(grid.rows(), grid.cols())))
}

/// Rewrites vertex positions of a mesh built by `build_grid_mesh`.
pub fn write_grid_positions(mesh: &mut Mesh, grid: &GridDeformation, pivot: Vec2) {
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, grid.positions(pivot));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_count() {
        let indices = grid_indices(5, 5);
        assert_eq!(indices.len(), 4 * 4 * 6);
        assert!(indices.iter().all(|&i| i < 25));
    }

    #[test]
    fn test_uvs_flip_rows() {
        let uvs = grid_uvs(2, 2);
        assert_eq!(uvs[0], [0.0, 1.0]);
        assert_eq!(uvs[3], [1.0, 0.0]);
    }

    #[test]
    fn test_mesh_vertex_count() {
        let grid = GridDeformation::new(4, 3, Vec2::splat(64.0), 1.0, 10.0).unwrap();
        let mesh = build_grid_mesh(&grid, Vec2::new(0.5, 1.0));
        assert_eq!(mesh.count_vertices(), 12);
    }
}
