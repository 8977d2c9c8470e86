//! Vegetation components and their wind response.
//!
//! A plant is either a rigid blade that rotates around its pivot, or a
//! sprite sliced into a grid whose vertices are displaced individually.
//! Both map a wind sample to a visual response through smooth saturating
//! curves, so a continuous field gives continuous motion.

use bevy::prelude::*;

use crate::error::{at_most, positive, ConfigError};

/// Most rows or columns a deformable grid may have.
pub const MAX_GRID_DIM: usize = 256;

/// How a vegetation instance responds to wind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VegetationKind {
    /// Rotates as a whole around its pivot.
    RigidBlade,
    /// An R x C vertex grid bent row by row.
    DeformableGrid,
}

/// Per-plant simulation state.
///
/// The entity's `Transform` translation is the pivot's world position.
#[derive(Component, Debug, Clone)]
pub struct VegetationInstance {
    /// Normalized anchor within the visual, image convention (0,0 top-left,
    /// (0.5, 1.0) bottom-center).
    pub pivot: Vec2,
    /// Time offset that keeps identical plants out of lockstep.
    pub phase_seed: f32,
    pub kind: VegetationKind,
}

impl VegetationInstance {
    /// Grids must be pivoted on their bottom edge, where row 0 sits.
    pub fn new(pivot: Vec2, phase_seed: f32, kind: VegetationKind) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&pivot.x) || !(0.0..=1.0).contains(&pivot.y) {
            return Err(ConfigError::InvalidPivot { x: pivot.x, y: pivot.y });
        }
        if kind == VegetationKind::DeformableGrid && pivot.y != 1.0 {
            return Err(ConfigError::GridPivotNotAtBase { y: pivot.y });
        }
        Ok(Self { pivot, phase_seed, kind })
    }

    /// Time at which this instance samples the wind field.
    pub fn sample_time(&self, time: f32) -> f32 {
        time + self.phase_seed
    }

    /// Pivot expressed as a Bevy sprite anchor (centered, y-up).
    pub fn anchor_offset(&self) -> Vec2 {
        Vec2::new(self.pivot.x - 0.5, 0.5 - self.pivot.y)
    }
}

/// Rotation response of a rigid blade.
#[derive(Component, Debug, Clone)]
pub struct BladeSway {
    /// Largest rotation in radians, approached but never exceeded.
    pub max_deflection: f32,
    /// Radians per unit of force before saturation kicks in.
    pub sensitivity: f32,
    /// Current rotation in radians (counter-clockwise positive).
    pub angle: f32,
}

impl BladeSway {
    pub fn new(max_deflection: f32, sensitivity: f32) -> Result<Self, ConfigError> {
        Ok(Self {
            max_deflection: positive("blade max deflection", max_deflection)?,
            sensitivity: positive("blade sensitivity", sensitivity)?,
            angle: 0.0,
        })
    }

    /// Maps a wind sample to a rotation.
    ///
    /// Blades are seen side-on, so only the horizontal component bends them.
    /// Wind toward +X tips the blade clockwise. The curve is `tanh`, linear
    /// near zero and saturating at `max_deflection`.
    pub fn angle_for(&self, force: Vec2) -> f32 {
        let max = self.max_deflection;
        -max * (self.sensitivity * force.x / max).tanh()
    }

    pub fn respond(&mut self, force: Vec2) {
        self.angle = self.angle_for(force);
    }
}

/// Smoothly limits the length of `v` to below `max`, keeping its direction.
pub fn saturate(v: Vec2, max: f32) -> Vec2 {
    let len = v.length();
    if len == 0.0 || max <= 0.0 {
        return Vec2::ZERO;
    }
    v / len * max * (len / max).tanh()
}

/// Per-vertex offsets for a grid-sliced sprite.
///
/// Row 0 is the anchored base, row `rows - 1` the free tip. A row's offset
/// is the saturated wind displacement scaled by `r / (rows - 1)`.
#[derive(Component, Debug, Clone)]
pub struct GridDeformation {
    rows: usize,
    cols: usize,
    /// Visual extent in world units.
    pub size: Vec2,
    /// World units of displacement per unit of force.
    pub displacement_scale: f32,
    /// Displacement length approached at the tip under very strong wind.
    pub max_displacement: f32,
    offsets: Vec<Vec2>,
}

impl GridDeformation {
    pub fn new(
        rows: usize,
        cols: usize,
        size: Vec2,
        displacement_scale: f32,
        max_displacement: f32,
    ) -> Result<Self, ConfigError> {
        if rows < 2 || cols < 2 {
            return Err(ConfigError::InvalidGrid { rows, cols });
        }
        at_most("grid rows", rows, MAX_GRID_DIM)?;
        at_most("grid columns", cols, MAX_GRID_DIM)?;
        positive("grid width", size.x)?;
        positive("grid height", size.y)?;
        Ok(Self {
            rows,
            cols,
            size,
            displacement_scale: positive("grid displacement scale", displacement_scale)?,
            max_displacement: positive("grid max displacement", max_displacement)?,
            offsets: vec![Vec2::ZERO; rows * cols],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Fraction of the full displacement applied to `row`.
    pub fn row_weight(&self, row: usize) -> f32 {
        row as f32 / (self.rows - 1) as f32
    }

    /// Undeformed vertex position relative to the pivot (world units, y-up).
    pub fn rest_vertex(&self, row: usize, col: usize, pivot: Vec2) -> Vec2 {
        let u = col as f32 / (self.cols - 1) as f32;
        let v = self.row_weight(row);
        Vec2::new((u - pivot.x) * self.size.x, (pivot.y - 1.0 + v) * self.size.y)
    }

    /// Displacement of a tip vertex for a raw wind sample.
    pub fn tip_displacement(&self, sample: Vec2) -> Vec2 {
        saturate(sample * self.displacement_scale, self.max_displacement)
    }

    /// Recomputes every vertex offset.
    ///
    /// `sample` returns the wind force at a world position; the base row is
    /// skipped since its weight is zero.
    pub fn update(&mut self, origin: Vec2, pivot: Vec2, mut sample: impl FnMut(Vec2) -> Vec2) {
        for row in 0..self.rows {
            let weight = self.row_weight(row);
            for col in 0..self.cols {
                let i = self.index(row, col);
                if row == 0 {
                    self.offsets[i] = Vec2::ZERO;
                    continue;
                }
                let world = origin + self.rest_vertex(row, col, pivot);
                self.offsets[i] = self.tip_displacement(sample(world)) * weight;
            }
        }
    }

    pub fn offset(&self, row: usize, col: usize) -> Vec2 {
        self.offsets[self.index(row, col)]
    }

    pub fn offsets(&self) -> &[Vec2] {
        &self.offsets
    }

    /// Deformed vertex positions relative to the pivot, row-major.
    pub fn positions(&self, pivot: Vec2) -> Vec<[f32; 3]> {
        let mut out = Vec::with_capacity(self.rows * self.cols);
        for row in 0..self.rows {
            for col in 0..self.cols {
                let p = self.rest_vertex(row, col, pivot) + self.offset(row, col);
                out.push([p.x, p.y, 0.0]);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pivot_validation() {
        assert!(VegetationInstance::new(Vec2::new(0.5, 1.0), 0.0, VegetationKind::RigidBlade).is_ok());
        assert!(VegetationInstance::new(Vec2::new(1.5, 1.0), 0.0, VegetationKind::RigidBlade).is_err());
    }

    #[test]
    fn test_grid_pivot_must_be_on_base() {
        assert!(VegetationInstance::new(Vec2::new(0.3, 1.0), 0.0, VegetationKind::DeformableGrid).is_ok());
        let err = VegetationInstance::new(Vec2::new(0.5, 0.5), 0.0, VegetationKind::DeformableGrid)
            .unwrap_err();
        assert!(matches!(err, ConfigError::GridPivotNotAtBase { .. }));
        // Blades rotate around any pivot.
        assert!(VegetationInstance::new(Vec2::new(0.5, 0.5), 0.0, VegetationKind::RigidBlade).is_ok());
    }

    #[test]
    fn test_anchor_offset_bottom_center() {
        let inst = VegetationInstance::new(Vec2::new(0.5, 1.0), 0.0, VegetationKind::RigidBlade).unwrap();
        assert_eq!(inst.anchor_offset(), Vec2::new(0.0, -0.5));
    }

    #[test]
    fn test_blade_angle_saturates() {
        let sway = BladeSway::new(0.6, 1.0).unwrap();
        let weak = sway.angle_for(Vec2::new(0.1, 0.0));
        let strong = sway.angle_for(Vec2::new(1000.0, 0.0));
        assert!(weak < 0.0, "+X wind should rotate clockwise");
        assert!(strong.abs() < 0.6 + 1e-6);
        assert!(strong.abs() > weak.abs());
    }

    #[test]
    fn test_blade_angle_continuous_through_zero() {
        let sway = BladeSway::new(0.6, 2.0).unwrap();
        let a = sway.angle_for(Vec2::new(-1e-4, 0.0));
        let b = sway.angle_for(Vec2::new(1e-4, 0.0));
        assert!((a - b).abs() < 1e-3);
    }

    #[test]
    fn test_saturate_keeps_direction() {
        let v = saturate(Vec2::new(300.0, 400.0), 10.0);
        assert!(v.length() <= 10.0 + 1e-4);
        assert!((v.normalize() - Vec2::new(0.6, 0.8)).length() < 1e-5);
        assert_eq!(saturate(Vec2::ZERO, 10.0), Vec2::ZERO);
    }

    #[test]
    fn test_grid_rejects_degenerate_shape() {
        assert!(GridDeformation::new(1, 5, Vec2::splat(10.0), 1.0, 5.0).is_err());
        assert!(GridDeformation::new(5, 5, Vec2::new(0.0, 10.0), 1.0, 5.0).is_err());
        assert!(matches!(
            GridDeformation::new(100_000, 100_000, Vec2::splat(10.0), 1.0, 5.0),
            Err(ConfigError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_grid_base_row_anchored() {
        let mut grid = GridDeformation::new(5, 5, Vec2::splat(512.0), 1.0, 80.0).unwrap();
        grid.update(Vec2::ZERO, Vec2::new(0.5, 1.0), |_| Vec2::new(1.0e6, -3.0e5));
        for col in 0..5 {
            assert_eq!(grid.offset(0, col), Vec2::ZERO);
        }
    }

    #[test]
    fn test_grid_tip_gets_full_displacement() {
        let mut grid = GridDeformation::new(5, 3, Vec2::splat(100.0), 2.0, 50.0).unwrap();
        let sample = Vec2::new(7.0, 1.0);
        grid.update(Vec2::ZERO, Vec2::new(0.5, 1.0), |_| sample);
        let full = grid.tip_displacement(sample);
        for col in 0..3 {
            assert!((grid.offset(4, col) - full).length() < 1e-5);
        }
        assert!((grid.offset(2, 1) - full * 0.5).length() < 1e-5);
    }

    #[test]
    fn test_grid_samples_at_vertex_positions() {
        let mut grid = GridDeformation::new(3, 2, Vec2::new(10.0, 20.0), 1.0, 100.0).unwrap();
        let mut seen = Vec::new();
        grid.update(Vec2::new(100.0, 50.0), Vec2::new(0.5, 1.0), |p| {
            seen.push(p);
            Vec2::ZERO
        });
        assert!(seen.contains(&Vec2::new(95.0, 70.0)), "tip left vertex: {:?}", seen);
        assert!(seen.contains(&Vec2::new(105.0, 60.0)));
    }

    #[test]
    fn test_rest_vertices_span_sprite() {
        let grid = GridDeformation::new(2, 2, Vec2::new(10.0, 20.0), 1.0, 1.0).unwrap();
        let pivot = Vec2::new(0.5, 1.0);
        assert_eq!(grid.rest_vertex(0, 0, pivot), Vec2::new(-5.0, 0.0));
        assert_eq!(grid.rest_vertex(1, 1, pivot), Vec2::new(5.0, 20.0));
        assert_eq!(grid.positions(pivot).len(), 4);
    }
}
