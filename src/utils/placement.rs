//! Vegetation placement.
//!
//! Scatters instances over axis-aligned areas using a seeded RNG, so the
//! same seed always yields the same field. Each area is split into a grid
//! of roughly square cells; a random subset of cells receives one instance
//! at a jittered spot inside it, which keeps coverage even without visible
//! rows.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{at_most, non_negative, ConfigError};

/// Upper bound (exclusive) of per-instance phase seeds.
pub const MAX_PHASE_SEED: f32 = 100.0;

/// Most instances a single `place` call may generate.
pub const MAX_INSTANCES: usize = 1_000_000;

/// Axis-aligned placement rectangle from `(x1, y1)` to `(x2, y2)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Area {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// Surface area; zero for inverted or NaN rectangles.
    pub fn area(&self) -> f32 {
        let a = self.width() * self.height();
        if self.width() > 0.0 && self.height() > 0.0 {
            a
        } else {
            0.0
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x1 && p.x <= self.x2 && p.y >= self.y1 && p.y <= self.y2
    }
}

/// How many instances to place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementDensity {
    /// Instances per unit of area, applied to each area separately.
    PerUnitArea(f32),
    /// Exact total, split across areas in proportion to their size.
    Count(usize),
}

impl Default for PlacementDensity {
    fn default() -> Self {
        PlacementDensity::PerUnitArea(10.0)
    }
}

/// One generated instance location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec2,
    pub phase_seed: f32,
    /// Index of the area this placement came from.
    pub area: usize,
}

/// Seeded scatterer for vegetation instances.
pub struct VegetationPlacer {
    rng: StdRng,
}

impl VegetationPlacer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws a single phase seed in `[0, MAX_PHASE_SEED)`.
    pub fn phase_seed(&mut self) -> f32 {
        self.rng.gen_range(0.0..MAX_PHASE_SEED)
    }

    /// Generates placements over `areas`.
    ///
    /// Every position lies inside the area it was generated for. Fails on
    /// zero-area rectangles, negative or infinite densities, a nonzero
    /// request with no areas, or more than `MAX_INSTANCES` in total.
    pub fn place(
        &mut self,
        areas: &[Area],
        density: PlacementDensity,
    ) -> Result<Vec<Placement>, ConfigError> {
        for (index, area) in areas.iter().enumerate() {
            if area.area() <= 0.0 {
                return Err(ConfigError::EmptyArea { index });
            }
        }

        let counts = match density {
            PlacementDensity::PerUnitArea(d) => {
                let d = non_negative("density", d)? as f64;
                let exact: Vec<f64> = areas.iter().map(|a| (a.area() as f64 * d).round()).collect();
                let total: f64 = exact.iter().sum();
                if total.is_nan() || total > MAX_INSTANCES as f64 {
                    return Err(ConfigError::TooLarge {
                        field: "instance count",
                        value: total,
                        max: MAX_INSTANCES as f64,
                    });
                }
                exact.into_iter().map(|n| n as usize).collect::<Vec<_>>()
            }
            PlacementDensity::Count(n) => {
                split_proportionally(areas, at_most("instance count", n, MAX_INSTANCES)?)
            }
        };

        let requested = match density {
            PlacementDensity::PerUnitArea(d) => d > 0.0,
            PlacementDensity::Count(n) => n > 0,
        };
        if areas.is_empty() && requested {
            return Err(ConfigError::NoAreas);
        }

        let mut placements = Vec::with_capacity(counts.iter().sum());
        for (index, (area, count)) in areas.iter().zip(counts).enumerate() {
            self.scatter(index, area, count, &mut placements);
        }
        Ok(placements)
    }

    fn scatter(&mut self, index: usize, area: &Area, count: usize, out: &mut Vec<Placement>) {
        if count == 0 {
            return;
        }

        let aspect = area.width() / area.height();
        let cols = ((count as f32 * aspect).sqrt().ceil() as usize).clamp(1, count);
        let rows = count.div_ceil(cols).max(1);
        let cell = Vec2::new(area.width() / cols as f32, area.height() / rows as f32);
        let min = Vec2::new(area.x1, area.y1);
        let max = Vec2::new(area.x2, area.y2);

        let cells = rand::seq::index::sample(&mut self.rng, cols * rows, count);
        for cell_index in cells.iter() {
            let cx = (cell_index % cols) as f32;
            let cy = (cell_index / cols) as f32;
            let jitter = Vec2::new(self.rng.gen::<f32>(), self.rng.gen::<f32>());
            let position = (min + (Vec2::new(cx, cy) + jitter) * cell).clamp(min, max);
            out.push(Placement {
                position,
                phase_seed: self.phase_seed(),
                area: index,
            });
        }
    }
}

/// Splits `total` across areas by size using largest remainders, so the
/// parts always add up to `total`.
fn split_proportionally(areas: &[Area], total: usize) -> Vec<usize> {
    let sum: f32 = areas.iter().map(Area::area).sum();
    if areas.is_empty() || sum <= 0.0 {
        return vec![0; areas.len()];
    }

    let exact: Vec<f32> = areas
        .iter()
        .map(|a| a.area() / sum * total as f32)
        .collect();
    let mut counts: Vec<usize> = exact.iter().map(|e| e.floor() as usize).collect();
    let assigned: usize = counts.iter().sum();

    let mut by_remainder: Vec<usize> = (0..areas.len()).collect();
    by_remainder.sort_by(|&a, &b| {
        let ra = exact[a] - exact[a].floor();
        let rb = exact[b] - exact[b].floor();
        rb.total_cmp(&ra)
    });
    for &i in by_remainder.iter().cycle().take(total.saturating_sub(assigned)) {
        counts[i] += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_inside_area() {
        let area = Area::new(0.0, 0.0, 20.0, 20.0);
        let mut placer = VegetationPlacer::new(42);
        let placements = placer.place(&[area], PlacementDensity::PerUnitArea(10.0)).unwrap();
        assert_eq!(placements.len(), 4000);
        for p in &placements {
            assert!(
                (0.0..=20.0).contains(&p.position.x) && (0.0..=20.0).contains(&p.position.y),
                "{:?} escaped the area",
                p.position
            );
        }
    }

    #[test]
    fn test_same_seed_same_field() {
        let areas = [Area::new(-5.0, 0.0, 5.0, 3.0)];
        let a = VegetationPlacer::new(7).place(&areas, PlacementDensity::Count(50)).unwrap();
        let b = VegetationPlacer::new(7).place(&areas, PlacementDensity::Count(50)).unwrap();
        assert_eq!(a, b);

        let c = VegetationPlacer::new(8).place(&areas, PlacementDensity::Count(50)).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_phase_seeds_in_range_and_varied() {
        let areas = [Area::new(0.0, 0.0, 10.0, 10.0)];
        let placements = VegetationPlacer::new(1)
            .place(&areas, PlacementDensity::Count(200))
            .unwrap();
        assert!(placements
            .iter()
            .all(|p| (0.0..MAX_PHASE_SEED).contains(&p.phase_seed)));
        let first = placements[0].phase_seed;
        assert!(placements.iter().any(|p| p.phase_seed != first));
    }

    #[test]
    fn test_count_split_across_areas() {
        let areas = [
            Area::new(0.0, 0.0, 10.0, 10.0),
            Area::new(100.0, 100.0, 105.0, 110.0),
        ];
        let placements = VegetationPlacer::new(3)
            .place(&areas, PlacementDensity::Count(31))
            .unwrap();
        assert_eq!(placements.len(), 31);
        for p in &placements {
            assert!(areas[p.area].contains(p.position));
        }
        let in_first = placements.iter().filter(|p| p.area == 0).count();
        assert!(in_first > 15, "larger area should get more instances");
    }

    #[test]
    fn test_rejects_zero_area() {
        let areas = [Area::new(0.0, 0.0, 10.0, 10.0), Area::new(5.0, 5.0, 5.0, 9.0)];
        let err = VegetationPlacer::new(0)
            .place(&areas, PlacementDensity::Count(10))
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyArea { index: 1 }));
    }

    #[test]
    fn test_rejects_missing_areas() {
        let err = VegetationPlacer::new(0)
            .place(&[], PlacementDensity::PerUnitArea(2.0))
            .unwrap_err();
        assert!(matches!(err, ConfigError::NoAreas));

        let empty = VegetationPlacer::new(0).place(&[], PlacementDensity::Count(0)).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_rejects_negative_density() {
        let areas = [Area::new(0.0, 0.0, 1.0, 1.0)];
        assert!(VegetationPlacer::new(0)
            .place(&areas, PlacementDensity::PerUnitArea(-1.0))
            .is_err());
    }

    #[test]
    fn test_split_adds_up() {
        let areas = [
            Area::new(0.0, 0.0, 1.0, 1.0),
            Area::new(0.0, 0.0, 1.0, 1.0),
            Area::new(0.0, 0.0, 1.0, 1.0),
        ];
        assert_eq!(split_proportionally(&areas, 10).iter().sum::<usize>(), 10);
    }

    #[test]
    fn test_rejects_oversized_requests() {
        let areas = [Area::new(0.0, 0.0, 20.0, 20.0)];
        let err = VegetationPlacer::new(0)
            .place(&areas, PlacementDensity::PerUnitArea(1e30))
            .unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge { .. }), "got {:?}", err);

        let err = VegetationPlacer::new(0)
            .place(&areas, PlacementDensity::PerUnitArea(f32::INFINITY))
            .unwrap_err();
        assert!(matches!(err, ConfigError::NonFinite { .. }), "got {:?}", err);

        let err = VegetationPlacer::new(0)
            .place(&areas, PlacementDensity::Count(usize::MAX))
            .unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge { .. }), "got {:?}", err);
    }

    #[test]
    fn test_rejects_unbounded_area() {
        let areas = [Area::new(0.0, 0.0, f32::MAX, f32::MAX)];
        let err = VegetationPlacer::new(0)
            .place(&areas, PlacementDensity::PerUnitArea(1.0))
            .unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge { .. }), "got {:?}", err);
    }
}
