//! Tileable coherent-noise map used by the wind field.
//!
//! Uses the `noise` crate's Perlin generator sampled on a 4-D torus, so the
//! precomputed grid wraps seamlessly on both axes. Lookups outside the map
//! wrap around and are bilinearly interpolated, which keeps every sample
//! continuous in its input coordinate.

use bevy::prelude::*;
use noise::{NoiseFn, Perlin};
use std::f64::consts::TAU;

/// Perlin features per map cell. Lower = smoother map.
const FEATURES_PER_CELL: f64 = 0.125;

/// A square grid of precomputed noise values in `[-1, 1]`.
#[derive(Debug, Clone)]
pub struct NoiseMap {
    size: usize,
    values: Vec<f32>,
}

impl NoiseMap {
    /// Builds a `size` x `size` map from a seeded Perlin generator.
    ///
    /// `size` must be at least 1 (callers validate it). Powers of two are
    /// recommended but not required.
    pub fn generate(size: usize, seed: u32) -> Self {
        let size = size.max(1);
        let perlin = Perlin::new(seed);

        // Circumference of each torus circle, in Perlin units.
        let radius = size as f64 * FEATURES_PER_CELL / TAU;

        let mut values = Vec::with_capacity(size * size);
        for y in 0..size {
            let ay = TAU * y as f64 / size as f64;
            for x in 0..size {
                let ax = TAU * x as f64 / size as f64;
                let value = perlin.get([
                    ax.cos() * radius,
                    ax.sin() * radius,
                    ay.cos() * radius,
                    ay.sin() * radius,
                ]);
                values.push(value.clamp(-1.0, 1.0) as f32);
            }
        }

        Self { size, values }
    }

    /// Builds a map from explicit values (row-major).
    #[cfg(test)]
    pub fn from_values(size: usize, values: Vec<f32>) -> Self {
        assert_eq!(values.len(), size * size);
        Self { size, values }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn at(&self, x: i64, y: i64) -> f32 {
        let n = self.size as i64;
        let xi = x.rem_euclid(n) as usize;
        let yi = y.rem_euclid(n) as usize;
        self.values[yi * self.size + xi]
    }

    /// Samples the map at a coordinate measured in cells.
    ///
    /// Coordinates wrap around the map edges; non-finite input yields 0.
    pub fn sample(&self, coord: Vec2) -> f32 {
        if !coord.is_finite() {
            return 0.0;
        }

        let x0 = coord.x.floor();
        let y0 = coord.y.floor();
        let tx = coord.x - x0;
        let ty = coord.y - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let top = lerp(self.at(x0, y0), self.at(x0 + 1, y0), tx);
        let bottom = lerp(self.at(x0, y0 + 1), self.at(x0 + 1, y0 + 1), tx);
        lerp(top, bottom, ty)
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_in_range() {
        let map = NoiseMap::generate(32, 7);
        for y in 0..32 {
            for x in 0..32 {
                let v = map.sample(Vec2::new(x as f32 + 0.3, y as f32 + 0.7));
                assert!((-1.0..=1.0).contains(&v), "sample {} out of range", v);
            }
        }
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let a = NoiseMap::generate(16, 42);
        let b = NoiseMap::generate(16, 42);
        let p = Vec2::new(3.25, 9.5);
        assert_eq!(a.sample(p), b.sample(p));
    }

    #[test]
    fn test_wraps_outside_bounds() {
        let map = NoiseMap::generate(16, 3);
        let p = Vec2::new(2.5, 4.25);
        let wrapped = p + Vec2::new(16.0 * 3.0, -16.0);
        assert!((map.sample(p) - map.sample(wrapped)).abs() < 1e-4);
    }

    #[test]
    fn test_bilinear_interpolation() {
        let map = NoiseMap::from_values(2, vec![0.0, 1.0, 1.0, 0.0]);
        assert_eq!(map.sample(Vec2::new(0.0, 0.0)), 0.0);
        assert!((map.sample(Vec2::new(0.5, 0.0)) - 0.5).abs() < 1e-6);
        assert!((map.sample(Vec2::new(0.5, 0.5)) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_seamless_across_edge() {
        // The last cell interpolates back toward cell 0, so approaching the
        // edge from either side converges to the same value.
        let map = NoiseMap::generate(8, 11);
        let before = map.sample(Vec2::new(7.9999, 2.0));
        let after = map.sample(Vec2::new(8.0, 2.0));
        assert!((before - after).abs() < 1e-3);
    }

    #[test]
    fn test_non_finite_is_zero() {
        let map = NoiseMap::generate(8, 1);
        assert_eq!(map.sample(Vec2::new(f32::NAN, 0.0)), 0.0);
    }
}
