use bevy::prelude::*;
use std::f32::consts::PI;

use crate::resources::{ForceSourceSet, GustRegistry};
use crate::utils::noise_map::NoiseMap;

/// How far apart (in radians) the base wave can shift between positions.
const PHASE_SPREAD: f32 = PI;

/// How fast the ripple noise scrolls along the wind direction, in map cells per second.
const RIPPLE_DRIFT: f32 = 0.35;

/// Immutable wind parameters for one scene.
///
/// Built through `WindSettings::validate`, which guarantees a unit direction
/// and non-negative magnitudes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindConfig {
    pub(crate) direction: Vec2,
    pub(crate) force: f32,
    pub(crate) speed: f32,
    pub(crate) ripple_strength: f32,
    pub(crate) noise_map_size: usize,
    pub(crate) noise_frequency: f32,
    pub(crate) noise_seed: u32,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            direction: Vec2::X,   // Default: blowing East
            force: 0.5,
            speed: 3.5,
            ripple_strength: 0.0,
            noise_map_size: 64,
            noise_frequency: 0.05,
            noise_seed: 0,
        }
    }
}

impl WindConfig {
    /// Unit vector the base wind pushes toward.
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn force(&self) -> f32 {
        self.force
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn ripple_strength(&self) -> f32 {
        self.ripple_strength
    }

    pub fn noise_frequency(&self) -> f32 {
        self.noise_frequency
    }

    /// Returns a human-readable cardinal direction (N, NE, E, etc.)
    pub fn cardinal_direction(&self) -> &'static str {
        let deg = self.direction.to_angle().to_degrees().rem_euclid(360.0);
        match deg as u32 {
            0..=22 | 338..=360 => "E",
            23..=67 => "NE",
            68..=112 => "N",
            113..=157 => "NW",
            158..=202 => "W",
            203..=247 => "SW",
            248..=292 => "S",
            293..=337 => "SE",
            _ => "?",
        }
    }
}

/// The scene's wind field: a pure function of position and time built from
/// the base wave, a noise ripple, live gusts and point force sources.
///
/// The field never clamps; saturation is left to whatever turns a sample
/// into a visual response.
#[derive(Resource, Debug, Clone)]
pub struct WindField {
    config: WindConfig,
    noise: NoiseMap,
    origin_noise: f32,
}

impl Default for WindField {
    fn default() -> Self {
        Self::new(WindConfig::default())
    }
}

impl WindField {
    pub fn new(config: WindConfig) -> Self {
        let noise = NoiseMap::generate(config.noise_map_size, config.noise_seed);
        let origin_noise = noise.sample(Vec2::ZERO);
        Self {
            config,
            noise,
            origin_noise,
        }
    }

    pub fn config(&self) -> &WindConfig {
        &self.config
    }

    /// Per-position phase offset of the base wave, zero at the world origin.
    pub fn spatial_phase(&self, position: Vec2) -> f32 {
        let n = self.noise.sample(position * self.config.noise_frequency);
        (n - self.origin_noise) * PHASE_SPREAD
    }

    /// Oscillating base wind along the configured direction.
    pub fn base_term(&self, position: Vec2, time: f32) -> Vec2 {
        let c = &self.config;
        let wave = (time * c.speed + self.spatial_phase(position)).sin();
        c.direction * c.force * wave
    }

    /// Noise perturbation that drifts downwind on its own clock.
    pub fn ripple_term(&self, position: Vec2, time: f32) -> Vec2 {
        let c = &self.config;
        if c.ripple_strength == 0.0 {
            return Vec2::ZERO;
        }
        let coord = position * c.noise_frequency - c.direction * time * RIPPLE_DRIFT;
        c.direction * self.noise.sample(coord) * c.ripple_strength
    }

    /// Ambient wind only (base wave + ripple), without transient sources.
    pub fn ambient(&self, position: Vec2, time: f32) -> Vec2 {
        self.base_term(position, time) + self.ripple_term(position, time)
    }

    /// Full force sample at `position` and `time`.
    pub fn sample(
        &self,
        position: Vec2,
        time: f32,
        gusts: &GustRegistry,
        forces: &ForceSourceSet,
    ) -> Vec2 {
        self.ambient(position, time) + gusts.force_at(position) + forces.force_at(position)
    }
}
