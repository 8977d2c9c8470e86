//! Scene configuration.
//!
//! `SceneConfig` is the serializable surface (JSON). `SceneConfig::validate`
//! turns it into a `SceneSetup` of checked runtime types, including the
//! scattered grass field, so every setup failure surfaces before the app
//! starts.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::components::{BladeSway, GridDeformation, VegetationInstance, VegetationKind};
use crate::error::{at_most, non_negative, positive, ConfigError};
use crate::resources::gusts::DEFAULT_MAX_LIVE_GUSTS;
use crate::resources::{ForceMode, ForceSource, GustEnvelope, GustStrip, WindConfig, WindGust};
use crate::utils::placement::{Area, Placement, PlacementDensity, VegetationPlacer, MAX_INSTANCES};

const CONFIG_FILE_NAME: &str = "scene.json";

/// Largest noise map edge; the map holds `size * size` values.
pub const MAX_NOISE_MAP_SIZE: usize = 1024;

/// Seed for foliage phase seeds not fixed in the config.
const FOLIAGE_SEED: u64 = 0x5eed;

/// Which demo scene to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DemoScene {
    /// A wind-swept field of rigid blades.
    #[default]
    Grass,
    /// A single grid-deformed foliage sprite.
    Foliage,
    /// Trees and a movable player interleaving in depth.
    Orderable,
}

impl FromStr for DemoScene {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grass" => Ok(DemoScene::Grass),
            "foliage" => Ok(DemoScene::Foliage),
            "orderable" => Ok(DemoScene::Orderable),
            other => Err(format!("unknown scene '{}'", other)),
        }
    }
}

/// Where the scene config came from.
#[derive(Resource, Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Passed with `--config`.
    File(PathBuf),
    /// Found in the user's config directory.
    UserConfig(PathBuf),
    /// No file; the scene's defaults.
    BuiltIn(DemoScene),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::UserConfig(path) => write!(f, "{} (user config)", path.display()),
            ConfigSource::BuiltIn(scene) => write!(f, "built-in {:?} scene", scene),
        }
    }
}

/// Below this `|direction.x|` the base wind barely moves rigid blades.
const MIN_BLADE_DIRECTION_X: f32 = 0.1;

/// Ambient wind.
///
/// Rigid blades are drawn side-on and only bend with the horizontal part of
/// the wind, so a mostly vertical `direction` leaves a grass field still
/// (grids still follow both components).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindSettings {
    pub direction: [f32; 2],
    pub force: f32,
    pub speed: f32,
    pub ripple_strength: f32,
    pub noise_map_size: usize,
    pub noise_frequency: f32,
    pub noise_seed: u32,
}

impl Default for WindSettings {
    fn default() -> Self {
        Self {
            direction: [1.0, 0.0],
            force: 0.5,
            speed: 3.5,
            ripple_strength: 0.0,
            noise_map_size: 64,
            noise_frequency: 0.05,
            noise_seed: 0,
        }
    }
}

impl WindSettings {
    pub fn validate(&self) -> Result<WindConfig, ConfigError> {
        let direction = Vec2::from(self.direction);
        if !direction.is_finite() || direction.length_squared() == 0.0 {
            return Err(ConfigError::ZeroDirection);
        }
        if self.noise_map_size == 0 {
            return Err(ConfigError::NonPositiveValue { field: "noise map size", value: 0.0 });
        }
        at_most("noise map size", self.noise_map_size, MAX_NOISE_MAP_SIZE)?;
        Ok(WindConfig {
            direction: direction.normalize(),
            force: non_negative("wind force", self.force)?,
            speed: non_negative("wind speed", self.speed)?,
            ripple_strength: non_negative("ripple strength", self.ripple_strength)?,
            noise_map_size: self.noise_map_size,
            noise_frequency: positive("noise frequency", self.noise_frequency)?,
            noise_seed: self.noise_seed,
        })
    }
}

/// A field of rigid blades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrassSettings {
    /// Placement rectangles, in area units.
    pub areas: Vec<Area>,
    /// World units per area unit.
    pub cell_size: f32,
    /// World position of area coordinate (0, 0).
    pub origin: [f32; 2],
    pub density: PlacementDensity,
    pub seed: u64,
    pub blade_size: [f32; 2],
    pub pivot: [f32; 2],
    pub max_deflection: f32,
    pub sensitivity: f32,
    /// Join the depth-sorted draw order.
    pub orderable: bool,
}

impl Default for GrassSettings {
    fn default() -> Self {
        Self {
            areas: vec![Area::new(0.0, 0.0, 20.0, 20.0)],
            cell_size: 16.0,
            origin: [-160.0, -160.0],
            density: PlacementDensity::PerUnitArea(10.0),
            seed: 1,
            blade_size: [3.0, 18.0],
            pivot: [0.5, 1.0],
            max_deflection: 0.7,
            sensitivity: 0.6,
            orderable: true,
        }
    }
}

/// A single grid-sliced foliage sprite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoliageSettings {
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub pivot: [f32; 2],
    pub rows: usize,
    pub cols: usize,
    pub displacement_scale: f32,
    pub max_displacement: f32,
    /// Fixed phase seed; a seeded random one is drawn when absent.
    pub phase_seed: Option<f32>,
}

impl Default for FoliageSettings {
    fn default() -> Self {
        Self {
            position: [0.0, -220.0],
            size: [512.0, 512.0],
            pivot: [0.5, 1.0],
            rows: 5,
            cols: 5,
            displacement_scale: 0.25,
            max_displacement: 80.0,
            phase_seed: None,
        }
    }
}

/// The gust fired by the trigger action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GustSettings {
    pub width: f32,
    pub start: [f32; 2],
    pub end: [f32; 2],
    pub strength: f32,
    pub length: f32,
    pub duration: f32,
    pub fade_in: f32,
    pub fade_out: f32,
}

impl Default for GustSettings {
    fn default() -> Self {
        Self {
            width: 200.0,
            start: [-260.0, 160.0],
            end: [340.0, -440.0],
            strength: 500.0,
            length: 600.0,
            duration: 3.5,
            fade_in: 0.25,
            fade_out: 0.75,
        }
    }
}

impl GustSettings {
    pub fn validate(&self) -> Result<WindGust, ConfigError> {
        let strip = GustStrip::new(
            Vec2::from(self.start),
            Vec2::from(self.end),
            self.width,
            self.length,
        )?;
        let envelope = GustEnvelope::new(self.fade_in, self.duration, self.fade_out)?;
        WindGust::new(strip, envelope, self.strength)
    }
}

/// A point force source; used for the cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceSettings {
    pub radius: f32,
    pub strength: f32,
    pub mode: ForceMode,
}

impl Default for ForceSettings {
    fn default() -> Self {
        Self {
            radius: 100.0,
            strength: 100.0,
            mode: ForceMode::Repel,
        }
    }
}

impl ForceSettings {
    pub fn validate(&self) -> Result<ForceSource, ConfigError> {
        ForceSource::new(Vec2::ZERO, self.radius, self.strength, self.mode)
    }
}

/// Rows of static trees for the depth-ordering scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeSettings {
    pub per_row: usize,
    pub spacing: f32,
    pub row_y: Vec<f32>,
    pub size: [f32; 2],
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            per_row: 100,
            spacing: 40.0,
            row_y: vec![140.0, 40.0],
            size: [25.0, 50.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub wind: WindSettings,
    pub grass: Option<GrassSettings>,
    pub foliage: Vec<FoliageSettings>,
    pub gust: GustSettings,
    pub cursor_force: Option<ForceSettings>,
    pub trees: Option<TreeSettings>,
    pub player: bool,
    pub max_live_gusts: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::for_scene(DemoScene::Grass)
    }
}

impl SceneConfig {
    /// Built-in defaults for each demo scene.
    pub fn for_scene(scene: DemoScene) -> Self {
        let base = Self {
            wind: WindSettings::default(),
            grass: None,
            foliage: Vec::new(),
            gust: GustSettings::default(),
            cursor_force: None,
            trees: None,
            player: false,
            max_live_gusts: DEFAULT_MAX_LIVE_GUSTS,
        };
        match scene {
            DemoScene::Grass => Self {
                grass: Some(GrassSettings::default()),
                cursor_force: Some(ForceSettings::default()),
                ..base
            },
            DemoScene::Foliage => Self {
                wind: WindSettings {
                    force: 200.0,
                    speed: 3.95,
                    ripple_strength: 50.0,
                    ..WindSettings::default()
                },
                foliage: vec![FoliageSettings::default()],
                ..base
            },
            DemoScene::Orderable => Self {
                trees: Some(TreeSettings::default()),
                player: true,
                ..base
            },
        }
    }

    /// Reads a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Platform-specific location of the user's scene file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("verdure");
            path.push(CONFIG_FILE_NAME);
            path
        })
    }

    /// Picks the config source: an explicit path, the user's scene file if
    /// present, or the scene's built-in defaults.
    ///
    /// Runs before logging is up, so the chosen source is returned for the
    /// app to report.
    pub fn resolve(
        explicit: Option<&Path>,
        scene: DemoScene,
    ) -> Result<(Self, ConfigSource), ConfigError> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, ConfigSource::File(path.to_path_buf())));
        }
        if let Some(path) = Self::default_path().filter(|p| p.exists()) {
            let config = Self::load(&path)?;
            return Ok((config, ConfigSource::UserConfig(path)));
        }
        Ok((Self::for_scene(scene), ConfigSource::BuiltIn(scene)))
    }

    /// Validates everything and scatters the grass field.
    pub fn validate(&self) -> Result<SceneSetup, ConfigError> {
        let wind = self.wind.validate()?;
        let gust = self.gust.validate()?;
        let cursor_force = self.cursor_force.as_ref().map(ForceSettings::validate).transpose()?;
        if self.max_live_gusts == 0 {
            return Err(ConfigError::NonPositiveValue { field: "max live gusts", value: 0.0 });
        }

        let grass = self.grass.as_ref().map(build_grass).transpose()?;

        let mut seeds = VegetationPlacer::new(FOLIAGE_SEED);
        let foliage = self
            .foliage
            .iter()
            .map(|f| build_foliage(f, &mut seeds))
            .collect::<Result<Vec<_>, _>>()?;

        let trees = match &self.trees {
            Some(t) => {
                positive("tree width", t.size[0])?;
                positive("tree height", t.size[1])?;
                non_negative("tree spacing", t.spacing)?;
                let total = t.per_row.checked_mul(t.row_y.len()).unwrap_or(usize::MAX);
                at_most("tree count", total, MAX_INSTANCES)?;
                Some(t.clone())
            }
            None => None,
        };

        let mut warnings = Vec::new();
        if grass.is_some() && wind.direction().x.abs() < MIN_BLADE_DIRECTION_X {
            warnings.push(format!(
                "Wind direction {:?} is nearly vertical; grass blades only bend with the horizontal component",
                wind.direction()
            ));
        }

        Ok(SceneSetup {
            wind,
            gust,
            cursor_force,
            grass,
            foliage,
            trees,
            player: self.player,
            max_live_gusts: self.max_live_gusts,
            warnings,
        })
    }
}

fn build_grass(settings: &GrassSettings) -> Result<GrassSetup, ConfigError> {
    let cell_size = positive("grass cell size", settings.cell_size)?;
    let pivot = Vec2::from(settings.pivot);
    // Validate the template instance and response once.
    let template = VegetationInstance::new(pivot, 0.0, VegetationKind::RigidBlade)?;
    let sway = BladeSway::new(settings.max_deflection, settings.sensitivity)?;
    let blade_size = Vec2::from(settings.blade_size);
    positive("blade width", blade_size.x)?;
    positive("blade height", blade_size.y)?;

    let origin = Vec2::from(settings.origin);
    let placements = VegetationPlacer::new(settings.seed)
        .place(&settings.areas, settings.density)?
        .into_iter()
        .map(|p| Placement {
            position: origin + p.position * cell_size,
            ..p
        })
        .collect();

    Ok(GrassSetup {
        placements,
        template,
        sway,
        blade_size,
        orderable: settings.orderable,
    })
}

fn build_foliage(
    settings: &FoliageSettings,
    seeds: &mut VegetationPlacer,
) -> Result<FoliageSetup, ConfigError> {
    let phase_seed = match settings.phase_seed {
        Some(seed) => seed,
        None => seeds.phase_seed(),
    };
    let instance = VegetationInstance::new(
        Vec2::from(settings.pivot),
        phase_seed,
        VegetationKind::DeformableGrid,
    )?;
    let grid = GridDeformation::new(
        settings.rows,
        settings.cols,
        Vec2::from(settings.size),
        settings.displacement_scale,
        settings.max_displacement,
    )?;
    Ok(FoliageSetup {
        position: Vec2::from(settings.position),
        instance,
        grid,
    })
}

/// Validated grass field, already scattered in world coordinates.
#[derive(Debug, Clone)]
pub struct GrassSetup {
    pub placements: Vec<Placement>,
    pub template: VegetationInstance,
    pub sway: BladeSway,
    pub blade_size: Vec2,
    pub orderable: bool,
}

#[derive(Debug, Clone)]
pub struct FoliageSetup {
    pub position: Vec2,
    pub instance: VegetationInstance,
    pub grid: GridDeformation,
}

/// Everything needed to build a scene, checked up front.
#[derive(Resource, Debug, Clone)]
pub struct SceneSetup {
    pub wind: WindConfig,
    pub gust: WindGust,
    pub cursor_force: Option<ForceSource>,
    pub grass: Option<GrassSetup>,
    pub foliage: Vec<FoliageSetup>,
    pub trees: Option<TreeSettings>,
    pub player: bool,
    pub max_live_gusts: usize,
    /// Valid but suspicious settings, logged at startup.
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scenes_validate() {
        for scene in [DemoScene::Grass, DemoScene::Foliage, DemoScene::Orderable] {
            let setup = SceneConfig::for_scene(scene).validate();
            assert!(setup.is_ok(), "{:?}: {:?}", scene, setup.err());
        }
    }

    #[test]
    fn test_grass_defaults() {
        let setup = SceneConfig::for_scene(DemoScene::Grass).validate().unwrap();
        assert_eq!(setup.wind.direction(), Vec2::X);
        assert_eq!(setup.wind.force(), 0.5);
        assert_eq!(setup.wind.speed(), 3.5);
        let grass = setup.grass.unwrap();
        assert_eq!(grass.placements.len(), 4000);
        for p in &grass.placements {
            assert!(p.position.x >= -160.0 && p.position.x <= 160.0);
            assert!(p.position.y >= -160.0 && p.position.y <= 160.0);
        }
    }

    #[test]
    fn test_direction_is_normalized() {
        let settings = WindSettings {
            direction: [3.0, 4.0],
            ..WindSettings::default()
        };
        let config = settings.validate().unwrap();
        assert!((config.direction().length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_invalid_wind() {
        let zero = WindSettings { direction: [0.0, 0.0], ..WindSettings::default() };
        assert!(matches!(zero.validate(), Err(ConfigError::ZeroDirection)));

        let negative = WindSettings { force: -1.0, ..WindSettings::default() };
        assert!(matches!(negative.validate(), Err(ConfigError::NegativeValue { .. })));

        let no_map = WindSettings { noise_map_size: 0, ..WindSettings::default() };
        assert!(no_map.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_grass_area() {
        let mut config = SceneConfig::for_scene(DemoScene::Grass);
        if let Some(grass) = &mut config.grass {
            grass.areas = vec![Area::new(0.0, 0.0, 0.0, 10.0)];
        }
        assert!(matches!(config.validate(), Err(ConfigError::EmptyArea { index: 0 })));
    }

    #[test]
    fn test_rejects_negative_gust_duration() {
        let mut config = SceneConfig::default();
        config.gust.duration = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let json = r#"{
            "wind": { "force": 2.0 },
            "grass": { "density": { "count": 12 }, "areas": [{ "x1": 0, "y1": 0, "x2": 4, "y2": 4 }] }
        }"#;
        let config: SceneConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.wind.force, 2.0);
        assert_eq!(config.wind.speed, 3.5);
        let setup = config.validate().unwrap();
        assert_eq!(setup.grass.unwrap().placements.len(), 12);
    }

    #[test]
    fn test_scene_names() {
        assert_eq!("foliage".parse::<DemoScene>(), Ok(DemoScene::Foliage));
        assert!("forest".parse::<DemoScene>().is_err());
    }

    #[test]
    fn test_resolve_reports_explicit_file() {
        let path = std::env::temp_dir().join(format!("verdure_scene_{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "player": true }"#).unwrap();
        let resolved = SceneConfig::resolve(Some(&path), DemoScene::Grass);
        std::fs::remove_file(&path).unwrap();

        let (config, source) = resolved.unwrap();
        assert!(config.player);
        assert_eq!(source, ConfigSource::File(path.clone()));
        assert!(source.to_string().contains("verdure_scene_"));
    }

    #[test]
    fn test_resolve_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("verdure_scene_does_not_exist.json");
        let err = SceneConfig::resolve(Some(&path), DemoScene::Grass).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_rejects_oversized_values() {
        let huge_map = WindSettings { noise_map_size: 1 << 20, ..WindSettings::default() };
        assert!(matches!(huge_map.validate(), Err(ConfigError::TooLarge { .. })));

        let json = r#"{ "grass": { "density": { "per_unit_area": 1e30 } } }"#;
        let config: SceneConfig = serde_json::from_str(json).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::TooLarge { .. })));

        let mut config = SceneConfig::for_scene(DemoScene::Orderable);
        if let Some(trees) = &mut config.trees {
            trees.per_row = usize::MAX;
        }
        assert!(matches!(config.validate(), Err(ConfigError::TooLarge { .. })));

        let mut config = SceneConfig::for_scene(DemoScene::Foliage);
        config.foliage[0].rows = 10_000;
        assert!(matches!(config.validate(), Err(ConfigError::TooLarge { .. })));
    }

    #[test]
    fn test_rejects_off_base_foliage_pivot() {
        let mut config = SceneConfig::for_scene(DemoScene::Foliage);
        config.foliage[0].pivot = [0.5, 0.5];
        assert!(matches!(config.validate(), Err(ConfigError::GridPivotNotAtBase { .. })));
    }

    #[test]
    fn test_vertical_wind_over_grass_warns() {
        let mut config = SceneConfig::for_scene(DemoScene::Grass);
        config.wind.direction = [0.0, 1.0];
        let setup = config.validate().unwrap();
        assert_eq!(setup.warnings.len(), 1);
        assert!(setup.warnings[0].contains("horizontal"));

        let setup = SceneConfig::for_scene(DemoScene::Grass).validate().unwrap();
        assert!(setup.warnings.is_empty());
    }
}
