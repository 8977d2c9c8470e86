//! Spawns the demo scene described by `SceneSetup`.

use bevy::color::Mix;
use bevy::prelude::*;
use bevy::sprite::Anchor;

use crate::components::{MoveSpeed, Orderable, Player, VegetationInstance};
use crate::plugins::simulation::SimulationSet;
use crate::resources::{FoliageSetup, GrassSetup, SceneSetup, TreeSettings};
use crate::systems::move_player;
use crate::utils::grid_mesh::build_grid_mesh;
use crate::utils::placement::MAX_PHASE_SEED;

const PLAYER_SIZE: f32 = 25.0;

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_scene)
            .add_systems(Update, move_player.in_set(SimulationSet::Transients));
    }
}

fn spawn_scene(
    mut commands: Commands,
    setup: Res<SceneSetup>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    if let Some(grass) = &setup.grass {
        spawn_grass(&mut commands, grass);
    }

    for foliage in &setup.foliage {
        spawn_foliage(&mut commands, foliage, &mut meshes, &mut materials);
    }

    if let Some(trees) = &setup.trees {
        spawn_trees(&mut commands, trees);
    }

    if setup.player {
        commands.spawn((
            Player,
            MoveSpeed::default(),
            Sprite::from_color(Color::WHITE, Vec2::splat(PLAYER_SIZE)),
            Transform::from_xyz(0.0, 90.0, 0.0),
            Orderable::centered_sprite(PLAYER_SIZE),
        ));
        info!("Spawned player");
    }
}

fn spawn_grass(commands: &mut Commands, grass: &GrassSetup) {
    let dark = Color::srgb(0.27, 0.45, 0.16);
    let light = Color::srgb(0.62, 0.72, 0.28);
    let anchor = Anchor::Custom(grass.template.anchor_offset());

    for placement in &grass.placements {
        let tint = dark.mix(&light, placement.phase_seed / MAX_PHASE_SEED);
        let mut entity = commands.spawn((
            VegetationInstance {
                phase_seed: placement.phase_seed,
                ..grass.template.clone()
            },
            grass.sway.clone(),
            Sprite {
                anchor,
                ..Sprite::from_color(tint, grass.blade_size)
            },
            Transform::from_translation(placement.position.extend(0.0)),
        ));
        if grass.orderable {
            entity.insert(Orderable::base_anchored());
        }
    }

    info!(
        "Spawned {} grass blades (orderable: {})",
        grass.placements.len(),
        grass.orderable
    );
}

fn spawn_foliage(
    commands: &mut Commands,
    foliage: &FoliageSetup,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<ColorMaterial>,
) {
    let mesh = meshes.add(build_grid_mesh(&foliage.grid, foliage.instance.pivot));
    let material = materials.add(ColorMaterial::from(Color::srgb(0.22, 0.5, 0.2)));

    commands.spawn((
        foliage.instance.clone(),
        foliage.grid.clone(),
        Mesh2d(mesh),
        MeshMaterial2d(material),
        Transform::from_translation(foliage.position.extend(0.0)),
        Orderable::base_anchored(),
    ));

    info!(
        "Spawned {}x{} foliage grid at {:?}",
        foliage.grid.rows(),
        foliage.grid.cols(),
        foliage.position
    );
}

fn spawn_trees(commands: &mut Commands, trees: &TreeSettings) {
    let size = Vec2::from(trees.size);
    let trunk = Color::srgb_u8(93, 62, 4);
    let row_width = trees.per_row as f32 * trees.spacing;

    for (row, y) in trees.row_y.iter().enumerate() {
        // Alternate rows are staggered by half a spacing
        let stagger = if row % 2 == 1 { trees.spacing * 0.5 } else { 0.0 };
        for i in 0..trees.per_row {
            let x = -row_width * 0.5 + i as f32 * trees.spacing + stagger;
            commands.spawn((
                Sprite::from_color(trunk, size),
                Transform::from_xyz(x, *y, 0.0),
                Orderable::centered_sprite(size.y),
            ));
        }
    }

    info!("Spawned {} trees in {} rows", trees.per_row * trees.row_y.len(), trees.row_y.len());
}
