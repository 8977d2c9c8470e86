use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use leafwing_input_manager::prelude::*;

use crate::events::GustRequested;
use crate::plugins::input::SceneAction;
use crate::resources::{ForceSource, ForceSourceSet, GustRegistry, SceneSetup, SimulationClock};

/// Template for the force source that follows the pointer.
#[derive(Resource, Debug, Clone, Copy)]
pub struct CursorForce(pub ForceSource);

/// System that advances the simulation clock by the frame's delta.
pub fn advance_clock(time: Res<Time>, mut clock: ResMut<SimulationClock>) {
    clock.advance(time.delta_secs());
}

/// System that fires the configured gust when the trigger action is pressed.
pub fn request_gust(
    actions: Query<&ActionState<SceneAction>>,
    setup: Option<Res<SceneSetup>>,
    mut requests: EventWriter<GustRequested>,
) {
    let Some(setup) = setup else { return; };
    if actions.iter().any(|a| a.just_pressed(&SceneAction::TriggerGust)) {
        requests.send(GustRequested { gust: setup.gust });
    }
}

/// System that moves requested gusts into the registry.
pub fn apply_gust_requests(
    mut requests: EventReader<GustRequested>,
    mut registry: ResMut<GustRegistry>,
) {
    for request in requests.read() {
        registry.add(request.gust);
        info!(
            "Gust added: strength {:.0} for {:.2}s ({} live)",
            request.gust.strength,
            request.gust.envelope.duration(),
            registry.len()
        );
    }
}

/// System that ages gusts. Runs after the clock so it uses this frame's dt.
pub fn advance_gusts(clock: Res<SimulationClock>, mut registry: ResMut<GustRegistry>) {
    registry.advance(clock.delta);
}

/// System that moves the live force source to the cursor's world position.
///
/// The live source is cleared while the cursor is outside the window.
pub fn track_cursor_force(
    cursor_force: Option<Res<CursorForce>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    mut forces: ResMut<ForceSourceSet>,
) {
    let Some(cursor_force) = cursor_force else { return; };
    let world_pos = windows
        .get_single()
        .ok()
        .and_then(|window| window.cursor_position())
        .and_then(|cursor| {
            let (camera, camera_transform) = cameras.get_single().ok()?;
            camera.viewport_to_world_2d(camera_transform, cursor).ok()
        });

    match world_pos {
        Some(position) => {
            let mut source = cursor_force.0;
            source.position = position;
            forces.set_live(source);
        }
        None => forces.clear_live(),
    }
}
