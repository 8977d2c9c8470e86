use bevy::prelude::*;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy_egui::{egui, EguiContexts};

use crate::components::VegetationInstance;
use crate::events::GustRequested;
use crate::resources::{DrawOrder, ForceSourceSet, GustRegistry, SceneSetup, WindField};

pub struct DebugUiPlugin;

impl Plugin for DebugUiPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<FrameTimeDiagnosticsPlugin>() {
            app.add_plugins(FrameTimeDiagnosticsPlugin::default());
        }

        app.add_systems(Update, debug_panel);
    }
}

#[allow(clippy::too_many_arguments)]
fn debug_panel(
    mut contexts: EguiContexts,
    diagnostics: Res<DiagnosticsStore>,
    field: Res<WindField>,
    gusts: Res<GustRegistry>,
    forces: Res<ForceSourceSet>,
    order: Res<DrawOrder>,
    setup: Option<Res<SceneSetup>>,
    instances: Query<(), With<VegetationInstance>>,
    mut requests: EventWriter<GustRequested>,
) {
    egui::Window::new("Debug Panel").show(contexts.ctx_mut(), |ui| {
        if let Some(fps) = diagnostics
            .get(&FrameTimeDiagnosticsPlugin::FPS)
            .and_then(|diag| diag.smoothed())
        {
            ui.label(format!("FPS: {:.1}", fps));
        }
        ui.label(format!("Vegetation: {}", instances.iter().count()));
        ui.label(format!("Drawables: {}", order.entities.len()));

        ui.separator();
        let wind = field.config();
        ui.label(format!(
            "Wind: {} force {:.2} speed {:.2}",
            wind.cardinal_direction(),
            wind.force(),
            wind.speed()
        ));
        ui.label(format!("Live gusts: {}", gusts.len()));
        ui.label(format!(
            "Cursor force: {}",
            if forces.live().is_some() { "on" } else { "off" }
        ));

        if let Some(setup) = &setup {
            if ui.button("Trigger Gust (Space)").clicked() {
                requests.send(GustRequested { gust: setup.gust });
            }
        }
    });
}
