use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use verdure::plugins::core::CorePlugin;
use verdure::plugins::debug_ui::DebugUiPlugin;
use verdure::plugins::input::InputPlugin;
use verdure::plugins::presentation::PresentationPlugin;
use verdure::plugins::scene::ScenePlugin;
use verdure::plugins::simulation::SimulationPlugin;
use verdure::resources::{CliArgs, SceneConfig};

fn main() {
    let cli = CliArgs::parse();
    let (setup, source) = match SceneConfig::resolve(cli.config.as_deref(), cli.scene)
        .and_then(|(config, source)| Ok((config.validate()?, source)))
    {
        Ok(resolved) => resolved,
        Err(e) => {
            for warning in &cli.warnings {
                eprintln!("CLI: {}", warning);
            }
            eprintln!("Invalid scene configuration: {}", e);
            std::process::exit(2);
        }
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Verdure".into(),
                resolution: (640.0, 480.0).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin)
        .insert_resource(cli)
        .insert_resource(setup)
        .insert_resource(source)
        .add_plugins(CorePlugin)
        .add_plugins(InputPlugin)
        .add_plugins(SimulationPlugin)
        .add_plugins(PresentationPlugin)
        .add_plugins(ScenePlugin)
        .add_plugins(DebugUiPlugin)
        .run();
}
