//! The per-scene simulation controller.
//!
//! Owns the wind field, gust registry, force sources and clock, and fixes
//! the order of work inside a frame: clock, then transient state (gusts,
//! cursor force), then every vegetation response, then depth ordering.
//! All instances therefore sample the same snapshot of transient state.

use bevy::prelude::*;

use crate::events::GustRequested;
use crate::resources::{
    CliArgs, ConfigSource, DepthSequence, DrawOrder, ForceSourceSet, GustRegistry, SceneSetup,
    SimulationClock, WindField,
};
use crate::systems::{
    advance_clock, advance_gusts, apply_draw_order, apply_gust_requests, assign_depth_sequence,
    deform_grids, request_gust, sort_drawables, sway_blades, track_cursor_force, CursorForce,
};

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Advance the simulation clock.
    Clock,
    /// Update gusts and force sources.
    Transients,
    /// Sample the wind field for every instance.
    Response,
    /// Push responses into render data.
    Present,
    /// Depth-sort drawables.
    Order,
}

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationClock>()
            .init_resource::<WindField>()
            .init_resource::<GustRegistry>()
            .init_resource::<ForceSourceSet>()
            .init_resource::<DrawOrder>()
            .init_resource::<DepthSequence>()
            .add_event::<GustRequested>()
            .add_observer(assign_depth_sequence)
            .configure_sets(
                Update,
                (
                    SimulationSet::Clock,
                    SimulationSet::Transients,
                    SimulationSet::Response,
                    SimulationSet::Present,
                    SimulationSet::Order,
                )
                    .chain(),
            )
            .add_systems(Startup, (report_setup, configure_simulation))
            .add_systems(
                Update,
                (
                    advance_clock.in_set(SimulationSet::Clock),
                    (request_gust, apply_gust_requests, advance_gusts, track_cursor_force)
                        .chain()
                        .in_set(SimulationSet::Transients),
                    (sway_blades, deform_grids).in_set(SimulationSet::Response),
                    (sort_drawables, apply_draw_order)
                        .chain()
                        .in_set(SimulationSet::Order),
                ),
            );
    }
}

/// Startup system that logs what was decided before logging was up: the
/// config source, rejected CLI arguments and setup warnings.
fn report_setup(
    cli: Option<Res<CliArgs>>,
    source: Option<Res<ConfigSource>>,
    setup: Option<Res<SceneSetup>>,
) {
    if let Some(source) = source {
        info!("Scene config: {}", *source);
    }
    for warning in cli.iter().flat_map(|cli| cli.warnings.iter()) {
        warn!("CLI: {}", warning);
    }
    for warning in setup.iter().flat_map(|setup| setup.warnings.iter()) {
        warn!("Scene setup: {}", warning);
    }
}

/// Startup system that replaces the default simulation state with the
/// validated scene setup, if one was inserted.
fn configure_simulation(mut commands: Commands, setup: Option<Res<SceneSetup>>) {
    let Some(setup) = setup else {
        info!("No scene setup found, running with default wind");
        return;
    };

    commands.insert_resource(WindField::new(setup.wind));
    commands.insert_resource(GustRegistry::with_capacity(setup.max_live_gusts));
    if let Some(source) = setup.cursor_force {
        commands.insert_resource(CursorForce(source));
    }

    info!(
        "Wind: {} at force {:.2}, speed {:.2}, ripple {:.2}",
        setup.wind.cardinal_direction(),
        setup.wind.force(),
        setup.wind.speed(),
        setup.wind.ripple_strength()
    );
}
