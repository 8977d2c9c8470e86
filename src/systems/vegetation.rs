use bevy::prelude::*;

use crate::components::{BladeSway, GridDeformation, VegetationInstance};
use crate::resources::{ForceSourceSet, GustRegistry, SimulationClock, WindField};

/// System that bends every rigid blade according to the wind at its pivot.
///
/// Each blade samples at its own phase-shifted time so neighbors with the
/// same field do not sway in lockstep.
pub fn sway_blades(
    field: Res<WindField>,
    clock: Res<SimulationClock>,
    gusts: Res<GustRegistry>,
    forces: Res<ForceSourceSet>,
    mut blades: Query<(&VegetationInstance, &Transform, &mut BladeSway)>,
) {
    for (instance, transform, mut sway) in &mut blades {
        let position = transform.translation.truncate();
        let force = field.sample(position, instance.sample_time(clock.elapsed), &gusts, &forces);
        sway.respond(force);
    }
}

/// System that recomputes vertex offsets for every grid-sliced sprite.
pub fn deform_grids(
    field: Res<WindField>,
    clock: Res<SimulationClock>,
    gusts: Res<GustRegistry>,
    forces: Res<ForceSourceSet>,
    mut grids: Query<(&VegetationInstance, &Transform, &mut GridDeformation)>,
) {
    for (instance, transform, mut grid) in &mut grids {
        let origin = transform.translation.truncate();
        let time = instance.sample_time(clock.elapsed);
        grid.update(origin, instance.pivot, |p| field.sample(p, time, &gusts, &forces));
    }
}
