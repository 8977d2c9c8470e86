use bevy::prelude::*;

/// Resource tracking simulation time.
///
/// Advanced once per frame, before anything samples the wind field, so every
/// instance in a frame sees the same `elapsed`. Frame time may vary; the
/// clock just accumulates whatever `dt` it is given.
#[derive(Resource, Debug, Clone, Default)]
pub struct SimulationClock {
    /// Seconds since the scene started.
    pub elapsed: f32,
    /// Duration of the last tick.
    pub delta: f32,
    /// Number of ticks taken so far.
    pub ticks: u64,
}

impl SimulationClock {
    /// Advances the clock by `dt` seconds. Negative deltas are ignored.
    pub fn advance(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.delta = dt;
        self.elapsed += dt;
        self.ticks += 1;
    }
}
