use bevy::prelude::*;

use crate::resources::WindGust;

/// Event requesting a new gust. The simulation controller adds it to the
/// `GustRegistry` before the next wind sampling pass.
#[derive(Event, Debug, Clone)]
pub struct GustRequested {
    pub gust: WindGust,
}
