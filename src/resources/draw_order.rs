use bevy::prelude::*;

/// Back-to-front draw order computed this frame.
#[derive(Resource, Debug, Default, Clone)]
pub struct DrawOrder {
    pub entities: Vec<Entity>,
}

/// Hands out creation-order numbers used to break depth-key ties.
#[derive(Resource, Debug, Default)]
pub struct DepthSequence {
    next: u64,
}

impl DepthSequence {
    pub fn allocate(&mut self) -> u64 {
        let n = self.next;
        self.next += 1;
        n
    }
}
