use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

use crate::components::{MoveSpeed, Player};
use crate::plugins::input::SceneAction;

/// System that moves the player with the movement action.
///
/// Diagonal input is normalized so the speed is the same in every direction.
pub fn move_player(
    time: Res<Time>,
    actions: Query<&ActionState<SceneAction>>,
    mut players: Query<(&MoveSpeed, &mut Transform), With<Player>>,
) {
    let Some(action_state) = actions.iter().next() else { return; };
    let input = action_state.axis_pair(&SceneAction::Move);
    if input == Vec2::ZERO {
        return;
    }

    let step = input.normalize_or_zero() * time.delta_secs();
    for (speed, mut transform) in &mut players {
        transform.translation.x += step.x * speed.0;
        transform.translation.y += step.y * speed.0;
    }
}
