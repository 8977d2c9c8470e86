use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

#[derive(Actionlike, PartialEq, Eq, Clone, Copy, Hash, Debug, Reflect)]
pub enum SceneAction {
    TriggerGust,
    #[actionlike(DualAxis)]
    Move,
}

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(InputManagerPlugin::<SceneAction>::default());
    }
}

pub fn get_default_input_map() -> InputMap<SceneAction> {
    let mut input_map = InputMap::default();

    input_map.insert(SceneAction::TriggerGust, KeyCode::Space);

    // Player movement (orderable scene): WASD or arrow keys
    input_map.insert_dual_axis(SceneAction::Move, VirtualDPad::wasd());
    input_map.insert_dual_axis(SceneAction::Move, VirtualDPad::arrow_keys());

    input_map
}
