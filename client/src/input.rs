use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

#[derive(Reflect, Actionlike, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerAction {
    #[actionlike(DualAxis)]
    Move,
    #[actionlike(DualAxis)]
    Look,
    Jump,
    Crouch,
    Pickup,
}

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(InputManagerPlugin::<PlayerAction>::default());

    app.register_type::<PlayerAction>();

    app.insert_resource(default_input_map());
    app.insert_resource(ActionState::<PlayerAction>::default());
}

fn default_input_map() -> InputMap<PlayerAction> {
    let mut input_map = InputMap::<PlayerAction>::default();
    input_map.insert_dual_axis(PlayerAction::Move, VirtualDPad::wasd());
    input_map.insert_dual_axis(PlayerAction::Move, GamepadStick::LEFT);
    input_map.insert_dual_axis(PlayerAction::Look, MouseMove::default());
    input_map.insert_dual_axis(PlayerAction::Look, GamepadStick::RIGHT);
    input_map.insert(PlayerAction::Jump, KeyCode::Space);
    input_map.insert(PlayerAction::Jump, GamepadButton::South);
    input_map.insert(PlayerAction::Crouch, KeyCode::KeyC);
    input_map.insert(PlayerAction::Crouch, GamepadButton::East);
    input_map.insert(PlayerAction::Pickup, KeyCode::KeyE);
    input_map.insert(PlayerAction::Pickup, GamepadButton::West);
    input_map
}

