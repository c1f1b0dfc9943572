use crate::{
    convert::to_sim_vec2,
    input::PlayerAction,
    sim::{LocalCharacter, Sim, SimInput},
};
use bevy::prelude::*;
use leafwing_input_manager::prelude::ActionState;
use shared::{ActorId, PickupOutcome, World as GameplayWorld};

/// Raw look input (mouse pixels, stick deflection) to look units.
const LOOK_INPUT_SCALE: f32 = 0.08;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(FixedUpdate, queue_movement.in_set(SimInput));
    app.add_systems(Update, (handle_look, handle_buttons));
}

/// Movement is continuous, so it is fed per fixed step rather than per frame.
fn queue_movement(
    actions: Res<ActionState<PlayerAction>>,
    local: Res<LocalCharacter>,
    mut sim: ResMut<Sim>,
) {
    let Some(character) = local.0 else {
        return;
    };
    let axis = actions.clamped_axis_pair(&PlayerAction::Move);
    if axis == Vec2::ZERO {
        return;
    }
    if let Err(err) = sim.world.move_input(character, to_sim_vec2(axis)) {
        warn!("move input rejected: {err}");
    }
}

fn handle_look(
    actions: Res<ActionState<PlayerAction>>,
    local: Res<LocalCharacter>,
    mut sim: ResMut<Sim>,
) {
    let Some(character) = local.0 else {
        return;
    };
    let axis = actions.axis_pair(&PlayerAction::Look) * LOOK_INPUT_SCALE;
    if axis == Vec2::ZERO {
        return;
    }
    if let Err(err) = sim.world.look(character, to_sim_vec2(axis)) {
        warn!("look input rejected: {err}");
    }
}

fn handle_buttons(
    actions: Res<ActionState<PlayerAction>>,
    local: Res<LocalCharacter>,
    mut sim: ResMut<Sim>,
) {
    let Some(character) = local.0 else {
        return;
    };
    if let Err(err) = apply_buttons(&actions, &mut sim.world, character) {
        warn!("player input rejected: {err}");
    }
}

fn apply_buttons(
    actions: &ActionState<PlayerAction>,
    world: &mut GameplayWorld,
    character: ActorId,
) -> shared::Result<()> {
    if actions.just_pressed(&PlayerAction::Jump) {
        world.jump(character)?;
    }
    if actions.just_released(&PlayerAction::Jump) {
        world.stop_jumping(character)?;
    }
    // Crouch and pickup act on release, like a completed press.
    if actions.just_released(&PlayerAction::Crouch) {
        world.trigger_crouch(character)?;
    }
    if actions.just_released(&PlayerAction::Pickup) {
        match world.pickup(character)? {
            PickupOutcome::Picked(item) => debug!("picked up {item:?}"),
            PickupOutcome::Dropped(item) => debug!("dropped {item:?}"),
            PickupOutcome::NothingInRange => debug!("nothing to pick up"),
        }
    }
    Ok(())
}
