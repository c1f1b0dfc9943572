use crate::{level, settings::Settings};
use bevy::prelude::*;
use shared::{ActorId, SharedEvents, World as GameplayWorld};

/// The gameplay world, ticked on the fixed schedule.
#[derive(Resource)]
pub struct Sim {
    pub world: GameplayWorld,
    /// Reader side of the world's event sink; drained by telemetry.
    pub events: SharedEvents,
}

/// The character driven by this client's input.
#[derive(Resource, Debug, Default)]
pub struct LocalCharacter(pub Option<ActorId>);

/// Runs before the world advances, so anything fed to the world this fixed step is seen by it.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimInput;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimTick;

pub(super) fn plugin(app: &mut App) {
    let settings = app
        .world()
        .get_resource::<Settings>()
        .map(|s| s.0.clone())
        .unwrap_or_default();

    let events = SharedEvents::new();
    let world = GameplayWorld::with_sink(settings, level::statics(), Box::new(events.clone()));

    app.insert_resource(Sim { world, events });
    app.init_resource::<LocalCharacter>();

    app.configure_sets(FixedUpdate, (SimInput, SimTick).chain());
    app.add_systems(FixedUpdate, tick_world.in_set(SimTick));
}

fn tick_world(time: Res<Time<Fixed>>, mut sim: ResMut<Sim>) {
    sim.world.tick(time.delta_secs());
}
