//! Surfaces gameplay events: logs each one and re-broadcasts it as a Bevy message
//! for presentation systems.

use crate::sim::Sim;
use bevy::prelude::*;
use shared::GameplayEvent;

#[derive(Message, Debug, Clone)]
pub struct GameplayMessage(pub GameplayEvent);

pub(super) fn plugin(app: &mut App) {
    app.add_message::<GameplayMessage>();
    app.add_systems(Update, drain_events);
}

fn drain_events(sim: Res<Sim>, mut writer: MessageWriter<GameplayMessage>) {
    for event in sim.events.drain() {
        match event.level() {
            log::Level::Error => error!(target: "gameplay", "{event:?}"),
            log::Level::Warn => warn!(target: "gameplay", "{event:?}"),
            log::Level::Info => info!(target: "gameplay", "{event:?}"),
            log::Level::Debug => debug!(target: "gameplay", "{event:?}"),
            log::Level::Trace => trace!(target: "gameplay", "{event:?}"),
        }
        writer.write(GameplayMessage(event));
    }
}
