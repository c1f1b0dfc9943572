/*!
Gameplay telemetry.

The world never logs directly. It hands every notable transition to an injected
[`EventSink`]; the host decides whether to log it, show it, or record it.

- [`LogSink`] forwards to the `log` facade, one level per event kind.
- [`SharedEvents`] queues events so a host loop (or a test) can drain them.
*/

use crate::actor::ActorId;
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug, PartialEq)]
pub enum GameplayEvent {
    /// An actor overlapping the character was inspected during a pickup scan.
    ActorFound { character: ActorId, actor: ActorId },
    /// Pickup found no tagged actor in range.
    NothingToPickup { character: ActorId },
    /// An item was captured and its attach timer armed.
    ItemPicked { character: ActorId, item: ActorId },
    ItemAttached {
        character: ActorId,
        item: ActorId,
        socket: String,
    },
    /// Attaching failed; the item stays referenced as held.
    AttachFailed {
        character: ActorId,
        item: ActorId,
        reason: String,
    },
    /// An attach timer fired after the hold it was armed for had ended.
    StaleAttachIgnored { character: ActorId, item: ActorId },
    ItemDropped { character: ActorId, item: ActorId },
    CrouchStarted { character: ActorId, radius: f32 },
    CrouchEnded { character: ActorId, radius: f32 },
    Jumped { character: ActorId },
}

impl GameplayEvent {
    pub fn level(&self) -> log::Level {
        match self {
            GameplayEvent::ActorFound { .. } | GameplayEvent::NothingToPickup { .. } => {
                log::Level::Debug
            }
            GameplayEvent::CrouchStarted { .. }
            | GameplayEvent::CrouchEnded { .. }
            | GameplayEvent::Jumped { .. } => log::Level::Trace,
            GameplayEvent::StaleAttachIgnored { .. } => log::Level::Warn,
            GameplayEvent::AttachFailed { .. } => log::Level::Error,
            GameplayEvent::ItemPicked { .. }
            | GameplayEvent::ItemAttached { .. }
            | GameplayEvent::ItemDropped { .. } => log::Level::Info,
        }
    }
}

/// Receives gameplay events as they happen.
pub trait EventSink: Send + Sync {
    fn emit(&mut self, event: GameplayEvent);
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: GameplayEvent) {
        log::log!(target: "gameplay", event.level(), "{event:?}");
    }
}

/// Cloneable queue of events; every clone shares the same buffer.
#[derive(Clone, Debug, Default)]
pub struct SharedEvents(Arc<Mutex<Vec<GameplayEvent>>>);

impl SharedEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued event, oldest first.
    pub fn drain(&self) -> Vec<GameplayEvent> {
        match self.0.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl EventSink for SharedEvents {
    fn emit(&mut self, event: GameplayEvent) {
        match self.0.lock() {
            Ok(mut queue) => queue.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
