//! Errors surfaced by world operations.

use crate::actor::ActorId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GameplayError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameplayError {
    #[error("no actor with id {0:?}")]
    UnknownActor(ActorId),

    #[error("actor {0:?} is not a character")]
    UnknownCharacter(ActorId),

    #[error("socket `{socket}` not found on character {character:?}")]
    SocketNotFound { character: ActorId, socket: String },

    #[error("actor {actor:?} cannot be attached to {parent:?}")]
    InvalidAttachTarget { actor: ActorId, parent: ActorId },
}
