pub mod actor;
pub mod camera;
pub mod character;
pub mod constants;
pub mod error;
pub mod events;
pub mod item;
pub mod movement;
pub mod overlap;
pub mod physics;
pub mod rapier;
pub mod settings;
pub mod timer;
pub mod types;
pub mod utils;
pub mod world;

pub use actor::{Actor, ActorId, ActorKind, Attachment};
pub use camera::camera_boom_transform;
pub use character::{AttachState, Capsule, Character, ControlRotation, HoldState};
pub use constants::{PICKUP_TAG, WEAPON_SOCKET};
pub use error::{GameplayError, Result};
pub use events::{EventSink, GameplayEvent, LogSink, SharedEvents};
pub use item::{CollisionMode, CollisionResponse, ItemMesh, PhysicsToggle, PickableItem};
pub use rapier::{ColliderShapeDef, WorldStaticDef};
pub use settings::{GameplaySettings, PickupSelection, SettingsError};
pub use types::{Quat, Transform, Vec2, Vec3};
pub use world::{PickupOutcome, World};
