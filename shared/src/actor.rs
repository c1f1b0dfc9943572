use crate::item::{PhysicsToggle, PickableItem};
use crate::types::Transform;

/// Stable handle for anything living in the world. Ids are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActorId(pub u32);

/// Parent and socket an actor is attached to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub parent: ActorId,
    pub socket: String,
}

/// Variant data of a non-character actor.
#[derive(Clone, Debug, PartialEq)]
pub enum ActorKind {
    Pickable(PickableItem),
    /// Static scenery. May still carry tags and an overlap volume.
    Prop { overlap_radius: Option<f32> },
}

#[derive(Clone, Debug)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    /// World-space transform of the actor root.
    pub transform: Transform,
    tags: Vec<String>,
    pub attachment: Option<Attachment>,
    pub kind: ActorKind,
}

impl Actor {
    pub fn new(id: ActorId, name: impl Into<String>, transform: Transform, kind: ActorKind) -> Self {
        Self {
            id,
            name: name.into(),
            transform,
            tags: Vec::new(),
            attachment: None,
            kind,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Add `tag` unless it is already present.
    pub fn add_tag_unique(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.has_tag(&tag) {
            self.tags.push(tag);
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Radius of the volume other actors overlap with, if any.
    pub fn overlap_radius(&self) -> Option<f32> {
        match &self.kind {
            ActorKind::Pickable(item) => Some(item.pickup_radius),
            ActorKind::Prop { overlap_radius } => *overlap_radius,
        }
    }

    pub fn as_physics_toggle(&mut self) -> Option<&mut dyn PhysicsToggle> {
        match &mut self.kind {
            ActorKind::Pickable(item) => Some(item),
            ActorKind::Prop { .. } => None,
        }
    }

    pub fn as_pickable(&self) -> Option<&PickableItem> {
        match &self.kind {
            ActorKind::Pickable(item) => Some(item),
            ActorKind::Prop { .. } => None,
        }
    }

    pub fn as_pickable_mut(&mut self) -> Option<&mut PickableItem> {
        match &mut self.kind {
            ActorKind::Pickable(item) => Some(item),
            ActorKind::Prop { .. } => None,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attachment.is_some()
    }
}
