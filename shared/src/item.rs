use crate::rapier::ColliderShapeDef;
use crate::types::Transform;

/// Which collision work a mesh takes part in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CollisionMode {
    /// No queries, no contacts.
    #[default]
    None,
    /// Rigid-body contacts only; invisible to overlap queries.
    PhysicsOnly,
    QueryAndPhysics,
}

/// How a mesh responds to the pawn collision channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CollisionResponse {
    Ignore,
    Overlap,
    #[default]
    Block,
}

/// The physical mesh of an item.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemMesh {
    pub shape: ColliderShapeDef,
    /// Mesh pose relative to the item root.
    pub relative: Transform,
    initial_relative: Transform,
    pub simulate_physics: bool,
    pub collision: CollisionMode,
    pub pawn_response: CollisionResponse,
}

impl ItemMesh {
    pub fn new(shape: ColliderShapeDef) -> Self {
        Self::with_relative(shape, Transform::identity())
    }

    pub fn with_relative(shape: ColliderShapeDef, relative: Transform) -> Self {
        Self {
            shape,
            relative,
            initial_relative: relative,
            simulate_physics: false,
            collision: CollisionMode::None,
            pawn_response: CollisionResponse::Block,
        }
    }

    pub fn initial_relative(&self) -> &Transform {
        &self.initial_relative
    }
}

/// Something whose rigid-body simulation can be switched on and off.
///
/// Holding code asks an actor for this capability instead of checking its concrete kind.
pub trait PhysicsToggle {
    fn enable_physics(&mut self);
    fn disable_physics(&mut self);
    fn is_simulating(&self) -> bool;
}

/// An actor that can be picked up, carried on a socket, and dropped.
#[derive(Clone, Debug, PartialEq)]
pub struct PickableItem {
    pub mesh: Option<ItemMesh>,
    /// Radius of the trigger sphere used to find the item.
    pub pickup_radius: f32,
}

impl PickableItem {
    /// A new item in its free state: simulating and overlapping pawns.
    pub fn new(mesh: ItemMesh, pickup_radius: f32) -> Self {
        let mut item = Self {
            mesh: Some(mesh),
            pickup_radius,
        };
        item.enable_physics();
        item
    }

    /// Snap the mesh back onto the root at its initial relative pose.
    ///
    /// Translation and rotation are restored; the current scale is kept.
    pub fn reset_location(&mut self) {
        if let Some(mesh) = self.mesh.as_mut() {
            let scale = mesh.relative.scale;
            mesh.relative = mesh.initial_relative.with_scale(scale);
        }
    }
}

impl PhysicsToggle for PickableItem {
    fn enable_physics(&mut self) {
        if let Some(mesh) = self.mesh.as_mut() {
            mesh.simulate_physics = true;
            mesh.collision = CollisionMode::PhysicsOnly;
            mesh.pawn_response = CollisionResponse::Overlap;
        }
    }

    fn disable_physics(&mut self) {
        if let Some(mesh) = self.mesh.as_mut() {
            mesh.simulate_physics = false;
            mesh.collision = CollisionMode::None;
        }
    }

    fn is_simulating(&self) -> bool {
        self.mesh.as_ref().is_some_and(|m| m.simulate_physics)
    }
}
