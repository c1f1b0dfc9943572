//! Rapier scene that simulates free items.
//!
//! Level statics are inserted once as parentless colliders. Each pickable item owns a
//! rigid body with one collider. The gameplay layer never touches Rapier types
//! directly: it flips items between simulated and kinematic through
//! [`PhysicsWorld::apply_item_state`] and reads poses back after each step.

// Re-export Rapier so the client can build shapes without depending on `rapier3d` directly.
pub use rapier3d;

use crate::item::{CollisionMode, ItemMesh};
use crate::rapier::{WorldStaticDef, body_collider, static_collider};
use crate::types::{Quat, Transform, Vec3};
use rapier3d::prelude::*;

/// Handles of the Rapier objects backing one item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemBody {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
}

pub struct PhysicsWorld {
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    /// Build a scene from level statics.
    ///
    /// Statics are inserted sorted by `id` so two builds from the same defs match.
    pub fn new(gravity_mps2: f32, mut statics: Vec<WorldStaticDef>) -> Self {
        statics.sort_by_key(|d| d.id);

        let mut colliders = ColliderSet::new();
        for def in &statics {
            colliders.insert(static_collider(def));
        }

        Self {
            gravity: Vector::new(0.0, -gravity_mps2, 0.0),
            params: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders,
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Create the body for an item at `root` and match it to the mesh's physics state.
    ///
    /// The body is posed at the item root; the mesh's relative offset is visual only.
    pub fn insert_item(&mut self, root: &Transform, mesh: &ItemMesh) -> ItemBody {
        let rb = RigidBodyBuilder::dynamic().pose(root.iso()).build();
        let body = self.bodies.insert(rb);
        let collider =
            self.colliders
                .insert_with_parent(body_collider(&mesh.shape), body, &mut self.bodies);

        let handles = ItemBody { body, collider };
        self.apply_item_state(handles, mesh);
        handles
    }

    /// Mirror an item's simulate/collision flags onto its Rapier objects.
    ///
    /// Switching to kinematic clears any residual velocity so a later re-enable starts at rest.
    pub fn apply_item_state(&mut self, handles: ItemBody, mesh: &ItemMesh) {
        if let Some(rb) = self.bodies.get_mut(handles.body) {
            if mesh.simulate_physics {
                if !rb.is_dynamic() {
                    rb.set_body_type(RigidBodyType::Dynamic, true);
                }
            } else if !rb.is_kinematic() {
                rb.set_body_type(RigidBodyType::KinematicPositionBased, false);
                rb.set_linvel(Vector::zeros(), false);
                rb.set_angvel(Vector::zeros(), false);
            }
        }

        if let Some(collider) = self.colliders.get_mut(handles.collider) {
            collider.set_enabled(mesh.collision != CollisionMode::None);
        }
    }

    /// Teleport an item body, e.g. to follow a socket or after a drop.
    pub fn set_item_pose(&mut self, handles: ItemBody, pose: &Transform) {
        if let Some(rb) = self.bodies.get_mut(handles.body) {
            rb.set_translation(pose.translation, true);
            rb.set_rotation(pose.rotation, true);
        }
    }

    /// Current pose of an item body (scale is always one).
    pub fn item_pose(&self, handles: ItemBody) -> Option<(Vec3, Quat)> {
        self.bodies
            .get(handles.body)
            .map(|rb| (*rb.translation(), *rb.rotation()))
    }

    pub fn is_simulating(&self, handles: ItemBody) -> bool {
        self.bodies
            .get(handles.body)
            .is_some_and(|rb| rb.is_dynamic())
    }

    pub fn collider_enabled(&self, handles: ItemBody) -> bool {
        self.colliders
            .get(handles.collider)
            .is_some_and(|c| c.is_enabled())
    }

    pub fn step(&mut self, dt_seconds: f32) {
        if dt_seconds <= 0.0 {
            return;
        }
        self.params.dt = dt_seconds;

        let hooks = ();
        let events = ();

        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &hooks,
            &events,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::PhysicsToggle;
    use crate::item::PickableItem;
    use crate::rapier::ColliderShapeDef;

    fn ground() -> Vec<WorldStaticDef> {
        vec![WorldStaticDef {
            id: 0,
            translation: Vec3::zeros(),
            rotation: Quat::identity(),
            shape: ColliderShapeDef::Plane {
                offset_along_normal: 0.0,
            },
        }]
    }

    fn item() -> PickableItem {
        PickableItem::new(
            ItemMesh::new(ColliderShapeDef::Cuboid {
                half_extents: Vec3::new(0.2, 0.2, 0.2),
            }),
            0.75,
        )
    }

    #[test]
    fn free_item_falls_and_rests_on_ground() {
        let mut world = PhysicsWorld::new(9.81, ground());
        let item = item();
        let handles = world.insert_item(
            &Transform::from_xyz(0.0, 2.0, 0.0),
            item.mesh.as_ref().unwrap(),
        );

        for _ in 0..240 {
            world.step(1.0 / 60.0);
        }

        let (translation, _) = world.item_pose(handles).unwrap();
        assert!(translation.y < 0.3);
        assert!(translation.y > 0.1);
    }

    #[test]
    fn disabled_item_stays_put() {
        let mut world = PhysicsWorld::new(9.81, ground());
        let mut item = item();
        let handles = world.insert_item(
            &Transform::from_xyz(0.0, 2.0, 0.0),
            item.mesh.as_ref().unwrap(),
        );

        item.disable_physics();
        world.apply_item_state(handles, item.mesh.as_ref().unwrap());
        for _ in 0..60 {
            world.step(1.0 / 60.0);
        }

        let (translation, _) = world.item_pose(handles).unwrap();
        assert!((translation.y - 2.0).abs() < 1.0e-5);
        assert!(!world.is_simulating(handles));
        assert!(!world.collider_enabled(handles));

        item.enable_physics();
        world.apply_item_state(handles, item.mesh.as_ref().unwrap());
        assert!(world.is_simulating(handles));
        assert!(world.collider_enabled(handles));
    }
}
