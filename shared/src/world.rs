/*!
The gameplay world: every actor, every character, the attach timers, and the
physics scene for free items.

A host drives it in three ways:
- input operations (`move_input`, `look`, `jump`, `trigger_crouch`, `pickup`, ...)
  called when the bound action fires;
- `tick(dt)` once per fixed step;
- reads (`actor`, `character`, `camera_transform`) to present the result.

Tick order
1. Fire due attach timers.
2. Step character movement and crouch.
3. Move attached actors onto their sockets.
4. Step rigid bodies.
5. Copy simulated item poses back onto their actors.
*/

use crate::actor::{Actor, ActorId, ActorKind, Attachment};
use crate::camera::camera_boom_transform;
use crate::character::{AttachState, Character};
use crate::error::{GameplayError, Result};
use crate::events::{EventSink, GameplayEvent, LogSink};
use crate::item::{ItemMesh, PickableItem};
use crate::movement::step_movement;
use crate::overlap::capsule_overlaps_sphere;
use crate::physics::{ItemBody, PhysicsWorld};
use crate::rapier::{ColliderShapeDef, WorldStaticDef};
use crate::settings::{GameplaySettings, PickupSelection};
use crate::timer::Timers;
use crate::types::{Transform, Vec2};
use crate::utils::planar_distance_sq;
use std::collections::{BTreeMap, HashMap};

/// Deferred socket attach armed by a pickup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct AttachRequest {
    character: ActorId,
    item: ActorId,
    generation: u64,
}

/// What a `pickup` input did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickupOutcome {
    Picked(ActorId),
    Dropped(ActorId),
    NothingInRange,
}

pub struct World {
    settings: GameplaySettings,
    next_id: u32,
    actors: BTreeMap<ActorId, Actor>,
    characters: BTreeMap<ActorId, Character>,
    bodies: HashMap<ActorId, ItemBody>,
    timers: Timers<AttachRequest>,
    physics: PhysicsWorld,
    sink: Box<dyn EventSink>,
}

impl World {
    pub fn new(settings: GameplaySettings, statics: Vec<WorldStaticDef>) -> Self {
        Self::with_sink(settings, statics, Box::new(LogSink))
    }

    pub fn with_sink(
        settings: GameplaySettings,
        statics: Vec<WorldStaticDef>,
        sink: Box<dyn EventSink>,
    ) -> Self {
        let physics = PhysicsWorld::new(settings.movement.gravity, statics);
        Self {
            settings,
            next_id: 0,
            actors: BTreeMap::new(),
            characters: BTreeMap::new(),
            bodies: HashMap::new(),
            timers: Timers::new(),
            physics,
            sink,
        }
    }

    pub fn settings(&self) -> &GameplaySettings {
        &self.settings
    }

    fn allocate_id(&mut self) -> ActorId {
        self.next_id += 1;
        ActorId(self.next_id)
    }

    fn emit(&mut self, event: GameplayEvent) {
        self.sink.emit(event);
    }

    /// Spawn a pickable item. It starts free (simulating) and tagged for pickup.
    pub fn spawn_item(
        &mut self,
        name: impl Into<String>,
        transform: Transform,
        mesh: ItemMesh,
    ) -> ActorId {
        let id = self.allocate_id();
        let item = PickableItem::new(mesh, self.settings.item.pickup_radius);
        let handles = item
            .mesh
            .as_ref()
            .map(|mesh| self.physics.insert_item(&transform, mesh));

        let mut actor = Actor::new(id, name, transform, ActorKind::Pickable(item));
        actor.add_tag_unique(self.settings.character.pickup_tag.clone());

        if let Some(handles) = handles {
            self.bodies.insert(id, handles);
        }
        self.actors.insert(id, actor);
        id
    }

    /// Convenience for a crate-like item resting on the floor at `(x, z)`.
    pub fn spawn_item_on_ground(
        &mut self,
        name: impl Into<String>,
        x: f32,
        z: f32,
        shape: ColliderShapeDef,
    ) -> ActorId {
        let y = self.settings.movement.ground_height + shape.rest_height();
        self.spawn_item(name, Transform::from_xyz(x, y, z), ItemMesh::new(shape))
    }

    /// Spawn static scenery. `overlap_radius` gives it a trigger volume.
    pub fn spawn_prop(
        &mut self,
        name: impl Into<String>,
        transform: Transform,
        overlap_radius: Option<f32>,
        tags: &[&str],
    ) -> ActorId {
        let id = self.allocate_id();
        let mut actor = Actor::new(id, name, transform, ActorKind::Prop { overlap_radius });
        for tag in tags {
            actor.add_tag_unique(*tag);
        }
        self.actors.insert(id, actor);
        id
    }

    /// Spawn a character standing with its feet at `(x, ground, z)`.
    pub fn spawn_character(&mut self, name: impl Into<String>, x: f32, z: f32) -> ActorId {
        let id = self.allocate_id();
        let settings = &self.settings.character;
        let y = self.settings.movement.ground_height
            + settings.capsule_radius
            + settings.capsule_half_height;
        let mut character = Character::new(id, name, Transform::from_xyz(x, y, z), settings);
        character.grounded = true;
        self.characters.insert(id, character);
        id
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    pub fn character(&self, id: ActorId) -> Option<&Character> {
        self.characters.get(&id)
    }

    pub fn character_mut(&mut self, id: ActorId) -> Option<&mut Character> {
        self.characters.get_mut(&id)
    }

    pub fn characters(&self) -> impl Iterator<Item = &Character> {
        self.characters.values()
    }

    fn character_or_err(&mut self, id: ActorId) -> Result<&mut Character> {
        self.characters
            .get_mut(&id)
            .ok_or(GameplayError::UnknownCharacter(id))
    }

    /// Is the item body currently simulated by Rapier?
    pub fn is_body_simulating(&self, id: ActorId) -> bool {
        self.bodies
            .get(&id)
            .is_some_and(|h| self.physics.is_simulating(*h))
    }

    pub fn camera_transform(&self, character: ActorId) -> Option<Transform> {
        self.characters
            .get(&character)
            .map(|c| camera_boom_transform(c, self.settings.camera.arm_length))
    }

    pub fn move_input(&mut self, character: ActorId, axis: Vec2) -> Result<()> {
        self.character_or_err(character)?.move_input(axis);
        Ok(())
    }

    /// Apply look input. `axis.x` turns right, `axis.y` looks up.
    pub fn look(&mut self, character: ActorId, axis: Vec2) -> Result<()> {
        let camera = self.settings.camera.clone();
        let c = self.character_or_err(character)?;
        let pitch_sign = if camera.invert_y { -1.0 } else { 1.0 };
        c.control.add_yaw(-axis.x * camera.look_yaw_scale);
        c.control.add_pitch(axis.y * camera.look_pitch_scale * pitch_sign);
        Ok(())
    }

    pub fn jump(&mut self, character: ActorId) -> Result<()> {
        self.character_or_err(character)?.jump();
        Ok(())
    }

    pub fn stop_jumping(&mut self, character: ActorId) -> Result<()> {
        self.character_or_err(character)?.stop_jumping();
        Ok(())
    }

    pub fn trigger_crouch(&mut self, character: ActorId) -> Result<()> {
        self.character_or_err(character)?.trigger_crouch();
        Ok(())
    }

    /// Actors whose trigger volume overlaps the character capsule, in id order.
    pub fn overlapping_actors(&self, character: ActorId) -> Result<Vec<ActorId>> {
        let c = self
            .characters
            .get(&character)
            .ok_or(GameplayError::UnknownCharacter(character))?;

        Ok(self
            .actors
            .values()
            .filter(|actor| {
                actor.overlap_radius().is_some_and(|radius| {
                    capsule_overlaps_sphere(
                        c.transform.translation,
                        c.capsule,
                        actor.transform.translation,
                        radius,
                    )
                })
            })
            .map(|actor| actor.id)
            .collect())
    }

    fn is_held_by_anyone(&self, id: ActorId) -> bool {
        self.characters.values().any(|c| c.held_item() == Some(id))
    }

    /// Pick up the best tagged actor in range, or drop the held one.
    pub fn pickup(&mut self, character: ActorId) -> Result<PickupOutcome> {
        let holding = self
            .characters
            .get(&character)
            .ok_or(GameplayError::UnknownCharacter(character))?
            .is_holding_item();

        if holding {
            return Ok(match self.drop_item(character)? {
                Some(item) => PickupOutcome::Dropped(item),
                None => PickupOutcome::NothingInRange,
            });
        }

        let overlapping = self.overlapping_actors(character)?;
        for &actor in &overlapping {
            self.emit(GameplayEvent::ActorFound { character, actor });
        }

        let Some(item) = self.select_candidate(character, &overlapping) else {
            self.emit(GameplayEvent::NothingToPickup { character });
            return Ok(PickupOutcome::NothingInRange);
        };

        let target = self
            .actors
            .get(&item)
            .map(|a| a.transform.translation)
            .ok_or(GameplayError::UnknownActor(item))?;
        self.character_or_err(character)?.face_location(target);
        self.pick_item(character, item)?;
        Ok(PickupOutcome::Picked(item))
    }

    fn select_candidate(&self, character: ActorId, overlapping: &[ActorId]) -> Option<ActorId> {
        let origin = self.characters.get(&character)?.transform.translation;
        let tag = &self.settings.character.pickup_tag;

        let mut candidates = overlapping.iter().filter_map(|id| {
            let actor = self.actors.get(id)?;
            let eligible =
                actor.has_tag(tag) && !actor.is_attached() && !self.is_held_by_anyone(*id);
            eligible.then_some(actor)
        });

        match self.settings.character.pickup_selection {
            PickupSelection::FirstOverlap => candidates.next().map(|a| a.id),
            PickupSelection::Nearest => candidates
                .min_by(|a, b| {
                    planar_distance_sq(origin, a.transform.translation)
                        .total_cmp(&planar_distance_sq(origin, b.transform.translation))
                        .then(a.id.cmp(&b.id))
                })
                .map(|a| a.id),
        }
    }

    /// Capture `item`: stop its physics, store it as held, and arm the socket attach.
    fn pick_item(&mut self, character: ActorId, item: ActorId) -> Result<()> {
        self.disable_item_physics(item)?;

        let delay = self.settings.character.pick_animation_delay;
        let generation = self.character_or_err(character)?.next_hold_generation();
        let timer = self.timers.schedule(
            delay,
            AttachRequest {
                character,
                item,
                generation,
            },
        );
        self.character_or_err(character)?.begin_hold(item, timer);

        self.emit(GameplayEvent::ItemPicked { character, item });
        Ok(())
    }

    /// Attach the held item to the socket, if the hold this request was armed for is
    /// still the current one.
    fn hold_item(&mut self, request: AttachRequest) {
        let AttachRequest {
            character,
            item,
            generation,
        } = request;

        let current = self
            .characters
            .get(&character)
            .is_some_and(|c| c.attach_is_current(item, generation));
        if !current {
            self.emit(GameplayEvent::StaleAttachIgnored { character, item });
            return;
        }

        let socket = self.settings.character.attach_socket.clone();
        match self.attach_to_socket(item, character, &socket) {
            Ok(()) => {
                if let Some(c) = self.characters.get_mut(&character) {
                    c.set_attach_state(AttachState::Attached);
                }
                self.emit(GameplayEvent::ItemAttached {
                    character,
                    item,
                    socket,
                });
            }
            Err(err) => {
                if let Some(c) = self.characters.get_mut(&character) {
                    c.set_attach_state(AttachState::Failed);
                }
                self.emit(GameplayEvent::AttachFailed {
                    character,
                    item,
                    reason: err.to_string(),
                });
            }
        }
    }

    /// Drop whatever the character holds, keeping its world transform.
    ///
    /// Returns the dropped actor, or `None` if nothing was held.
    pub fn drop_item(&mut self, character: ActorId) -> Result<Option<ActorId>> {
        let Some((item, pending)) = self.character_or_err(character)?.end_hold() else {
            return Ok(None);
        };
        if let Some(handle) = pending {
            self.timers.cancel(handle);
        }

        if self.actors.contains_key(&item) {
            self.detach_from_actor(item)?;
            self.reset_item_location(item)?;
            self.enable_item_physics(item)?;
        }

        self.emit(GameplayEvent::ItemDropped { character, item });
        Ok(Some(item))
    }

    /// Snap `actor` onto a character socket. Translation, rotation and scale all
    /// take the socket's world values.
    pub fn attach_to_socket(&mut self, actor: ActorId, parent: ActorId, socket: &str) -> Result<()> {
        if actor == parent {
            return Err(GameplayError::InvalidAttachTarget { actor, parent });
        }
        if !self.actors.contains_key(&actor) {
            return Err(GameplayError::UnknownActor(actor));
        }
        let target = self
            .characters
            .get(&parent)
            .ok_or(GameplayError::UnknownCharacter(parent))?
            .socket_world_transform(socket)
            .ok_or_else(|| GameplayError::SocketNotFound {
                character: parent,
                socket: socket.to_string(),
            })?;

        if let Some(a) = self.actors.get_mut(&actor) {
            a.attachment = Some(Attachment {
                parent,
                socket: socket.to_string(),
            });
            a.transform = target;
        }
        if let Some(handles) = self.bodies.get(&actor) {
            self.physics.set_item_pose(*handles, &target);
        }
        Ok(())
    }

    /// Clear the attachment; the actor stays where it is in world space.
    pub fn detach_from_actor(&mut self, actor: ActorId) -> Result<()> {
        let a = self
            .actors
            .get_mut(&actor)
            .ok_or(GameplayError::UnknownActor(actor))?;
        a.attachment = None;
        let pose = a.transform;
        if let Some(handles) = self.bodies.get(&actor) {
            self.physics.set_item_pose(*handles, &pose);
        }
        Ok(())
    }

    fn update_attachments(&mut self) {
        let mut moves = Vec::new();
        for actor in self.actors.values() {
            let Some(attachment) = &actor.attachment else {
                continue;
            };
            let target = self
                .characters
                .get(&attachment.parent)
                .and_then(|c| c.socket_world_transform(&attachment.socket));
            if let Some(target) = target {
                moves.push((actor.id, target));
            }
        }

        for (id, target) in moves {
            if let Some(actor) = self.actors.get_mut(&id) {
                actor.transform = target;
            }
            if let Some(handles) = self.bodies.get(&id) {
                self.physics.set_item_pose(*handles, &target);
            }
        }
    }

    /// Turn physics on for an actor that supports it. Others are left alone.
    pub fn enable_item_physics(&mut self, id: ActorId) -> Result<()> {
        self.toggle_item_physics(id, true)
    }

    pub fn disable_item_physics(&mut self, id: ActorId) -> Result<()> {
        self.toggle_item_physics(id, false)
    }

    fn toggle_item_physics(&mut self, id: ActorId, enable: bool) -> Result<()> {
        let actor = self
            .actors
            .get_mut(&id)
            .ok_or(GameplayError::UnknownActor(id))?;
        let Some(toggle) = actor.as_physics_toggle() else {
            return Ok(());
        };
        if enable {
            toggle.enable_physics();
        } else {
            toggle.disable_physics();
        }

        let mesh = actor.as_pickable().and_then(|item| item.mesh.as_ref());
        if let (Some(mesh), Some(handles)) = (mesh, self.bodies.get(&id)) {
            self.physics.apply_item_state(*handles, mesh);
        }
        Ok(())
    }

    pub fn reset_item_location(&mut self, id: ActorId) -> Result<()> {
        let actor = self
            .actors
            .get_mut(&id)
            .ok_or(GameplayError::UnknownActor(id))?;
        if let Some(item) = actor.as_pickable_mut() {
            item.reset_location();
        }
        Ok(())
    }

    pub fn tick(&mut self, dt_seconds: f32) {
        let dt = dt_seconds.max(0.0);

        for request in self.timers.advance(dt) {
            self.hold_item(request);
        }

        let mut events = Vec::new();
        for character in self.characters.values_mut() {
            let step = step_movement(character, &self.settings.movement, dt);
            if step.jumped {
                events.push(GameplayEvent::Jumped {
                    character: character.id,
                });
            }
            if step.crouch_started {
                events.push(GameplayEvent::CrouchStarted {
                    character: character.id,
                    radius: character.capsule.radius,
                });
            }
            if step.crouch_ended {
                events.push(GameplayEvent::CrouchEnded {
                    character: character.id,
                    radius: character.capsule.radius,
                });
            }
        }
        for event in events {
            self.emit(event);
        }

        self.update_attachments();
        self.physics.step(dt);
        self.sync_simulated_items();
    }

    fn sync_simulated_items(&mut self) {
        for (id, handles) in &self.bodies {
            let Some(actor) = self.actors.get_mut(id) else {
                continue;
            };
            if actor.is_attached() || !self.physics.is_simulating(*handles) {
                continue;
            }
            if let Some((translation, rotation)) = self.physics.item_pose(*handles) {
                actor.transform.translation = translation;
                actor.transform.rotation = rotation;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::HoldState;
    use crate::events::SharedEvents;
    use crate::item::CollisionMode;
    use crate::types::{Quat, Vec3};

    const DT: f32 = 1.0 / 60.0;

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

    fn box_shape() -> ColliderShapeDef {
        ColliderShapeDef::Cuboid {
            half_extents: Vec3::new(0.15, 0.15, 0.15),
        }
    }

    fn world_with(settings: GameplaySettings) -> (World, SharedEvents) {
        let events = SharedEvents::new();
        let world = World::with_sink(settings, ground(), Box::new(events.clone()));
        (world, events)
    }

    fn world() -> (World, SharedEvents) {
        world_with(GameplaySettings::default())
    }

    /// Tick long enough for the pick delay to elapse.
    fn settle(world: &mut World) {
        for _ in 0..12 {
            world.tick(DT);
        }
    }

    fn mesh_of(world: &World, id: ActorId) -> ItemMesh {
        world
            .actor(id)
            .and_then(|a| a.as_pickable())
            .and_then(|i| i.mesh.clone())
            .unwrap()
    }

    #[test]
    fn pickup_with_nothing_in_range_stays_empty() {
        let (mut world, events) = world();
        let player = world.spawn_character("player", 0.0, 0.0);
        world.spawn_item_on_ground("far crate", 10.0, 0.0, box_shape());

        assert_eq!(world.pickup(player), Ok(PickupOutcome::NothingInRange));
        assert_eq!(world.character(player).unwrap().hold, HoldState::Empty);
        assert!(
            events
                .drain()
                .iter()
                .any(|e| matches!(e, GameplayEvent::NothingToPickup { .. }))
        );
    }

    #[test]
    fn untagged_overlap_is_ignored() {
        let (mut world, _) = world();
        let player = world.spawn_character("player", 0.0, 0.0);
        world.spawn_prop("barrel", Transform::from_xyz(0.5, 0.5, 0.0), Some(0.5), &[]);

        assert_eq!(world.overlapping_actors(player).unwrap().len(), 1);
        assert_eq!(world.pickup(player), Ok(PickupOutcome::NothingInRange));
    }

    #[test]
    fn pickup_holds_item_and_attaches_after_delay() {
        let (mut world, events) = world();
        let player = world.spawn_character("player", 0.0, 0.0);
        let item = world.spawn_item_on_ground("crate", 0.8, 0.0, box_shape());

        assert_eq!(world.pickup(player), Ok(PickupOutcome::Picked(item)));
        let c = world.character(player).unwrap();
        assert_eq!(c.held_item(), Some(item));
        assert!(matches!(
            c.hold,
            HoldState::Held {
                attach: AttachState::Pending(_),
                ..
            }
        ));

        // Physics is off immediately, the attach waits for the timer.
        let mesh = mesh_of(&world, item);
        assert!(!mesh.simulate_physics);
        assert_eq!(mesh.collision, CollisionMode::None);
        assert!(!world.is_body_simulating(item));
        assert!(world.actor(item).unwrap().attachment.is_none());

        settle(&mut world);

        let c = world.character(player).unwrap();
        assert!(matches!(
            c.hold,
            HoldState::Held {
                attach: AttachState::Attached,
                ..
            }
        ));
        let socket = c.socket_world_transform("WeaponSocket").unwrap();
        let actor = world.actor(item).unwrap();
        assert!((actor.transform.translation - socket.translation).norm() < 1.0e-5);
        assert!(actor.transform.rotation.angle_to(&socket.rotation) < 1.0e-5);
        assert_eq!(actor.attachment.as_ref().unwrap().socket, "WeaponSocket");

        let drained = events.drain();
        assert!(drained.iter().any(|e| matches!(e, GameplayEvent::ItemPicked { .. })));
        assert!(drained.iter().any(|e| matches!(e, GameplayEvent::ItemAttached { .. })));
    }

    #[test]
    fn pickup_faces_the_item() {
        let (mut world, _) = world();
        let player = world.spawn_character("player", 0.0, 0.0);
        world.spawn_item_on_ground("crate", 0.8, 0.0, box_shape());

        world.pickup(player).unwrap();

        let c = world.character(player).unwrap();
        let forward = c.transform.rotation * Vec3::new(0.0, 0.0, -1.0);
        assert!((forward - Vec3::new(1.0, 0.0, 0.0)).norm() < 1.0e-5);
    }

    #[test]
    fn attached_item_follows_the_character() {
        let (mut world, _) = world();
        let player = world.spawn_character("player", 0.0, 0.0);
        let item = world.spawn_item_on_ground("crate", 0.8, 0.0, box_shape());
        world.pickup(player).unwrap();
        settle(&mut world);

        for _ in 0..30 {
            world.move_input(player, Vec2::new(0.0, 1.0)).unwrap();
            world.tick(DT);
        }

        let socket = world
            .character(player)
            .unwrap()
            .socket_world_transform("WeaponSocket")
            .unwrap();
        let actor = world.actor(item).unwrap();
        assert!((actor.transform.translation - socket.translation).norm() < 1.0e-5);
    }

    #[test]
    fn pickup_while_holding_drops_and_reenables_physics() {
        let (mut world, _) = world();
        let player = world.spawn_character("player", 0.0, 0.0);
        let item = world.spawn_item_on_ground("crate", 0.8, 0.0, box_shape());
        // A second candidate in range must not matter when holding.
        world.spawn_item_on_ground("other crate", -0.8, 0.0, box_shape());

        world.pickup(player).unwrap();
        settle(&mut world);
        let held_at = world.actor(item).unwrap().transform;

        assert_eq!(world.pickup(player), Ok(PickupOutcome::Dropped(item)));

        let c = world.character(player).unwrap();
        assert_eq!(c.hold, HoldState::Empty);
        let actor = world.actor(item).unwrap();
        assert!(actor.attachment.is_none());
        assert_eq!(actor.transform, held_at);

        let mesh = mesh_of(&world, item);
        assert!(mesh.simulate_physics);
        assert_eq!(mesh.collision, CollisionMode::PhysicsOnly);
        assert!(world.is_body_simulating(item));
    }

    #[test]
    fn dropped_item_falls_to_the_floor() {
        let (mut world, _) = world();
        let player = world.spawn_character("player", 0.0, 0.0);
        let item = world.spawn_item_on_ground("crate", 0.8, 0.0, box_shape());
        world.pickup(player).unwrap();
        settle(&mut world);
        world.pickup(player).unwrap();

        for _ in 0..180 {
            world.tick(DT);
        }

        let y = world.actor(item).unwrap().transform.translation.y;
        assert!(y < 0.3, "item should rest near the floor, got {y}");
    }

    #[test]
    fn drop_before_attach_cancels_the_timer() {
        let (mut world, events) = world();
        let player = world.spawn_character("player", 0.0, 0.0);
        let item = world.spawn_item_on_ground("crate", 0.8, 0.0, box_shape());

        world.pickup(player).unwrap();
        assert_eq!(world.pickup(player), Ok(PickupOutcome::Dropped(item)));
        settle(&mut world);

        assert!(world.actor(item).unwrap().attachment.is_none());
        assert!(
            !events
                .drain()
                .iter()
                .any(|e| matches!(e, GameplayEvent::ItemAttached { .. }))
        );
    }

    #[test]
    fn repick_after_early_drop_waits_for_its_own_delay() {
        let (mut world, _) = world();
        let player = world.spawn_character("player", 0.0, 0.0);
        let first = world.spawn_item_on_ground("first", 0.8, 0.0, box_shape());
        let second = world.spawn_item_on_ground("second", 5.8, 0.0, box_shape());

        assert_eq!(world.pickup(player), Ok(PickupOutcome::Picked(first)));
        world.tick(0.05);
        assert_eq!(world.pickup(player), Ok(PickupOutcome::Dropped(first)));

        world.character_mut(player).unwrap().transform.translation.x = 5.0;
        assert_eq!(world.pickup(player), Ok(PickupOutcome::Picked(second)));

        // The first hold's timer would have fired here.
        world.tick(0.06);
        assert!(world.actor(second).unwrap().attachment.is_none());
        assert!(world.actor(first).unwrap().attachment.is_none());

        world.tick(0.05);
        assert!(world.actor(second).unwrap().is_attached());
        assert!(world.actor(first).unwrap().attachment.is_none());
        assert!(matches!(
            world.character(player).unwrap().hold,
            HoldState::Held {
                attach: AttachState::Attached,
                ..
            }
        ));
    }

    #[test]
    fn stale_attach_is_ignored() {
        let (mut world, events) = world();
        let player = world.spawn_character("player", 0.0, 0.0);
        let item = world.spawn_item_on_ground("crate", 0.8, 0.0, box_shape());

        // Arm a request for a hold that never happened.
        let stale = AttachRequest {
            character: player,
            item,
            generation: 42,
        };
        world.hold_item(stale);

        assert!(world.actor(item).unwrap().attachment.is_none());
        assert!(
            events
                .drain()
                .iter()
                .any(|e| matches!(e, GameplayEvent::StaleAttachIgnored { .. }))
        );
    }

    #[test]
    fn missing_socket_keeps_item_held() {
        let (mut world, events) = world();
        let player = world.spawn_character("player", 0.0, 0.0);
        let item = world.spawn_item_on_ground("crate", 0.8, 0.0, box_shape());
        world
            .character_mut(player)
            .unwrap()
            .sockets
            .remove("WeaponSocket");

        world.pickup(player).unwrap();
        settle(&mut world);

        let c = world.character(player).unwrap();
        assert_eq!(c.held_item(), Some(item));
        assert!(matches!(
            c.hold,
            HoldState::Held {
                attach: AttachState::Failed,
                ..
            }
        ));
        assert!(
            events
                .drain()
                .iter()
                .any(|e| matches!(e, GameplayEvent::AttachFailed { .. }))
        );

        // The next pickup input still drops it.
        assert_eq!(world.pickup(player), Ok(PickupOutcome::Dropped(item)));
    }

    #[test]
    fn two_candidates_pick_exactly_one() {
        let (mut world, _) = world();
        let player = world.spawn_character("player", 0.0, 0.0);
        let near = world.spawn_item_on_ground("near", 0.6, 0.0, box_shape());
        let far = world.spawn_item_on_ground("far", 0.0, 1.0, box_shape());

        assert_eq!(world.pickup(player), Ok(PickupOutcome::Picked(near)));
        assert!(world.is_body_simulating(far));
        assert!(mesh_of(&world, far).simulate_physics);
        assert!(!mesh_of(&world, near).simulate_physics);
    }

    #[test]
    fn first_overlap_policy_uses_spawn_order() {
        let mut settings = GameplaySettings::default();
        settings.character.pickup_selection = PickupSelection::FirstOverlap;
        let (mut world, _) = world_with(settings);
        let player = world.spawn_character("player", 0.0, 0.0);
        let first = world.spawn_item_on_ground("first", 0.0, 1.0, box_shape());
        world.spawn_item_on_ground("second", 0.6, 0.0, box_shape());

        assert_eq!(world.pickup(player), Ok(PickupOutcome::Picked(first)));
    }

    #[test]
    fn tagged_prop_is_held_without_physics() {
        let (mut world, _) = world();
        let player = world.spawn_character("player", 0.0, 0.0);
        let lamp = world.spawn_prop(
            "lamp",
            Transform::from_xyz(0.6, 0.5, 0.0),
            Some(0.4),
            &["Pickup"],
        );

        assert_eq!(world.pickup(player), Ok(PickupOutcome::Picked(lamp)));
        settle(&mut world);
        assert!(world.actor(lamp).unwrap().is_attached());

        assert_eq!(world.pickup(player), Ok(PickupOutcome::Dropped(lamp)));
        assert!(!world.actor(lamp).unwrap().is_attached());
    }

    #[test]
    fn another_characters_item_is_not_a_candidate() {
        let (mut world, _) = world();
        let a = world.spawn_character("a", 0.0, 0.0);
        let b = world.spawn_character("b", 0.0, 0.5);
        let item = world.spawn_item_on_ground("crate", 0.6, 0.2, box_shape());

        assert_eq!(world.pickup(a), Ok(PickupOutcome::Picked(item)));
        assert_eq!(world.pickup(b), Ok(PickupOutcome::NothingInRange));
    }

    #[test]
    fn crouch_toggle_scales_and_restores_radius() {
        let (mut world, events) = world();
        let player = world.spawn_character("player", 0.0, 0.0);
        let start = world.character(player).unwrap().capsule.radius;

        world.trigger_crouch(player).unwrap();
        world.tick(DT);
        let crouched = world.character(player).unwrap();
        assert!(crouched.is_crouched);
        assert!((crouched.capsule.radius - start * 1.3).abs() < 1.0e-6);

        world.trigger_crouch(player).unwrap();
        world.tick(DT);
        let standing = world.character(player).unwrap();
        assert!(!standing.is_crouched);
        assert!((standing.capsule.radius - start).abs() < 1.0e-6);

        let drained = events.drain();
        assert!(drained.iter().any(|e| matches!(e, GameplayEvent::CrouchStarted { .. })));
        assert!(drained.iter().any(|e| matches!(e, GameplayEvent::CrouchEnded { .. })));
    }

    #[test]
    fn standing_up_keeps_character_grounded() {
        let (mut world, events) = world();
        let player = world.spawn_character("player", 0.0, 0.0);

        world.trigger_crouch(player).unwrap();
        world.tick(DT);
        let crouched = world.character(player).unwrap();
        assert!(crouched.feet().y.abs() < 1.0e-5);
        assert!(crouched.grounded);

        world.trigger_crouch(player).unwrap();
        world.tick(DT);
        let standing = world.character(player).unwrap();
        assert!(!standing.is_crouched);
        assert!(standing.feet().y.abs() < 1.0e-5);
        assert!(standing.grounded);

        events.drain();
        world.jump(player).unwrap();
        world.tick(DT);
        assert!(world.character(player).unwrap().velocity.y > 0.0);
        assert!(
            events
                .drain()
                .iter()
                .any(|e| matches!(e, GameplayEvent::Jumped { .. }))
        );
    }

    #[test]
    fn crouch_is_independent_of_holding() {
        let (mut world, _) = world();
        let player = world.spawn_character("player", 0.0, 0.0);
        let item = world.spawn_item_on_ground("crate", 0.8, 0.0, box_shape());
        world.pickup(player).unwrap();

        world.trigger_crouch(player).unwrap();
        settle(&mut world);

        let c = world.character(player).unwrap();
        assert!(c.is_crouched);
        assert_eq!(c.held_item(), Some(item));
    }

    #[test]
    fn unknown_character_is_an_error() {
        let (mut world, _) = world();
        let item = world.spawn_item_on_ground("crate", 0.0, 0.0, box_shape());

        assert_eq!(
            world.pickup(item),
            Err(GameplayError::UnknownCharacter(item))
        );
        assert_eq!(
            world.trigger_crouch(ActorId(99)),
            Err(GameplayError::UnknownCharacter(ActorId(99)))
        );
    }

    #[test]
    fn attach_rejects_bad_targets() {
        let (mut world, _) = world();
        let player = world.spawn_character("player", 0.0, 0.0);
        let item = world.spawn_item_on_ground("crate", 0.0, 3.0, box_shape());

        assert_eq!(
            world.attach_to_socket(player, player, "WeaponSocket"),
            Err(GameplayError::InvalidAttachTarget {
                actor: player,
                parent: player
            })
        );
        assert_eq!(
            world.attach_to_socket(item, player, "Head"),
            Err(GameplayError::SocketNotFound {
                character: player,
                socket: "Head".into()
            })
        );
        assert_eq!(
            world.attach_to_socket(item, item, "WeaponSocket"),
            Err(GameplayError::InvalidAttachTarget {
                actor: item,
                parent: item
            })
        );
    }

    #[test]
    fn look_turns_control_rotation() {
        let (mut world, _) = world();
        let player = world.spawn_character("player", 0.0, 0.0);

        world.look(player, Vec2::new(-4.0, 2.0)).unwrap();

        let control = world.character(player).unwrap().control;
        assert!((control.yaw - 10.0).abs() < 1.0e-4);
        assert!((control.pitch - 5.0).abs() < 1.0e-4);
        assert!(world.camera_transform(player).is_some());
    }
}
