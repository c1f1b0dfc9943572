/*!
Player character state: capsule, crouch, control rotation, sockets and the
held-item state machine.

Hold states
- `Empty`: nothing carried.
- `Held { attach: Pending }`: the item was captured and its physics disabled; the
  socket attach waits on a one-shot timer.
- `Held { attach: Attached }`: the item follows the socket.
- `Held { attach: Failed }`: the attach was refused (e.g. missing socket). The
  item stays referenced until the next pickup input drops it.

Every transition into `Held` bumps `hold_generation`. Attach timers carry the
generation they were armed with, so a timer that outlives its hold is ignored.
*/

use crate::actor::ActorId;
use crate::constants::{DIST_EPS, MAX_CONTROL_PITCH_DEG};
use crate::settings::CharacterSettings;
use crate::timer::TimerHandle;
use crate::types::{Quat, Transform, Vec2, Vec3};
use crate::utils::yaw_from_xz;
use std::collections::HashMap;

/// Y-aligned collision capsule. `half_height` excludes the caps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Capsule {
    pub radius: f32,
    pub half_height: f32,
}

impl Capsule {
    /// Distance from the capsule center to its lowest point.
    #[inline]
    pub fn half_extent_y(&self) -> f32 {
        self.half_height + self.radius
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttachState {
    Pending(TimerHandle),
    Attached,
    Failed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HoldState {
    #[default]
    Empty,
    Held {
        item: ActorId,
        generation: u64,
        attach: AttachState,
    },
}

/// Named attachment points on the character mesh, relative to the capsule center.
#[derive(Clone, Debug, Default)]
pub struct Sockets(HashMap<String, Transform>);

impl Sockets {
    pub fn insert(&mut self, name: impl Into<String>, local: Transform) {
        self.0.insert(name.into(), local);
    }

    pub fn get(&self, name: &str) -> Option<&Transform> {
        self.0.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Transform> {
        self.0.remove(name)
    }
}

/// Yaw/pitch the player is looking with, in degrees. Drives the camera boom and
/// the basis for movement input.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControlRotation {
    pub yaw: f32,
    pub pitch: f32,
}

impl ControlRotation {
    pub fn add_yaw(&mut self, degrees: f32) {
        self.yaw = (self.yaw + degrees).rem_euclid(360.0);
    }

    pub fn add_pitch(&mut self, degrees: f32) {
        self.pitch = (self.pitch + degrees).clamp(-MAX_CONTROL_PITCH_DEG, MAX_CONTROL_PITCH_DEG);
    }

    pub fn yaw_quat(&self) -> Quat {
        Quat::from_axis_angle(&Vec3::y_axis(), self.yaw.to_radians())
    }

    /// Yaw then pitch, as used by the camera boom.
    pub fn quat(&self) -> Quat {
        self.yaw_quat() * Quat::from_axis_angle(&Vec3::x_axis(), self.pitch.to_radians())
    }
}

#[derive(Clone, Debug)]
pub struct Character {
    pub id: ActorId,
    pub name: String,
    /// World-space transform of the capsule center.
    pub transform: Transform,
    pub capsule: Capsule,
    /// Capsule captured at spawn; crouch scales from and restores to it.
    initial_capsule: Capsule,
    crouched_half_height: f32,
    crouched_capsule_expand: f32,
    pub control: ControlRotation,
    pub velocity: Vec3,
    pub grounded: bool,
    pub wants_to_crouch: bool,
    pub is_crouched: bool,
    pub jump_requested: bool,
    pending_input: Vec3,
    pub sockets: Sockets,
    pub hold: HoldState,
    hold_generation: u64,
}

impl Character {
    pub fn new(
        id: ActorId,
        name: impl Into<String>,
        transform: Transform,
        settings: &CharacterSettings,
    ) -> Self {
        let capsule = Capsule {
            radius: settings.capsule_radius,
            half_height: settings.capsule_half_height,
        };
        let [x, y, z] = settings.socket_offset;
        let mut sockets = Sockets::default();
        sockets.insert(
            settings.attach_socket.clone(),
            Transform::from_xyz(x, y, z),
        );

        Self {
            id,
            name: name.into(),
            transform,
            capsule,
            initial_capsule: capsule,
            crouched_half_height: settings.crouched_half_height,
            crouched_capsule_expand: settings.crouched_capsule_expand,
            control: ControlRotation::default(),
            velocity: Vec3::zeros(),
            grounded: false,
            wants_to_crouch: false,
            is_crouched: false,
            jump_requested: false,
            pending_input: Vec3::zeros(),
            sockets,
            hold: HoldState::Empty,
            hold_generation: 0,
        }
    }

    pub fn initial_capsule(&self) -> Capsule {
        self.initial_capsule
    }

    pub fn is_holding_item(&self) -> bool {
        matches!(self.hold, HoldState::Held { .. })
    }

    pub fn held_item(&self) -> Option<ActorId> {
        match self.hold {
            HoldState::Held { item, .. } => Some(item),
            HoldState::Empty => None,
        }
    }

    /// Generation the next call to `begin_hold` will use.
    pub(crate) fn next_hold_generation(&self) -> u64 {
        self.hold_generation + 1
    }

    /// Enter `Held` for `item` and return the new hold generation.
    pub(crate) fn begin_hold(&mut self, item: ActorId, timer: TimerHandle) -> u64 {
        self.hold_generation += 1;
        self.hold = HoldState::Held {
            item,
            generation: self.hold_generation,
            attach: AttachState::Pending(timer),
        };
        self.hold_generation
    }

    /// Leave `Held`, returning the item and its pending attach timer if one was armed.
    pub(crate) fn end_hold(&mut self) -> Option<(ActorId, Option<TimerHandle>)> {
        match std::mem::take(&mut self.hold) {
            HoldState::Held { item, attach, .. } => {
                let pending = match attach {
                    AttachState::Pending(handle) => Some(handle),
                    AttachState::Attached | AttachState::Failed => None,
                };
                Some((item, pending))
            }
            HoldState::Empty => None,
        }
    }

    /// Whether an attach for `item` armed at `generation` still matches the hold.
    pub(crate) fn attach_is_current(&self, item: ActorId, generation: u64) -> bool {
        matches!(
            self.hold,
            HoldState::Held { item: held, generation: g, attach: AttachState::Pending(_) }
                if held == item && g == generation
        )
    }

    pub(crate) fn set_attach_state(&mut self, state: AttachState) {
        if let HoldState::Held { attach, .. } = &mut self.hold {
            *attach = state;
        }
    }

    /// Queue movement input along the control yaw. `axis.y` is forward, `axis.x` is right.
    pub fn move_input(&mut self, axis: Vec2) {
        let yaw = self.control.yaw_quat();
        let forward = yaw * Vec3::new(0.0, 0.0, -1.0);
        let right = yaw * Vec3::new(1.0, 0.0, 0.0);
        self.add_movement_input(forward, axis.y);
        self.add_movement_input(right, axis.x);
    }

    pub fn add_movement_input(&mut self, direction: Vec3, scale: f32) {
        self.pending_input += direction * scale;
    }

    /// Take the queued input, clamped to unit length.
    pub(crate) fn consume_input(&mut self) -> Vec3 {
        let input = std::mem::replace(&mut self.pending_input, Vec3::zeros());
        let len = input.norm();
        if len > 1.0 { input / len } else { input }
    }

    pub fn jump(&mut self) {
        self.jump_requested = true;
    }

    pub fn stop_jumping(&mut self) {
        self.jump_requested = false;
    }

    pub fn trigger_crouch(&mut self) {
        self.wants_to_crouch = !self.wants_to_crouch;
    }

    /// Shrink to crouch height and widen the capsule. Feet stay where they are.
    pub(crate) fn start_crouch(&mut self) {
        let feet = self.feet();
        self.capsule.half_height = self.crouched_half_height;
        self.on_start_crouch();
        self.stand_on(feet);
        self.is_crouched = true;
    }

    pub(crate) fn end_crouch(&mut self) {
        let feet = self.feet();
        self.capsule.half_height = self.initial_capsule.half_height;
        self.on_end_crouch();
        self.stand_on(feet);
        self.is_crouched = false;
    }

    fn on_start_crouch(&mut self) {
        self.set_capsule_radius(self.initial_capsule.radius * self.crouched_capsule_expand);
    }

    fn on_end_crouch(&mut self) {
        self.set_capsule_radius(self.initial_capsule.radius);
    }

    /// Put the capsule's lowest point at `feet`.
    fn stand_on(&mut self, feet: Vec3) {
        self.transform.translation.y = feet.y + self.capsule.half_extent_y();
    }

    fn set_capsule_radius(&mut self, radius: f32) {
        if radius >= 0.0 {
            self.capsule.radius = radius;
        }
    }

    /// Turn (yaw only) toward a world position.
    pub fn face_location(&mut self, target: Vec3) {
        let dx = target.x - self.transform.translation.x;
        let dz = target.z - self.transform.translation.z;
        if dx * dx + dz * dz <= DIST_EPS * DIST_EPS {
            return;
        }
        if let Some(yaw) = yaw_from_xz(Vec2::new(dx, dz)) {
            self.transform.rotation = Quat::from_axis_angle(&Vec3::y_axis(), yaw);
        }
    }

    /// World transform of a named socket, if the mesh has it.
    pub fn socket_world_transform(&self, socket: &str) -> Option<Transform> {
        self.sockets
            .get(socket)
            .map(|local| self.transform.mul_transform(local))
    }

    /// Feet position of the capsule.
    pub fn feet(&self) -> Vec3 {
        self.transform.translation - Vec3::new(0.0, self.capsule.half_extent_y(), 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn character() -> Character {
        Character::new(
            ActorId(1),
            "player",
            Transform::from_xyz(0.0, 1.38, 0.0),
            &CharacterSettings::default(),
        )
    }

    #[test]
    fn crouch_twice_restores_radius() {
        let mut c = character();
        let start = c.capsule.radius;

        c.start_crouch();
        assert!((c.capsule.radius - start * 1.3).abs() < 1.0e-6);

        c.end_crouch();
        assert!((c.capsule.radius - start).abs() < 1.0e-6);
        assert!((c.capsule.half_height - c.initial_capsule().half_height).abs() < 1.0e-6);
    }

    #[test]
    fn crouch_keeps_feet_planted() {
        let mut c = character();
        let feet = c.feet();

        c.start_crouch();
        assert!((c.feet() - feet).norm() < 1.0e-5);
        assert!(c.transform.translation.y < 1.38);

        c.end_crouch();
        assert!((c.feet() - feet).norm() < 1.0e-5);
        assert!((c.transform.translation.y - 1.38).abs() < 1.0e-5);
    }

    #[test]
    fn trigger_crouch_only_toggles_intent() {
        let mut c = character();
        c.trigger_crouch();
        assert!(c.wants_to_crouch);
        assert!(!c.is_crouched);
        c.trigger_crouch();
        assert!(!c.wants_to_crouch);
    }

    #[test]
    fn move_input_follows_control_yaw() {
        let mut c = character();
        c.control.add_yaw(90.0);
        c.move_input(Vec2::new(0.0, 1.0));

        // Yaw 90 turns forward (-Z) to -X.
        let input = c.consume_input();
        assert!((input - Vec3::new(-1.0, 0.0, 0.0)).norm() < 1.0e-5);
        assert_eq!(c.consume_input(), Vec3::zeros());
    }

    #[test]
    fn diagonal_input_is_clamped() {
        let mut c = character();
        c.move_input(Vec2::new(1.0, 1.0));
        assert!((c.consume_input().norm() - 1.0).abs() < 1.0e-5);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut control = ControlRotation::default();
        control.add_pitch(500.0);
        assert_eq!(control.pitch, MAX_CONTROL_PITCH_DEG);
        control.add_yaw(-30.0);
        assert!((control.yaw - 330.0).abs() < 1.0e-4);
    }

    #[test]
    fn face_location_turns_toward_target() {
        let mut c = character();
        c.face_location(Vec3::new(5.0, 0.0, 0.0));

        let forward = c.transform.rotation * Vec3::new(0.0, 0.0, -1.0);
        assert!((forward - Vec3::new(1.0, 0.0, 0.0)).norm() < 1.0e-5);
    }

    #[test]
    fn socket_follows_character() {
        let mut c = character();
        c.transform.translation = Vec3::new(2.0, 1.0, 0.0);
        let socket = c.socket_world_transform("WeaponSocket").unwrap();
        assert!((socket.translation - Vec3::new(2.35, 1.15, -0.3)).norm() < 1.0e-5);
        assert!(c.socket_world_transform("HandSocket").is_none());
    }

    #[test]
    fn stale_generation_is_not_current() {
        let mut timers = crate::timer::Timers::new();
        let mut c = character();

        let first = c.begin_hold(ActorId(7), timers.schedule(0.1, ()));
        c.end_hold();
        let second = c.begin_hold(ActorId(7), timers.schedule(0.1, ()));

        assert!(!c.attach_is_current(ActorId(7), first));
        assert!(c.attach_is_current(ActorId(7), second));
        assert!(!c.attach_is_current(ActorId(8), second));
    }
}
