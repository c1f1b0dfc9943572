//! Gameplay tuning, loaded from RON.
//!
//! Every field has a serde default, so a settings file only needs to list the
//! values it overrides. Missing files are the caller's concern: the client logs a
//! warning and keeps [`GameplaySettings::default`].

use crate::constants::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// How `pickup` chooses among several tagged actors in range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupSelection {
    /// Closest candidate on the XZ plane; ties go to the lowest actor id.
    #[default]
    Nearest,
    /// First candidate in spawn order.
    FirstOverlap,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameplaySettings {
    #[serde(default)]
    pub character: CharacterSettings,
    #[serde(default)]
    pub movement: MovementSettings,
    #[serde(default)]
    pub camera: CameraSettings,
    #[serde(default)]
    pub item: ItemSettings,
}

impl GameplaySettings {
    pub fn from_ron_str(source: &str) -> Result<Self, SettingsError> {
        Ok(ron::de::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_ron_str(&source)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterSettings {
    #[serde(default = "CharacterSettings::default_capsule_radius")]
    pub capsule_radius: f32,
    #[serde(default = "CharacterSettings::default_capsule_half_height")]
    pub capsule_half_height: f32,
    #[serde(default = "CharacterSettings::default_crouched_half_height")]
    pub crouched_half_height: f32,
    #[serde(default = "CharacterSettings::default_crouched_capsule_expand")]
    pub crouched_capsule_expand: f32,
    /// Seconds between picking an item up and snapping it to the socket.
    #[serde(default = "CharacterSettings::default_pick_animation_delay")]
    pub pick_animation_delay: f32,
    #[serde(default = "CharacterSettings::default_attach_socket")]
    pub attach_socket: String,
    /// Socket position relative to the capsule center, in character space.
    #[serde(default = "CharacterSettings::default_socket_offset")]
    pub socket_offset: [f32; 3],
    #[serde(default = "CharacterSettings::default_pickup_tag")]
    pub pickup_tag: String,
    #[serde(default)]
    pub pickup_selection: PickupSelection,
}

impl CharacterSettings {
    fn default_capsule_radius() -> f32 {
        CAPSULE_RADIUS
    }
    fn default_capsule_half_height() -> f32 {
        CAPSULE_HALF_HEIGHT
    }
    fn default_crouched_half_height() -> f32 {
        CROUCHED_HALF_HEIGHT
    }
    fn default_crouched_capsule_expand() -> f32 {
        CROUCHED_CAPSULE_EXPAND
    }
    fn default_pick_animation_delay() -> f32 {
        PICK_ANIMATION_DELAY.as_secs_f32()
    }
    fn default_attach_socket() -> String {
        WEAPON_SOCKET.to_string()
    }
    fn default_socket_offset() -> [f32; 3] {
        [0.35, 0.15, -0.3]
    }
    fn default_pickup_tag() -> String {
        PICKUP_TAG.to_string()
    }
}

impl Default for CharacterSettings {
    fn default() -> Self {
        Self {
            capsule_radius: Self::default_capsule_radius(),
            capsule_half_height: Self::default_capsule_half_height(),
            crouched_half_height: Self::default_crouched_half_height(),
            crouched_capsule_expand: Self::default_crouched_capsule_expand(),
            pick_animation_delay: Self::default_pick_animation_delay(),
            attach_socket: Self::default_attach_socket(),
            socket_offset: Self::default_socket_offset(),
            pickup_tag: Self::default_pickup_tag(),
            pickup_selection: PickupSelection::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementSettings {
    #[serde(default = "MovementSettings::default_jump_z_velocity")]
    pub jump_z_velocity: f32,
    #[serde(default = "MovementSettings::default_air_control")]
    pub air_control: f32,
    #[serde(default = "MovementSettings::default_max_walk_speed")]
    pub max_walk_speed: f32,
    #[serde(default = "MovementSettings::default_max_walk_speed_crouched")]
    pub max_walk_speed_crouched: f32,
    #[serde(default = "MovementSettings::default_min_analog_walk_speed")]
    pub min_analog_walk_speed: f32,
    #[serde(default = "MovementSettings::default_braking_deceleration_walking")]
    pub braking_deceleration_walking: f32,
    #[serde(default = "MovementSettings::default_braking_deceleration_falling")]
    pub braking_deceleration_falling: f32,
    /// Degrees per second.
    #[serde(default = "MovementSettings::default_rotation_rate")]
    pub rotation_rate: f32,
    #[serde(default = "MovementSettings::default_gravity")]
    pub gravity: f32,
    /// Height of the walkable floor the capsule rests on.
    #[serde(default)]
    pub ground_height: f32,
}

impl MovementSettings {
    fn default_jump_z_velocity() -> f32 {
        JUMP_Z_VELOCITY
    }
    fn default_air_control() -> f32 {
        AIR_CONTROL
    }
    fn default_max_walk_speed() -> f32 {
        MAX_WALK_SPEED
    }
    fn default_max_walk_speed_crouched() -> f32 {
        MAX_WALK_SPEED_CROUCHED
    }
    fn default_min_analog_walk_speed() -> f32 {
        MIN_ANALOG_WALK_SPEED
    }
    fn default_braking_deceleration_walking() -> f32 {
        BRAKING_DECELERATION_WALKING
    }
    fn default_braking_deceleration_falling() -> f32 {
        BRAKING_DECELERATION_FALLING
    }
    fn default_rotation_rate() -> f32 {
        ROTATION_RATE_DEG
    }
    fn default_gravity() -> f32 {
        GRAVITY_MPS2
    }
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            jump_z_velocity: Self::default_jump_z_velocity(),
            air_control: Self::default_air_control(),
            max_walk_speed: Self::default_max_walk_speed(),
            max_walk_speed_crouched: Self::default_max_walk_speed_crouched(),
            min_analog_walk_speed: Self::default_min_analog_walk_speed(),
            braking_deceleration_walking: Self::default_braking_deceleration_walking(),
            braking_deceleration_falling: Self::default_braking_deceleration_falling(),
            rotation_rate: Self::default_rotation_rate(),
            gravity: Self::default_gravity(),
            ground_height: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    #[serde(default = "CameraSettings::default_arm_length")]
    pub arm_length: f32,
    #[serde(default = "CameraSettings::default_look_yaw_scale")]
    pub look_yaw_scale: f32,
    #[serde(default = "CameraSettings::default_look_pitch_scale")]
    pub look_pitch_scale: f32,
    #[serde(default)]
    pub invert_y: bool,
}

impl CameraSettings {
    fn default_arm_length() -> f32 {
        CAMERA_ARM_LENGTH
    }
    fn default_look_yaw_scale() -> f32 {
        LOOK_YAW_SCALE
    }
    fn default_look_pitch_scale() -> f32 {
        LOOK_PITCH_SCALE
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            arm_length: Self::default_arm_length(),
            look_yaw_scale: Self::default_look_yaw_scale(),
            look_pitch_scale: Self::default_look_pitch_scale(),
            invert_y: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSettings {
    #[serde(default = "ItemSettings::default_pickup_radius")]
    pub pickup_radius: f32,
}

impl ItemSettings {
    fn default_pickup_radius() -> f32 {
        PICKUP_RADIUS
    }
}

impl Default for ItemSettings {
    fn default() -> Self {
        Self {
            pickup_radius: Self::default_pickup_radius(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let settings = GameplaySettings::from_ron_str("()").unwrap();
        assert_eq!(settings.character.attach_socket, WEAPON_SOCKET);
        assert_eq!(settings.character.pickup_tag, PICKUP_TAG);
        assert_eq!(settings.character.pickup_selection, PickupSelection::Nearest);
        assert!((settings.character.crouched_capsule_expand - 1.3).abs() < 1.0e-6);
        assert!((settings.character.pick_animation_delay - 0.1).abs() < 1.0e-6);
        assert!((settings.movement.max_walk_speed - MAX_WALK_SPEED).abs() < 1.0e-6);
    }

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let source = r#"(
            character: (
                attach_socket: "HandSocket",
                pickup_selection: first_overlap,
            ),
            movement: (max_walk_speed: 3.5),
        )"#;
        let settings = GameplaySettings::from_ron_str(source).unwrap();
        assert_eq!(settings.character.attach_socket, "HandSocket");
        assert_eq!(
            settings.character.pickup_selection,
            PickupSelection::FirstOverlap
        );
        assert!((settings.movement.max_walk_speed - 3.5).abs() < 1.0e-6);
        assert!((settings.movement.jump_z_velocity - JUMP_Z_VELOCITY).abs() < 1.0e-6);
        assert!((settings.camera.arm_length - CAMERA_ARM_LENGTH).abs() < 1.0e-6);
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = GameplaySettings::from_ron_str("(character: (capsule_radius: \"wide\"))")
            .unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = GameplaySettings::load("/definitely/not/here/gameplay.ron").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
