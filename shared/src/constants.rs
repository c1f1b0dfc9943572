use std::time::Duration;

/// Tag an actor must carry to be considered by `pickup`.
pub const PICKUP_TAG: &str = "Pickup";

/// Socket on the character mesh that held items snap to.
pub const WEAPON_SOCKET: &str = "WeaponSocket";

/// Delay between disabling an item's physics and attaching it to the socket.
///
/// Attaching in the same frame the body stops simulating produces a visible snap,
/// so the attach is deferred by a short one-shot timer.
pub const PICK_ANIMATION_DELAY: Duration = Duration::from_millis(100);

/// Multiplier applied to the pre-crouch capsule radius while crouched.
pub const CROUCHED_CAPSULE_EXPAND: f32 = 1.3;

/// Standing capsule radius (meters).
pub const CAPSULE_RADIUS: f32 = 0.42;

/// Standing capsule half-height, cylinder section only (meters).
pub const CAPSULE_HALF_HEIGHT: f32 = 0.96;

/// Capsule half-height while crouched (meters).
pub const CROUCHED_HALF_HEIGHT: f32 = 0.60;

/// Radius of the pickup volume around an item root (meters).
pub const PICKUP_RADIUS: f32 = 0.75;

/// Character movement tuning.
///
/// Speeds are meters per second, decelerations meters per second squared.
pub const JUMP_Z_VELOCITY: f32 = 7.0;
pub const AIR_CONTROL: f32 = 0.35;
pub const MAX_WALK_SPEED: f32 = 5.0;
pub const MAX_WALK_SPEED_CROUCHED: f32 = 2.3;
pub const MIN_ANALOG_WALK_SPEED: f32 = 0.2;
pub const BRAKING_DECELERATION_WALKING: f32 = 20.0;
pub const BRAKING_DECELERATION_FALLING: f32 = 15.0;

/// Yaw rate used when orienting the character toward its movement (degrees per second).
pub const ROTATION_RATE_DEG: f32 = 500.0;

/// Gravity magnitude in meters per second squared (positive value).
pub const GRAVITY_MPS2: f32 = 9.81;

/// Distance the camera follows behind the character (meters).
pub const CAMERA_ARM_LENGTH: f32 = 4.0;

/// Degrees of control rotation per unit of look input.
pub const LOOK_YAW_SCALE: f32 = 2.5;
pub const LOOK_PITCH_SCALE: f32 = 2.5;

/// Control pitch is clamped to this magnitude (degrees).
pub const MAX_CONTROL_PITCH_DEG: f32 = 89.0;

/// Minimum planar motion required to update yaw (meters).
pub const YAW_EPS: f32 = 1.0e-6;

/// Practical small distance for comparisons (meters).
pub const DIST_EPS: f32 = 1.0e-6;
