use crate::character::Character;
use crate::constants::DIST_EPS;
use crate::settings::MovementSettings;
use crate::types::{Quat, Vec3};
use crate::utils::{rotate_yaw_toward, yaw_of};

/// What changed during a movement step that callers may want to report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepMovementResult {
    pub jumped: bool,
    pub crouch_started: bool,
    pub crouch_ended: bool,
}

/// Advance one character by `dt_seconds`.
///
/// Order
/// - Resolve crouch intent (capsule change happens before moving).
/// - Consume queued input and accelerate/brake on the XZ plane.
/// - Jump if requested and grounded, then integrate gravity.
/// - Clamp to the floor at `ground_height`.
/// - Yaw toward the planar velocity at `rotation_rate`.
pub fn step_movement(
    character: &mut Character,
    settings: &MovementSettings,
    dt_seconds: f32,
) -> StepMovementResult {
    let dt = dt_seconds.max(0.0);
    let mut result = StepMovementResult::default();

    // 1) Crouch transitions.
    if character.wants_to_crouch && !character.is_crouched {
        character.start_crouch();
        result.crouch_started = true;
    } else if !character.wants_to_crouch && character.is_crouched {
        character.end_crouch();
        result.crouch_ended = true;
    }

    // 2) Planar velocity.
    let input = character.consume_input();
    let input_len = input.norm();
    let planar = Vec3::new(character.velocity.x, 0.0, character.velocity.z);
    let max_speed = if character.is_crouched {
        settings.max_walk_speed_crouched
    } else {
        settings.max_walk_speed
    };

    let next_planar = if input_len > DIST_EPS {
        let speed = (max_speed * input_len).max(settings.min_analog_walk_speed.min(max_speed));
        let desired = input / input_len * speed;
        if character.grounded {
            desired
        } else {
            planar + (desired - planar) * settings.air_control.clamp(0.0, 1.0)
        }
    } else {
        let braking = if character.grounded {
            settings.braking_deceleration_walking
        } else {
            settings.braking_deceleration_falling
        };
        brake(planar, braking * dt)
    };

    // 3) Vertical velocity.
    let mut vy = character.velocity.y;
    if character.jump_requested && character.grounded && !character.is_crouched {
        vy = settings.jump_z_velocity;
        character.grounded = false;
        // One jump per press.
        character.jump_requested = false;
        result.jumped = true;
    }
    if !character.grounded {
        vy -= settings.gravity * dt;
    }

    character.velocity = Vec3::new(next_planar.x, vy, next_planar.z);
    character.transform.translation += character.velocity * dt;

    // 4) Floor.
    let rest_y = settings.ground_height + character.capsule.half_extent_y();
    if character.transform.translation.y <= rest_y + DIST_EPS {
        character.transform.translation.y = rest_y;
        if character.velocity.y < 0.0 {
            character.velocity.y = 0.0;
        }
        character.grounded = character.velocity.y <= 0.0;
    } else {
        character.grounded = false;
    }

    // 5) Orient rotation to movement.
    let planar_speed_sq = next_planar.x * next_planar.x + next_planar.z * next_planar.z;
    if planar_speed_sq > DIST_EPS {
        let target = (-next_planar.x).atan2(-next_planar.z);
        let current = yaw_of(&character.transform.rotation);
        let yaw = rotate_yaw_toward(current, target, settings.rotation_rate.to_radians() * dt);
        character.transform.rotation = Quat::from_axis_angle(&Vec3::y_axis(), yaw);
    }

    result
}

/// Reduce planar speed by `amount`, never reversing direction.
#[inline]
fn brake(planar: Vec3, amount: f32) -> Vec3 {
    let speed = planar.norm();
    if speed <= amount.max(DIST_EPS) {
        return Vec3::zeros();
    }
    planar * ((speed - amount) / speed)
}
