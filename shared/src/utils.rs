use crate::constants::YAW_EPS;
use crate::types::{Quat, Vec2, Vec3};
use std::f32::consts::{PI, TAU};

/// Yaw (radians about +Y) that faces the planar direction `xz`, where yaw zero faces -Z.
pub fn yaw_from_xz(xz: Vec2) -> Option<f32> {
    if xz.norm_squared() > YAW_EPS {
        return Some((-xz[0]).atan2(-xz[1]));
    }

    None
}

/// Yaw of a rotation, assuming it is (close to) a pure rotation about +Y.
pub fn yaw_of(rotation: &Quat) -> f32 {
    let forward = rotation * Vec3::new(0.0, 0.0, -1.0);
    (-forward.x).atan2(-forward.z)
}

/// Planar (XZ) distance squared between two world positions (meters^2).
pub fn planar_distance_sq(a: Vec3, b: Vec3) -> f32 {
    let x = b.x - a.x;
    let z = b.z - a.z;
    x * x + z * z
}

/// Step `current` toward `target` (both radians) by at most `max_step`, the short way round.
pub fn rotate_yaw_toward(current: f32, target: f32, max_step: f32) -> f32 {
    let mut delta = (target - current).rem_euclid(TAU);
    if delta > PI {
        delta -= TAU;
    }
    if delta.abs() <= max_step {
        target
    } else {
        current + max_step.copysign(delta)
    }
}
