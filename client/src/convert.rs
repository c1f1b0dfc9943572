//! Conversions between the simulation's nalgebra types and Bevy's glam types.

use bevy::prelude::*;
use shared::types as sim;

pub fn to_vec3(v: &sim::Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub fn to_quat(q: &sim::Quat) -> Quat {
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}

pub fn to_transform(t: &sim::Transform) -> Transform {
    Transform {
        translation: to_vec3(&t.translation),
        rotation: to_quat(&t.rotation),
        scale: to_vec3(&t.scale),
    }
}

pub fn to_sim_vec2(v: Vec2) -> sim::Vec2 {
    sim::Vec2::new(v.x, v.y)
}

pub fn to_sim_vec3(v: Vec3) -> sim::Vec3 {
    sim::Vec3::new(v.x, v.y, v.z)
}
