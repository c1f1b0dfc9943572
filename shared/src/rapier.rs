use crate::types::{Quat, Vec3};
use rapier3d::prelude::*;

/// Immutable level geometry (floor, walls, pedestals).
#[derive(Clone, Debug)]
pub struct WorldStaticDef {
    pub id: u32,
    /// World-space translation.
    pub translation: Vec3,
    /// World-space rotation (unit quaternion).
    pub rotation: Quat,
    pub shape: ColliderShapeDef,
}

/// Collider shapes used by level geometry and item bodies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColliderShapeDef {
    /// Infinite plane (half-space) whose normal is the pose's `rotation * +Y`.
    Plane {
        /// Offset along the plane normal (meters).
        offset_along_normal: f32,
    },

    /// Oriented cuboid with given half-extents (meters).
    Cuboid { half_extents: Vec3 },

    Sphere { radius: f32 },

    /// Y-aligned capsule (meters).
    CapsuleY { radius: f32, half_height: f32 },

    /// Y-aligned cylinder (meters).
    CylinderY { radius: f32, half_height: f32 },
}

impl ColliderShapeDef {
    /// Distance from the shape origin to its lowest point when upright.
    ///
    /// Used to rest freshly spawned items on the floor. Planes report zero.
    pub fn rest_height(&self) -> f32 {
        match *self {
            ColliderShapeDef::Plane { .. } => 0.0,
            ColliderShapeDef::Cuboid { half_extents } => half_extents.y,
            ColliderShapeDef::Sphere { radius } => radius,
            ColliderShapeDef::CapsuleY {
                radius,
                half_height,
            } => half_height + radius,
            ColliderShapeDef::CylinderY { half_height, .. } => half_height,
        }
    }
}

/// Build a collider for a static def, posed in world space.
///
/// Statics are inserted without a parent body, so the pose lives on the collider.
pub fn static_collider(def: &WorldStaticDef) -> Collider {
    match def.shape {
        ColliderShapeDef::Plane {
            offset_along_normal,
        } => {
            // n ⋅ x = dist with n = R * +Y and dist = n ⋅ t + offset.
            let n = def.rotation * Vector::y();
            let dist = n.dot(&def.translation) + offset_along_normal;
            let unit_n = UnitVector::new_normalize(n);

            ColliderBuilder::new(SharedShape::new(HalfSpace::new(unit_n)))
                .translation(unit_n.into_inner() * dist)
                .build()
        }
        shape => shape_builder(&shape)
            .translation(def.translation)
            .rotation(def.rotation.scaled_axis())
            .build(),
    }
}

/// Build a collider for an item body. The body carries the pose.
pub fn body_collider(shape: &ColliderShapeDef) -> Collider {
    shape_builder(shape).build()
}

fn shape_builder(shape: &ColliderShapeDef) -> ColliderBuilder {
    match *shape {
        // A half-space through the body origin; only meaningful for statics.
        ColliderShapeDef::Plane { .. } => {
            ColliderBuilder::new(SharedShape::new(HalfSpace::new(Vector::y_axis())))
        }
        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }
        ColliderShapeDef::Sphere { radius } => ColliderBuilder::ball(radius),
        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => ColliderBuilder::capsule_y(half_height, radius),
        ColliderShapeDef::CylinderY {
            radius,
            half_height,
        } => ColliderBuilder::cylinder(half_height, radius),
    }
}
