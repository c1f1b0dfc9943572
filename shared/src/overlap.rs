use crate::character::Capsule;
use crate::types::{Iso, Vec3};
use nalgebra as na;
use rapier3d::parry::{query, shape as pshape};

/// Does a Y-aligned capsule centered at `capsule_center` intersect a sphere?
///
/// Both volumes are treated as triggers: touching counts, there is no response.
pub fn capsule_overlaps_sphere(
    capsule_center: Vec3,
    capsule: Capsule,
    sphere_center: Vec3,
    sphere_radius: f32,
) -> bool {
    if sphere_radius < 0.0 || capsule.radius < 0.0 {
        return false;
    }

    let capsule_shape = pshape::Capsule::new_y(capsule.half_height.max(0.0), capsule.radius);
    let ball = pshape::Ball::new(sphere_radius);
    let capsule_iso = Iso::from_parts(
        na::Translation3::from(capsule_center),
        na::UnitQuaternion::identity(),
    );
    let ball_iso = Iso::from_parts(
        na::Translation3::from(sphere_center),
        na::UnitQuaternion::identity(),
    );

    // Capsule/ball is always supported; treat an unsupported pair as no overlap.
    query::intersection_test(
        &capsule_iso,
        &capsule_shape as &dyn pshape::Shape,
        &ball_iso,
        &ball as &dyn pshape::Shape,
    )
    .unwrap_or(false)
}
