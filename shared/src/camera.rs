use crate::character::Character;
use crate::types::{Transform, Vec3};

/// Where the follow camera sits for a character.
///
/// The boom pivots at the capsule center, is rotated by the control rotation, and
/// extends `arm_length` behind it. The camera looks back along the boom at the pivot
/// and does not rotate relative to the arm.
pub fn camera_boom_transform(character: &Character, arm_length: f32) -> Transform {
    let rotation = character.control.quat();
    let pivot = character.transform.translation;
    Transform::from_translation(pivot + rotation * Vec3::new(0.0, 0.0, arm_length.max(0.0)))
        .with_rotation(rotation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorId;
    use crate::settings::CharacterSettings;

    fn character() -> Character {
        Character::new(
            ActorId(1),
            "player",
            Transform::from_xyz(0.0, 1.0, 0.0),
            &CharacterSettings::default(),
        )
    }

    #[test]
    fn boom_sits_behind_character() {
        let c = character();
        let cam = camera_boom_transform(&c, 4.0);
        assert!((cam.translation - Vec3::new(0.0, 1.0, 4.0)).norm() < 1.0e-5);

        let forward = cam.rotation * Vec3::new(0.0, 0.0, -1.0);
        let to_pivot = (c.transform.translation - cam.translation).normalize();
        assert!((forward - to_pivot).norm() < 1.0e-5);
    }

    #[test]
    fn boom_follows_control_rotation_not_character_rotation() {
        let mut c = character();
        c.face_location(Vec3::new(10.0, 1.0, 0.0));
        c.control.add_pitch(-30.0);

        let cam = camera_boom_transform(&c, 4.0);
        // Pitching down lifts the camera above the pivot.
        assert!(cam.translation.y > 1.0);
        assert!(cam.translation.x.abs() < 1.0e-5);
        assert!(((cam.translation - c.transform.translation).norm() - 4.0).abs() < 1.0e-4);
    }
}
