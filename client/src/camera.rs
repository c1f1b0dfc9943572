use crate::{
    actor::sync_transforms,
    convert::to_transform,
    sim::{LocalCharacter, Sim},
};
use bevy::{
    prelude::*,
    window::{CursorGrabMode, CursorOptions, PrimaryWindow},
};

/// How quickly the camera eases onto the boom end. High enough to feel attached.
const CAMERA_DECAY_RATE: f32 = 44.0;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, add_camera);
    app.add_systems(Update, grab_cursor);
    app.add_systems(PostUpdate, follow_player.after(sync_transforms));
}

fn add_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        bevy::core_pipeline::tonemapping::Tonemapping::AcesFitted,
        Transform::from_xyz(0.0, 2.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
        DistanceFog {
            color: Color::srgba(0.35, 0.48, 0.66, 1.0),
            directional_light_color: Color::srgba(1.0, 0.95, 0.85, 0.5),
            directional_light_exponent: 30.0,
            falloff: FogFalloff::from_visibility_colors(
                200.0,
                Color::srgb(0.35, 0.5, 0.66),
                Color::srgb(0.8, 0.8, 0.7),
            ),
        },
    ));
}

/// Follow the local character's camera boom. The boom rotates with the control
/// rotation, not the character, so the player can look around without turning.
fn follow_player(
    mut camera: Single<&mut Transform, With<Camera3d>>,
    sim: Res<Sim>,
    local: Res<LocalCharacter>,
    time: Res<Time>,
) {
    let Some(boom) = local.0.and_then(|id| sim.world.camera_transform(id)) else {
        return;
    };
    let target = to_transform(&boom);

    camera
        .translation
        .smooth_nudge(&target.translation, CAMERA_DECAY_RATE, time.delta_secs());
    camera.rotation = target.rotation;
}

/// Lock the cursor on click so mouse motion drives look; Escape releases it.
fn grab_cursor(
    mut cursor: Single<&mut CursorOptions, With<PrimaryWindow>>,
    mouse: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
) {
    if mouse.just_pressed(MouseButton::Left) {
        cursor.grab_mode = CursorGrabMode::Locked;
        cursor.visible = false;
    }
    if keys.just_pressed(KeyCode::Escape) {
        cursor.grab_mode = CursorGrabMode::None;
        cursor.visible = true;
    }
}
