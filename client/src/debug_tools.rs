//! Debug/performance tooling for native dev builds.
//!
//! This plugin is compiled/used only when the caller gates it behind `dev_native`
//! (`#[cfg(feature = "dev_native")] mod debug_tools;` in `main.rs`).

use crate::{
    actor::{ActorEntity, LocalActor},
    convert::{to_transform, to_vec3},
    sim::{LocalCharacter, Sim},
};
use bevy::diagnostic::{
    EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin, SystemInformationDiagnosticsPlugin,
};
use bevy::prelude::*;
use bevy::render::diagnostic::RenderDiagnosticsPlugin;
use iyes_perf_ui::prelude::*;

/// Add debug/perf tooling (intended for `dev_native` builds only).
pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        FrameTimeDiagnosticsPlugin::default(),
        EntityCountDiagnosticsPlugin::default(),
        SystemInformationDiagnosticsPlugin::default(),
        RenderDiagnosticsPlugin,
        PerfUiPlugin,
    ));

    app.add_systems(Startup, spawn_perf_ui);
    app.add_systems(
        Update,
        (draw_facing, draw_overlap_volumes, draw_local_capsule),
    );
}

fn spawn_perf_ui(mut commands: Commands) {
    commands.spawn(PerfUiAllEntries::default());
}

fn draw_facing(mut gizmos: Gizmos, q: Query<&GlobalTransform, With<LocalActor>>) {
    for gt in &q {
        let (_, rot, start) = gt.to_scale_rotation_translation();

        let mut dir = rot * Vec3::NEG_Z;
        if !dir.is_finite() || dir.length_squared() <= 1.0e-8 {
            dir = Vec3::NEG_Z;
        }

        let end = start + dir.normalize() * 1.5;
        gizmos.arrow(start, end, Color::srgb(1.0, 1.0, 0.2));
    }
}

/// Trigger spheres of everything a character can overlap. Tagged actors are green.
fn draw_overlap_volumes(mut gizmos: Gizmos, sim: Res<Sim>, q: Query<&ActorEntity>) {
    let tag = &sim.world.settings().character.pickup_tag;
    for ActorEntity(id) in &q {
        let Some(actor) = sim.world.actor(*id) else {
            continue;
        };
        let Some(radius) = actor.overlap_radius() else {
            continue;
        };
        let color = if actor.has_tag(tag) {
            Color::srgb(0.2, 1.0, 0.3)
        } else {
            Color::srgb(0.6, 0.6, 0.6)
        };
        gizmos.sphere(
            Isometry3d::from_translation(to_vec3(&actor.transform.translation)),
            radius,
            color,
        );
    }
}

/// The simulated capsule and weapon socket, to compare against the eased mesh.
fn draw_local_capsule(mut gizmos: Gizmos, sim: Res<Sim>, local: Res<LocalCharacter>) {
    let Some(character) = local.0.and_then(|id| sim.world.character(id)) else {
        return;
    };
    let center = to_vec3(&character.transform.translation);
    let capsule = character.capsule;
    let color = if character.is_crouched {
        Color::srgb(1.0, 0.5, 0.1)
    } else {
        Color::srgb(0.2, 0.8, 1.0)
    };

    for y in [-capsule.half_height, capsule.half_height] {
        gizmos.circle(
            Isometry3d::new(
                center + Vec3::Y * y,
                Quat::from_rotation_x(std::f32::consts::FRAC_PI_2),
            ),
            capsule.radius,
            color,
        );
    }

    let socket = &sim.world.settings().character.attach_socket;
    if let Some(socket) = character.socket_world_transform(socket) {
        let socket = to_transform(&socket);
        gizmos.axes(socket, 0.2);
    }
}
