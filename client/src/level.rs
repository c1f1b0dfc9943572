use crate::{
    convert::{to_sim_vec3, to_vec3},
    sim::{LocalCharacter, Sim},
};
use bevy::prelude::*;
use shared::{ColliderShapeDef, PICKUP_TAG, Transform as SimTransform, WorldStaticDef, types as sim};

const GROUND_SIZE: f32 = 50.0;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, (setup, populate));
}

/// Collision geometry for the test level.
pub fn statics() -> Vec<WorldStaticDef> {
    let block = |id, x, z, half_extents: sim::Vec3| WorldStaticDef {
        id,
        translation: sim::Vec3::new(x, half_extents.y, z),
        rotation: sim::Quat::identity(),
        shape: ColliderShapeDef::Cuboid { half_extents },
    };

    vec![
        WorldStaticDef {
            id: 0,
            translation: sim::Vec3::zeros(),
            rotation: sim::Quat::identity(),
            shape: ColliderShapeDef::Plane {
                offset_along_normal: 0.0,
            },
        },
        // Cover wall and a low crate stack to hide behind.
        block(1, 0.0, -8.0, sim::Vec3::new(4.0, 1.2, 0.3)),
        block(2, 5.0, -5.0, sim::Vec3::new(0.6, 0.4, 0.6)),
    ]
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Name::new("Ground"),
        Transform::from_xyz(0., 0., 0.),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(GROUND_SIZE, GROUND_SIZE).build())),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::linear_rgb(0.2, 0.3, 0.25),
            perceptual_roughness: 1.0,
            metallic: 0.0,
            ..default()
        })),
    ));

    let block_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.45, 0.45, 0.5),
        perceptual_roughness: 0.9,
        ..default()
    });
    for def in statics() {
        let ColliderShapeDef::Cuboid { half_extents } = def.shape else {
            continue;
        };
        let size = to_vec3(&half_extents) * 2.0;
        commands.spawn((
            Name::new(format!("Static {}", def.id)),
            Mesh3d(meshes.add(Cuboid::new(size.x, size.y, size.z))),
            MeshMaterial3d(block_material.clone()),
            Transform::from_translation(to_vec3(&def.translation)),
        ));
    }

    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            illuminance: 8_000.0,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Seed the world with the player and a few things to pick up.
fn populate(mut sim: ResMut<Sim>, mut local: ResMut<LocalCharacter>) {
    let world = &mut sim.world;

    let player = world.spawn_character("Player", 0.0, 0.0);
    local.0 = Some(player);

    let crate_shape = ColliderShapeDef::Cuboid {
        half_extents: sim::Vec3::new(0.25, 0.25, 0.25),
    };
    for (i, x) in [-2.0, 2.0, 3.5].into_iter().enumerate() {
        world.spawn_item_on_ground(format!("Crate {i}"), x, -3.0, crate_shape);
    }
    world.spawn_item_on_ground(
        "Ball",
        0.0,
        -5.0,
        ColliderShapeDef::Sphere { radius: 0.2 },
    );

    // Tagged but has no physics; it can be carried and is never simulated.
    world.spawn_prop(
        "Lantern",
        SimTransform::from_translation(to_sim_vec3(Vec3::new(-4.0, 0.3, -1.0))),
        Some(0.4),
        &[PICKUP_TAG],
    );
    // Overlaps but is not tagged.
    world.spawn_prop(
        "Barrel",
        SimTransform::from_translation(to_sim_vec3(Vec3::new(4.0, 0.5, 1.0))),
        Some(0.6),
        &[],
    );

    info!("Level populated with {} actors", world.actors().count());
}
