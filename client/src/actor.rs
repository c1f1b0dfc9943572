use crate::{
    convert::{to_transform, to_vec3},
    sim::{LocalCharacter, Sim},
    telemetry::GameplayMessage,
};
use bevy::{platform::collections::HashMap, prelude::*};
use shared::{ActorId, ActorKind, Capsule, ColliderShapeDef, GameplayEvent, PICKUP_TAG};

/// Render smoothing toward the simulated pose.
const TRANSLATION_DECAY_RATE: f32 = 18.0;
const ROTATION_DECAY_RATE: f32 = 90.0;

/// Used to tie a world actor id to the local bevy entity.
#[derive(Resource, Default)]
pub struct ActorEntityMapping(pub HashMap<ActorId, Entity>);

#[derive(Component, Debug)]
pub struct ActorEntity(pub ActorId);

/// The entity of the character this client controls.
#[derive(Component, Debug)]
pub struct LocalActor;

/// Present on characters; the mesh child is rebuilt when the capsule changes.
#[derive(Component, Debug)]
pub struct CharacterBody {
    mesh: Entity,
}

/// Present on an item while a character holds it. Held items snap to the pose
/// instead of easing, so they never lag behind the hand.
#[derive(Component, Debug)]
pub struct Held;

pub(super) fn plugin(app: &mut App) {
    app.insert_resource(ActorEntityMapping::default());
    app.add_systems(Update, (spawn_character_visuals, spawn_actor_visuals));
    app.add_systems(PostUpdate, (on_gameplay_message, sync_transforms).chain());
}

/// Ensures there is a Bevy `Entity` for the given actor id.
pub fn ensure_actor_entity(
    commands: &mut Commands,
    mapping: &mut ActorEntityMapping,
    actor_id: ActorId,
    transform: Transform,
) -> Option<Entity> {
    if mapping.0.contains_key(&actor_id) {
        return None;
    }
    let entity = commands
        .spawn((ActorEntity(actor_id), transform, Visibility::default()))
        .id();
    mapping.0.insert(actor_id, entity);
    Some(entity)
}

fn capsule_mesh(capsule: Capsule) -> Mesh {
    Mesh::from(Capsule3d {
        radius: capsule.radius,
        half_length: capsule.half_height,
    })
}

fn spawn_character_visuals(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut mapping: ResMut<ActorEntityMapping>,
    sim: Res<Sim>,
    local: Res<LocalCharacter>,
) {
    for character in sim.world.characters() {
        let Some(entity) = ensure_actor_entity(
            &mut commands,
            &mut mapping,
            character.id,
            to_transform(&character.transform),
        ) else {
            continue;
        };

        let is_local = local.0 == Some(character.id);
        let base_color = if is_local {
            Color::linear_rgb(0.2, 0.9, 0.8)
        } else {
            Color::linear_rgb(0.9, 0.2, 0.2)
        };

        let body_material = materials.add(StandardMaterial {
            base_color,
            ..default()
        });
        let eye_mesh = meshes.add(Mesh::from(Sphere { radius: 0.08 }));
        let eye_material = materials.add(StandardMaterial {
            base_color: Color::srgb(1.0, 1.0, 1.0),
            ..default()
        });

        let capsule = character.capsule;
        let mut body = Entity::PLACEHOLDER;
        commands
            .entity(entity)
            .insert(Name::new(character.name.clone()))
            .with_children(|parent| {
                body = parent
                    .spawn((
                        Mesh3d(meshes.add(capsule_mesh(capsule))),
                        MeshMaterial3d(body_material),
                    ))
                    .id();

                // Eyes sit in front (-Z is forward) so facing reads at a glance.
                for x in [-0.14, 0.14] {
                    parent.spawn((
                        Mesh3d(eye_mesh.clone()),
                        MeshMaterial3d(eye_material.clone()),
                        Transform::from_xyz(x, capsule.half_height, -capsule.radius),
                    ));
                }
            });
        commands.entity(entity).insert(CharacterBody { mesh: body });
        if is_local {
            commands.entity(entity).insert(LocalActor);
        }
    }
}

fn spawn_actor_visuals(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut mapping: ResMut<ActorEntityMapping>,
    sim: Res<Sim>,
) {
    for actor in sim.world.actors() {
        let Some(entity) = ensure_actor_entity(
            &mut commands,
            &mut mapping,
            actor.id,
            to_transform(&actor.transform),
        ) else {
            continue;
        };
        commands.entity(entity).insert(Name::new(actor.name.clone()));

        let (mesh, local) = match &actor.kind {
            ActorKind::Pickable(item) => {
                let Some(item_mesh) = &item.mesh else {
                    continue;
                };
                let Some(mesh) = shape_mesh(&item_mesh.shape) else {
                    continue;
                };
                (mesh, to_transform(&item_mesh.relative))
            }
            ActorKind::Prop { .. } => (
                Mesh::from(Cylinder {
                    radius: 0.2,
                    half_height: 0.3,
                }),
                Transform::IDENTITY,
            ),
        };

        let base_color = if actor.has_tag(PICKUP_TAG) {
            Color::srgb_u8(124, 144, 255)
        } else {
            Color::srgb_u8(140, 110, 80)
        };
        let material = materials.add(StandardMaterial {
            base_color,
            ..default()
        });
        let mesh = meshes.add(mesh);

        commands.entity(entity).with_children(|parent| {
            parent.spawn((Mesh3d(mesh), MeshMaterial3d(material), local));
        });
    }
}

fn shape_mesh(shape: &ColliderShapeDef) -> Option<Mesh> {
    let mesh = match *shape {
        ColliderShapeDef::Plane { .. } => return None,
        ColliderShapeDef::Cuboid { half_extents } => {
            let size = to_vec3(&half_extents) * 2.0;
            Mesh::from(Cuboid::new(size.x, size.y, size.z))
        }
        ColliderShapeDef::Sphere { radius } => Mesh::from(Sphere { radius }),
        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => Mesh::from(Capsule3d {
            radius,
            half_length: half_height,
        }),
        ColliderShapeDef::CylinderY {
            radius,
            half_height,
        } => Mesh::from(Cylinder {
            radius,
            half_height,
        }),
    };
    Some(mesh)
}

fn on_gameplay_message(
    mut commands: Commands,
    mut msgs: MessageReader<GameplayMessage>,
    mut meshes: ResMut<Assets<Mesh>>,
    mapping: Res<ActorEntityMapping>,
    bodies: Query<&CharacterBody>,
    sim: Res<Sim>,
) {
    for GameplayMessage(event) in msgs.read() {
        match event {
            GameplayEvent::ItemPicked { item, .. } => {
                if let Some(&entity) = mapping.0.get(item) {
                    commands.entity(entity).insert(Held);
                }
            }
            GameplayEvent::ItemDropped { item, .. } => {
                if let Some(&entity) = mapping.0.get(item) {
                    commands.entity(entity).remove::<Held>();
                }
            }
            GameplayEvent::CrouchStarted { character, .. }
            | GameplayEvent::CrouchEnded { character, .. } => {
                let Some(capsule) = sim.world.character(*character).map(|c| c.capsule) else {
                    continue;
                };
                let Some(body) = mapping
                    .0
                    .get(character)
                    .and_then(|&entity| bodies.get(entity).ok())
                else {
                    continue;
                };
                commands
                    .entity(body.mesh)
                    .insert(Mesh3d(meshes.add(capsule_mesh(capsule))));
            }
            _ => {}
        }
    }
}

pub fn sync_transforms(
    time: Res<Time>,
    sim: Res<Sim>,
    mut transform_q: Query<(&ActorEntity, &mut Transform, Has<Held>)>,
) {
    let dt = time.delta_secs();
    for (ActorEntity(id), mut transform, held) in &mut transform_q {
        let target = sim
            .world
            .actor(*id)
            .map(|a| a.transform)
            .or_else(|| sim.world.character(*id).map(|c| c.transform));
        let Some(target) = target else {
            continue;
        };
        let target = to_transform(&target);

        if held {
            *transform = target;
            continue;
        }

        transform
            .translation
            .smooth_nudge(&target.translation, TRANSLATION_DECAY_RATE, dt);
        transform.rotation = transform
            .rotation
            .slerp(target.rotation, 1.0 - (-ROTATION_DECAY_RATE * dt).exp());
        transform.scale = target.scale;
    }
}
