//! Hero Scene Example
//!
//! A floating field of spheres behind a landing-page style headline. The
//! bodies drift around the origin, lean toward the cursor, and burst outward
//! on click.
//!
//! Controls:
//! - **Mouse**: Steer the field
//! - **Left click / tap / Space**: Push every body outward
//!
//! Optional: pass a JSON settings file as the first argument.
//!
//! ```text
//! cargo run --example hero_scene -- settings.json
//! ```

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use floating_field::prelude::*;

fn main() {
    let settings = load_settings();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Floating Field".into(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(Color::srgb(0.04, 0.04, 0.07)))
        // Physics runs right after the field in the fixed schedule
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule())
        .add_plugins(FloatingFieldPlugin::<Rapier3dBackend>::new(settings))
        .add_plugins(PointerInputPlugin::default())
        .add_systems(Startup, setup)
        .add_systems(Update, (attach_meshes, keyboard_trigger, update_hud))
        .run();
}

#[derive(Component)]
struct Hud;

fn load_settings() -> FieldSettings {
    let Some(path) = std::env::args().nth(1) else {
        return FieldSettings::default();
    };

    match std::fs::read_to_string(&path)
        .map_err(|err| err.to_string())
        .and_then(|source| FieldSettings::from_json(&source).map_err(|err| err.to_string()))
    {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("could not load settings from {path}: {err}, using defaults");
            FieldSettings::default()
        }
    }
}

fn setup(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 0.0, 12.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
        ..default()
    });

    commands.spawn((
        Text::new("FLOATING FIELD"),
        TextFont {
            font_size: 48.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(40.0),
            left: Val::Px(40.0),
            ..default()
        },
    ));

    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::srgb(0.7, 0.7, 0.75)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
        Hud,
    ));
}

/// Give freshly spawned bodies a sphere mesh in their own colour.
fn attach_meshes(
    mut commands: Commands,
    scene: Res<SceneConfig>,
    bodies: Query<(Entity, &BodyAppearance), Added<BodyAppearance>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if bodies.is_empty() {
        return;
    }

    let mesh = meshes.add(Sphere::new(scene.body_radius).mesh().uv(32, 18));
    for (entity, appearance) in &bodies {
        let material = materials.add(StandardMaterial {
            base_color: appearance.color,
            perceptual_roughness: appearance.roughness,
            metallic: appearance.metalness,
            ..default()
        });
        commands
            .entity(entity)
            .insert((Mesh3d(mesh.clone()), MeshMaterial3d(material)));
    }
}

fn keyboard_trigger(keys: Res<ButtonInput<KeyCode>>, mut counter: ResMut<TriggerCounter>) {
    if keys.just_pressed(KeyCode::Space) {
        counter.fire();
    }
}

fn update_hud(
    counter: Res<TriggerCounter>,
    adapter: Res<SteeringAdapter>,
    config: Res<SteeringConfig>,
    mut hud: Query<&mut Text, With<Hud>>,
) {
    let Ok(mut text) = hud.single_mut() else {
        return;
    };

    let steering = match adapter.resolve(&config) {
        Some(steering) => format!(
            "{:?} ({:+.2}, {:+.2})",
            steering.source(),
            steering.direction().x,
            steering.direction().y
        ),
        None => "none".to_string(),
    };

    text.0 = format!(
        "triggers: {}\nsteering: {steering}\nsensor: {:?}",
        counter.count(),
        adapter.status()
    );
}
