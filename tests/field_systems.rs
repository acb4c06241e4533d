//! System-level tests for the floating field.
//!
//! These run the plugin's schedules by hand against a recording backend, so
//! every force, torque and impulse the field hands out can be checked
//! exactly, without a physics engine in the loop.

use std::collections::HashMap;

use bevy::ecs::system::EntityCommands;
use bevy::prelude::*;
use floating_field::prelude::*;

/// Everything the field asked the backend to do.
#[derive(Resource, Default)]
struct Recorded {
    forces: HashMap<Entity, Vec3>,
    torques: HashMap<Entity, Vec3>,
    impulses: Vec<(Entity, Vec3)>,
    evaluations: u32,
}

struct RecordingBackend;

impl FieldPhysicsBackend for RecordingBackend {
    fn plugin() -> impl Plugin {
        RecordingBackendPlugin
    }

    fn get_position(world: &World, entity: Entity) -> Vec3 {
        world
            .get::<Transform>(entity)
            .map(|t| t.translation)
            .unwrap_or(Vec3::ZERO)
    }

    fn apply_force(world: &mut World, entity: Entity, force: Vec3) {
        *world
            .resource_mut::<Recorded>()
            .forces
            .entry(entity)
            .or_default() += force;
    }

    fn apply_torque(world: &mut World, entity: Entity, torque: Vec3) {
        *world
            .resource_mut::<Recorded>()
            .torques
            .entry(entity)
            .or_default() += torque;
    }

    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec3) {
        world
            .resource_mut::<Recorded>()
            .impulses
            .push((entity, impulse));
    }

    fn get_mass(world: &World, entity: Entity) -> f32 {
        world.get::<TestMass>(entity).map(|m| m.0).unwrap_or(1.0)
    }

    fn insert_body_physics(entity: &mut EntityCommands, _radius: f32) {
        entity.insert(PhysicsInserted);
    }
}

#[derive(Component)]
struct TestMass(f32);

#[derive(Component)]
struct PhysicsInserted;

struct RecordingBackendPlugin;

impl Plugin for RecordingBackendPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Recorded>();
        app.add_systems(
            FixedUpdate,
            clear_recorded.in_set(FloatingFieldSet::Preparation),
        );
        app.add_systems(
            FixedUpdate,
            count_evaluation.in_set(FloatingFieldSet::FinalApplication),
        );
    }
}

fn clear_recorded(mut recorded: ResMut<Recorded>) {
    recorded.forces.clear();
    recorded.torques.clear();
}

fn count_evaluation(mut recorded: ResMut<Recorded>) {
    recorded.evaluations += 1;
}

/// Field with only the centering spring, so forces are easy to predict.
fn spring_only() -> ForceFieldConfig {
    ForceFieldConfig::default()
        .with_oscillation(Vec3::ZERO, Vec3::ZERO)
        .with_torque_amplitude(0.0)
}

fn create_test_app(settings: FieldSettings) -> App {
    let mut app = App::new();
    app.add_plugins(FloatingFieldPlugin::<RecordingBackend>::new(settings));
    app
}

/// App with an empty scene and a spring-only field.
fn create_empty_app() -> App {
    create_test_app(FieldSettings {
        field: spring_only(),
        scene: SceneConfig::default().with_body_count(0),
        ..default()
    })
}

fn spawn_body(app: &mut App, position: Vec3) -> Entity {
    let count = app.world().resource::<TriggerCounter>().count();
    app.world_mut()
        .spawn((
            Transform::from_translation(position),
            FloatingBodyBundle::new(PhaseOffsets::ZERO, count),
        ))
        .id()
}

fn tick(app: &mut App) {
    app.world_mut().run_schedule(FixedUpdate);
}

fn fire(app: &mut App, times: u32) {
    let mut counter = app.world_mut().resource_mut::<TriggerCounter>();
    for _ in 0..times {
        counter.fire();
    }
}

#[test]
fn startup_populates_scene() {
    let mut app = create_test_app(FieldSettings {
        scene: SceneConfig::default().with_body_count(5).with_seed(11),
        ..default()
    });
    fire(&mut app, 3);

    app.world_mut().run_schedule(Startup);

    let mut bodies = app
        .world_mut()
        .query_filtered::<(&FloatingBody, &TriggerTracker, &Transform), With<PhysicsInserted>>();
    let bodies: Vec<_> = bodies.iter(app.world()).collect();
    assert_eq!(bodies.len(), 5);

    for (body, tracker, transform) in bodies {
        // Trackers start at the count at spawn time, so old clicks never fire.
        assert_eq!(tracker.last_seen(), 3);
        let p = transform.translation;
        assert!(p.x.abs() <= 4.0 && p.y.abs() <= 3.0 && p.z.abs() <= 2.0);
        for v in body.phase().get().to_array() {
            assert!((0.0..std::f32::consts::TAU).contains(&v));
        }
    }
}

#[test]
fn centering_force_is_applied_each_tick() {
    let mut app = create_empty_app();
    let body = spawn_body(&mut app, Vec3::new(2.0, 0.0, -1.0));

    tick(&mut app);

    let recorded = app.world().resource::<Recorded>();
    assert_eq!(recorded.forces[&body], Vec3::new(-0.8, 0.0, 0.4));
    assert_eq!(recorded.torques[&body], Vec3::ZERO);
    assert!(recorded.impulses.is_empty());
}

#[test]
fn body_config_overrides_scene_field() {
    let mut app = create_empty_app();
    let body = spawn_body(&mut app, Vec3::new(1.0, 0.0, 0.0));
    app.world_mut()
        .entity_mut(body)
        .insert(spring_only().with_force_multiplier(2.0));

    tick(&mut app);

    assert_eq!(
        app.world().resource::<Recorded>().forces[&body],
        Vec3::new(-2.0, 0.0, 0.0)
    );
}

#[test]
fn triggers_between_ticks_coalesce_into_one_impulse() {
    let mut app = create_empty_app();
    let body = spawn_body(&mut app, Vec3::new(0.0, 3.0, 0.0));

    tick(&mut app);
    fire(&mut app, 2);
    tick(&mut app);
    tick(&mut app);

    let recorded = app.world().resource::<Recorded>();
    assert_eq!(recorded.impulses, vec![(body, Vec3::new(0.0, 4.0, 0.0))]);
    assert_eq!(
        app.world().get::<TriggerTracker>(body).unwrap().last_seen(),
        2
    );
}

#[test]
fn impulse_is_scaled_by_mass() {
    let mut app = create_empty_app();
    let body = spawn_body(&mut app, Vec3::new(-1.0, 0.0, 0.0));
    app.world_mut().entity_mut(body).insert(TestMass(2.5));

    fire(&mut app, 1);
    tick(&mut app);

    let recorded = app.world().resource::<Recorded>();
    assert_eq!(recorded.impulses, vec![(body, Vec3::new(-10.0, 0.0, 0.0))]);
}

#[test]
fn trigger_at_origin_is_consumed_without_impulse() {
    let mut app = create_empty_app();
    let body = spawn_body(&mut app, Vec3::ZERO);

    fire(&mut app, 1);
    tick(&mut app);
    // Moving away later must not replay the old trigger.
    app.world_mut().get_mut::<Transform>(body).unwrap().translation = Vec3::X;
    tick(&mut app);

    assert!(app.world().resource::<Recorded>().impulses.is_empty());
    assert_eq!(
        app.world().get::<TriggerTracker>(body).unwrap().last_seen(),
        1
    );
}

#[test]
fn late_spawned_body_ignores_earlier_triggers() {
    let mut app = create_empty_app();
    fire(&mut app, 4);
    tick(&mut app);

    let late = spawn_body(&mut app, Vec3::new(1.0, 1.0, 0.0));
    tick(&mut app);
    assert!(app.world().resource::<Recorded>().impulses.is_empty());

    fire(&mut app, 1);
    tick(&mut app);
    let recorded = app.world().resource::<Recorded>();
    assert_eq!(recorded.impulses.len(), 1);
    assert_eq!(recorded.impulses[0].0, late);
}

#[test]
fn non_finite_body_is_skipped_others_continue() {
    let mut app = create_empty_app();
    let broken = spawn_body(&mut app, Vec3::new(f32::NAN, 0.0, 0.0));
    let healthy = spawn_body(&mut app, Vec3::new(0.0, 0.0, 5.0));

    fire(&mut app, 1);
    tick(&mut app);

    let recorded = app.world().resource::<Recorded>();
    assert!(!recorded.forces.contains_key(&broken));
    assert_eq!(recorded.forces[&healthy], Vec3::new(0.0, 0.0, -2.0));
    assert_eq!(recorded.impulses, vec![(healthy, Vec3::new(0.0, 0.0, 4.0))]);

    // The broken body did not consume the trigger.
    assert_eq!(
        app.world().get::<TriggerTracker>(broken).unwrap().last_seen(),
        0
    );
}

#[test]
fn pointer_steering_biases_every_body_equally() {
    let mut app = create_empty_app();
    let a = spawn_body(&mut app, Vec3::ZERO);
    let b = spawn_body(&mut app, Vec3::new(0.0, 1.0, 0.0));
    app.world_mut()
        .resource_mut::<SteeringAdapter>()
        .set_pointer(Vec2::new(1.0, 0.0));

    tick(&mut app);

    let recorded = app.world().resource::<Recorded>();
    assert_eq!(recorded.forces[&a], Vec3::new(1.5, 0.0, 0.0));
    assert_eq!(recorded.forces[&b], Vec3::new(1.5, -0.4, 0.0));
}

#[test]
fn disabled_steering_adds_no_bias() {
    let mut app = create_test_app(FieldSettings {
        field: spring_only(),
        steering: SteeringConfig::disabled(),
        scene: SceneConfig::default().with_body_count(0),
        ..default()
    });
    let body = spawn_body(&mut app, Vec3::new(1.0, 0.0, 0.0));
    app.world_mut()
        .resource_mut::<SteeringAdapter>()
        .set_pointer(Vec2::ONE);

    tick(&mut app);

    assert_eq!(
        app.world().resource::<Recorded>().forces[&body],
        Vec3::new(-0.4, 0.0, 0.0)
    );
}

#[test]
fn cadence_skips_whole_pipeline() {
    let mut app = create_test_app(FieldSettings {
        field: spring_only(),
        scene: SceneConfig::default().with_body_count(0),
        tick_every: 3,
        ..default()
    });
    let body = spawn_body(&mut app, Vec3::new(1.0, 0.0, 0.0));

    for _ in 0..7 {
        tick(&mut app);
    }

    let recorded = app.world().resource::<Recorded>();
    // Ticks 0, 3 and 6.
    assert_eq!(recorded.evaluations, 3);
    // The clear step is gated too, so the last force is still held.
    assert_eq!(recorded.forces[&body], Vec3::new(-0.4, 0.0, 0.0));
}

#[test]
fn phase_is_stable_across_ticks() {
    let mut app = create_test_app(FieldSettings {
        scene: SceneConfig::default().with_body_count(3).with_seed(5),
        ..default()
    });
    app.world_mut().run_schedule(Startup);

    let mut query = app.world_mut().query::<(Entity, &FloatingBody)>();
    let before: Vec<_> = query
        .iter(app.world())
        .map(|(e, b)| (e, b.phase()))
        .collect();

    for _ in 0..10 {
        tick(&mut app);
    }

    for (entity, phase) in before {
        assert_eq!(
            app.world().get::<FloatingBody>(entity).unwrap().phase(),
            phase
        );
    }
}

#[test]
fn invalid_settings_fall_back_to_defaults() {
    let app = create_test_app(FieldSettings {
        field: ForceFieldConfig::default().with_force_multiplier(f32::NAN),
        tick_every: 0,
        ..default()
    });

    assert_eq!(
        *app.world().resource::<ForceFieldConfig>(),
        ForceFieldConfig::default()
    );
    assert_eq!(app.world().resource::<TickCadence>().every(), 1);
}
